//! # Inbound Ports (Driving Ports)
//!
//! ## Authorization
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `register_harvest` | ProducerMSP |
//! | `dispatch_local_transport` | LogisticsMSP |
//! | `record_checkpoint` | LogisticsMSP |
//! | `receive_at_warehouse` | CooperativeMSP |
//! | `process_quality_control` | CooperativeMSP |
//! | `approve_export` | RegulatorMSP |
//! | `start_export_shipment` | LogisticsMSP |
//! | `confirm_import` | ImporterMSP |
//!
//! Wallet initialization, balance lookup and the queries are open to any
//! caller.

use crate::domain::{
    ApproveExportRequest, Batch, ConfirmImportRequest, DispatchLocalTransportRequest,
    QualityControlRequest, ReceiveAtWarehouseRequest, RecordCheckpointRequest,
    RegisterHarvestRequest, StartExportShipmentRequest,
};
use hc_02_wallet_ledger::Wallet;
use serde::Serialize;
use shared_types::{ContractError, Role, RoleResolver};

/// State-changing contract operations.
///
/// Each call is atomic: on `Err` no record is written and no event is
/// delivered. On `Ok` the updated batch is returned as committed.
pub trait BatchLifecycleApi {
    /// Seed the genesis wallets that are still missing.
    fn initialize_wallets(&mut self) -> Result<Vec<Role>, ContractError>;

    /// Wallet of the role with this identifier.
    fn get_balance(&self, role_id: &str) -> Result<Wallet, ContractError>;

    fn register_harvest(
        &mut self,
        caller: &dyn RoleResolver,
        request: RegisterHarvestRequest,
    ) -> Result<Batch, ContractError>;

    fn dispatch_local_transport(
        &mut self,
        caller: &dyn RoleResolver,
        request: DispatchLocalTransportRequest,
    ) -> Result<Batch, ContractError>;

    fn record_checkpoint(
        &mut self,
        caller: &dyn RoleResolver,
        request: RecordCheckpointRequest,
    ) -> Result<Batch, ContractError>;

    fn receive_at_warehouse(
        &mut self,
        caller: &dyn RoleResolver,
        request: ReceiveAtWarehouseRequest,
    ) -> Result<Batch, ContractError>;

    fn process_quality_control(
        &mut self,
        caller: &dyn RoleResolver,
        request: QualityControlRequest,
    ) -> Result<Batch, ContractError>;

    fn approve_export(
        &mut self,
        caller: &dyn RoleResolver,
        request: ApproveExportRequest,
    ) -> Result<Batch, ContractError>;

    fn start_export_shipment(
        &mut self,
        caller: &dyn RoleResolver,
        request: StartExportShipmentRequest,
    ) -> Result<Batch, ContractError>;

    /// Final transition; settles or refunds the batch.
    fn confirm_import(
        &mut self,
        caller: &dyn RoleResolver,
        request: ConfirmImportRequest,
    ) -> Result<Batch, ContractError>;
}

/// Result of a full batch enumeration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchScan {
    /// Decoded batches in key order.
    pub batches: Vec<Batch>,
    /// Non-wallet records that could not be decoded or carried no id.
    pub skipped: usize,
}

/// Read-only batch queries.
pub trait BatchQueryApi {
    /// Fails `BatchNotFound` if nothing is stored under `batch_id`.
    fn read_batch(&self, batch_id: &str) -> Result<Batch, ContractError>;

    /// Presence check without decoding the record.
    fn batch_exists(&self, batch_id: &str) -> Result<bool, ContractError>;

    /// Every decodable batch in key order. Wallet records are never returned.
    fn list_all_batches(&self) -> Result<Vec<Batch>, ContractError> {
        Ok(self.scan_batches()?.batches)
    }

    /// Like `list_all_batches`, also counting the records it skipped.
    fn scan_batches(&self) -> Result<BatchScan, ContractError>;
}
