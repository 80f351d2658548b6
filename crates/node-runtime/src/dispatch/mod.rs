//! # Positional Dispatcher
//!
//! Turns `(identity, function name, string arguments)` into a typed call on
//! the lifecycle service and renders the result as JSON.
//!
//! ## Call Flow
//!
//! 1. Resolve the identity in the directory (unknown identities never reach
//!    the service)
//! 2. Look up the function and check arity
//! 3. Parse the positional arguments into a typed request
//! 4. Invoke the service and serialize its answer

mod args;
mod functions;

pub use functions::Function;

use hc_03_batch_lifecycle::{
    ApproveExportRequest, BatchLifecycleApi, BatchQueryApi, ConfirmImportRequest,
    DispatchLocalTransportRequest, QualityControlRequest, ReceiveAtWarehouseRequest,
    RecordCheckpointRequest, RegisterHarvestRequest, StartExportShipmentRequest,
};
use serde::Serialize;
use serde_json::Value;
use shared_types::{ContractError, ErrorKind};
use thiserror::Error;

use crate::adapters::IdentityDirectory;
use args::Args;

/// Why a dispatched call failed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Identity not enrolled in the directory.
    #[error("Unknown identity '{identity}'; enroll it before calling the contract")]
    UnknownIdentity { identity: String },

    #[error("Unknown function '{name}'")]
    UnknownFunction { name: String },

    #[error("Wrong number of arguments for {usage}: expected {expected}, got {actual}")]
    Arity {
        usage: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid {parameter} for {function}: {value:?} ({reason})")]
    InvalidArgument {
        function: Function,
        parameter: &'static str,
        value: String,
        reason: String,
    },

    /// The contract refused the call.
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl DispatchError {
    /// Classify this error with the contract's error kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnknownIdentity { .. } => ErrorKind::Unauthorized,
            DispatchError::UnknownFunction { .. }
            | DispatchError::Arity { .. }
            | DispatchError::InvalidArgument { .. } => ErrorKind::Validation,
            DispatchError::Contract(e) => e.kind(),
            DispatchError::Encode(_) => ErrorKind::Storage,
        }
    }
}

/// Name-addressed front door of a lifecycle service.
pub struct Dispatcher<L> {
    service: L,
    identities: IdentityDirectory,
}

impl<L> Dispatcher<L>
where
    L: BatchLifecycleApi + BatchQueryApi,
{
    pub fn new(service: L, identities: IdentityDirectory) -> Self {
        Self {
            service,
            identities,
        }
    }

    pub fn service(&self) -> &L {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut L {
        &mut self.service
    }

    pub fn identities(&self) -> &IdentityDirectory {
        &self.identities
    }

    /// Run `function` as `identity` with positional `args`.
    pub fn invoke<A: AsRef<str>>(
        &mut self,
        identity: &str,
        function: &str,
        args: &[A],
    ) -> Result<Value, DispatchError> {
        let caller = self
            .identities
            .resolve(identity)
            .ok_or_else(|| DispatchError::UnknownIdentity {
                identity: identity.to_string(),
            })?;

        let function = Function::from_name(function).ok_or_else(|| {
            DispatchError::UnknownFunction {
                name: function.to_string(),
            }
        })?;
        let args = Args::new(function, args)?;

        tracing::debug!(
            identity = caller.identity(),
            role = %caller.role(),
            %function,
            read_only = function.is_query(),
            "[runtime] Dispatching call"
        );

        let service = &mut self.service;
        match function {
            Function::InitializeWallets => render(service.initialize_wallets()?),
            Function::GetBalance => render(service.get_balance(&args.text(0))?),
            Function::RegisterHarvest => {
                let request = RegisterHarvestRequest {
                    batch_id: args.text(0),
                    producer: args.text(1),
                    farm_geo: args.text(2),
                    location_name: args.text(3),
                    coffee_type: args.text(4),
                    contract_value: args.money(5)?,
                };
                render(service.register_harvest(&caller, request)?)
            }
            Function::DispatchLocalTransport => {
                let request = DispatchLocalTransportRequest {
                    batch_id: args.text(0),
                    driver: args.text(1),
                    plate_number: args.text(2),
                    temperature: args.parse(3)?,
                    current_geo: args.text(4),
                };
                render(service.dispatch_local_transport(&caller, request)?)
            }
            Function::RecordCheckpoint => {
                let request = RecordCheckpointRequest {
                    batch_id: args.text(0),
                    location: args.text(1),
                    geo: args.text(2),
                    activity: args.text(3),
                };
                render(service.record_checkpoint(&caller, request)?)
            }
            Function::ReceiveAtWarehouse => {
                let request = ReceiveAtWarehouseRequest {
                    batch_id: args.text(0),
                    warehouse_name: args.text(1),
                    city: args.text(2),
                    geo: args.text(3),
                };
                render(service.receive_at_warehouse(&caller, request)?)
            }
            Function::ProcessQualityControl => {
                let request = QualityControlRequest {
                    batch_id: args.text(0),
                    method: args.text(1),
                    cupping_score: args.parse(2)?,
                    residue: args.text(3).parse()?,
                    net_weight: args.parse(4)?,
                };
                render(service.process_quality_control(&caller, request)?)
            }
            Function::ApproveExport => {
                let request = ApproveExportRequest {
                    batch_id: args.text(0),
                    document_number: args.text(1),
                    decision: args.text(2).parse()?,
                };
                render(service.approve_export(&caller, request)?)
            }
            Function::StartExportShipment => {
                let request = StartExportShipmentRequest {
                    batch_id: args.text(0),
                    vessel: args.text(1),
                    container: args.text(2),
                    temperature: args.parse(3)?,
                    origin_geo: args.text(4),
                };
                render(service.start_export_shipment(&caller, request)?)
            }
            Function::ConfirmImport => {
                let request = ConfirmImportRequest {
                    batch_id: args.text(0),
                    importer_name: args.text(1),
                    dest_geo: args.text(2),
                    landed_score: args.parse(3)?,
                };
                render(service.confirm_import(&caller, request)?)
            }
            Function::ReadBatch => render(service.read_batch(&args.text(0))?),
            Function::BatchExists => render(service.batch_exists(&args.text(0))?),
            Function::ListAllBatches => render(service.list_all_batches()?),
            Function::ScanBatches => render(service.scan_batches()?),
        }
    }
}

fn render<T: Serialize>(value: T) -> Result<Value, DispatchError> {
    Ok(serde_json::to_value(value)?)
}
