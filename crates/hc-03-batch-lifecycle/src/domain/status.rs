//! # Batch Status and the Transition Table
//!
//! ```text
//! HARVESTED ─dispatch─→ EN_ROUTE_TO_WAREHOUSE ─receive─→ RECEIVED_AT_WAREHOUSE
//!                              │ checkpoint                     │ quality control
//!                              ↺                  ┌─────────────┴─────────────┐
//!                                             QC_FAILED*              READY_FOR_EXPORT
//!                                                                           │ approve
//!                                                         ┌─────────────────┴──────┐
//!                                                  EXPORT_REJECTED*         EXPORT_APPROVED
//!                                                                                  │ ship
//!                                     ↺ checkpoint ─ IN_TRANSIT_EXPORT ←───────────┘
//!                                                         │ confirm import
//!                                            ┌────────────┴────────────┐
//!                                     IMPORT_REJECTED*          IMPORT_ACCEPTED*
//! ```
//!
//! `*` marks terminal states. Every operation consults `TRANSITIONS` twice:
//! once to guard the current status, once to check the status it chose.

use serde::{Deserialize, Serialize};
use shared_types::{ContractError, Role};
use std::fmt;

/// Lifecycle position of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Harvested,
    EnRouteToWarehouse,
    ReceivedAtWarehouse,
    QcFailed,
    ReadyForExport,
    ExportApproved,
    ExportRejected,
    InTransitExport,
    ImportRejected,
    ImportAccepted,
}

impl BatchStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Harvested => "HARVESTED",
            BatchStatus::EnRouteToWarehouse => "EN_ROUTE_TO_WAREHOUSE",
            BatchStatus::ReceivedAtWarehouse => "RECEIVED_AT_WAREHOUSE",
            BatchStatus::QcFailed => "QC_FAILED",
            BatchStatus::ReadyForExport => "READY_FOR_EXPORT",
            BatchStatus::ExportApproved => "EXPORT_APPROVED",
            BatchStatus::ExportRejected => "EXPORT_REJECTED",
            BatchStatus::InTransitExport => "IN_TRANSIT_EXPORT",
            BatchStatus::ImportRejected => "IMPORT_REJECTED",
            BatchStatus::ImportAccepted => "IMPORT_ACCEPTED",
        }
    }

    /// No operation leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        !TRANSITIONS.iter().any(|(from, _, _)| *from == self)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named contract operations that touch a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterHarvest,
    DispatchLocalTransport,
    RecordCheckpoint,
    ReceiveAtWarehouse,
    ProcessQualityControl,
    ApproveExport,
    StartExportShipment,
    ConfirmImport,
}

impl Operation {
    pub const fn name(self) -> &'static str {
        match self {
            Operation::RegisterHarvest => "RegisterHarvest",
            Operation::DispatchLocalTransport => "DispatchLocalTransport",
            Operation::RecordCheckpoint => "RecordCheckpoint",
            Operation::ReceiveAtWarehouse => "ReceiveAtWarehouse",
            Operation::ProcessQualityControl => "ProcessQualityControl",
            Operation::ApproveExport => "ApproveExport",
            Operation::StartExportShipment => "StartExportShipment",
            Operation::ConfirmImport => "ConfirmImport",
        }
    }

    /// The one role allowed to invoke this operation.
    pub const fn required_role(self) -> Role {
        match self {
            Operation::RegisterHarvest => Role::Producer,
            Operation::DispatchLocalTransport
            | Operation::RecordCheckpoint
            | Operation::StartExportShipment => Role::Logistics,
            Operation::ReceiveAtWarehouse | Operation::ProcessQualityControl => Role::Cooperative,
            Operation::ApproveExport => Role::Regulator,
            Operation::ConfirmImport => Role::Importer,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use BatchStatus::*;

/// `(current, operation) → allowed next states`.
///
/// `RegisterHarvest` has no row: it applies to an absent batch.
pub const TRANSITIONS: &[(BatchStatus, Operation, &[BatchStatus])] = &[
    (Harvested, Operation::DispatchLocalTransport, &[EnRouteToWarehouse]),
    (EnRouteToWarehouse, Operation::RecordCheckpoint, &[EnRouteToWarehouse]),
    (InTransitExport, Operation::RecordCheckpoint, &[InTransitExport]),
    (EnRouteToWarehouse, Operation::ReceiveAtWarehouse, &[ReceivedAtWarehouse]),
    (ReceivedAtWarehouse, Operation::ProcessQualityControl, &[QcFailed, ReadyForExport]),
    (ReadyForExport, Operation::ApproveExport, &[ExportApproved, ExportRejected]),
    (ExportApproved, Operation::StartExportShipment, &[InTransitExport]),
    (InTransitExport, Operation::ConfirmImport, &[ImportRejected, ImportAccepted]),
];

/// Allowed next states of `operation` from `current`, if any.
pub fn allowed_next(current: BatchStatus, operation: Operation) -> Option<&'static [BatchStatus]> {
    TRANSITIONS
        .iter()
        .find(|(from, op, _)| *from == current && *op == operation)
        .map(|(_, _, next)| *next)
}

/// States from which `operation` may run, in table order.
pub fn predecessors(operation: Operation) -> Vec<BatchStatus> {
    TRANSITIONS
        .iter()
        .filter(|(_, op, _)| *op == operation)
        .map(|(from, _, _)| *from)
        .collect()
}

/// Reject `operation` unless the table has a row for `current`.
pub fn guard(
    operation: Operation,
    batch_id: &str,
    current: BatchStatus,
) -> Result<&'static [BatchStatus], ContractError> {
    allowed_next(current, operation).ok_or_else(|| {
        invalid(operation, batch_id, current, expected(operation), hint(operation, current))
    })
}

/// Check that `next` is a target the table allows from `current`.
pub fn advance(
    operation: Operation,
    batch_id: &str,
    current: BatchStatus,
    next: BatchStatus,
) -> Result<BatchStatus, ContractError> {
    let allowed = guard(operation, batch_id, current)?;
    if allowed.contains(&next) {
        Ok(next)
    } else {
        Err(invalid(operation, batch_id, next, join(allowed), None))
    }
}

fn expected(operation: Operation) -> String {
    join(&predecessors(operation))
}

fn join(states: &[BatchStatus]) -> String {
    states
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn hint(operation: Operation, current: BatchStatus) -> Option<&'static str> {
    match (operation, current) {
        (Operation::ApproveExport, QcFailed) => {
            Some("batch failed quality control and cannot be submitted for an export permit")
        }
        _ => None,
    }
}

fn invalid(
    operation: Operation,
    batch_id: &str,
    actual: BatchStatus,
    expected: String,
    hint: Option<&'static str>,
) -> ContractError {
    ContractError::InvalidTransition {
        operation: operation.name(),
        batch_id: batch_id.to_string(),
        expected,
        actual: actual.as_str().to_string(),
        hint,
    }
}
