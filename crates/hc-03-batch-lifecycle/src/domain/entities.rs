//! # Batch Record
//!
//! The stored shape of a batch. Stage groups stay `None` until the stage
//! has happened; finance and the journey are present from registration on.

use super::status::BatchStatus;
use serde::{Deserialize, Serialize};
use shared_types::{ContractError, Money};
use std::fmt;
use std::str::FromStr;

/// Immutable journey record. Insertion order is chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub timestamp: String,
    pub location: String,
    pub coordinates: String,
    pub activity: String,
    pub actor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    pub producer: String,
    pub farm_geo: String,
    pub location_name: String,
    pub coffee_type: String,
    pub harvest_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalTransport {
    pub driver: String,
    pub plate_number: String,
    pub truck_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseArrival {
    /// `"<name>, <city>"`
    pub location: String,
    pub arrival_date: String,
}

/// Pesticide residue test outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResidueResult {
    Clean,
    Contaminated,
}

impl FromStr for ResidueResult {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLEAN" => Ok(ResidueResult::Clean),
            "CONTAMINATED" => Ok(ResidueResult::Contaminated),
            other => Err(ContractError::validation(
                "residue",
                format!("expected CLEAN or CONTAMINATED, got {other:?}"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub method: String,
    pub cupping_score: u32,
    pub residue: ResidueResult,
    pub net_weight: f64,
    pub processed_at: String,
}

/// Regulator's verdict on an export permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportDecision {
    Approved,
    Rejected,
}

impl FromStr for ExportDecision {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPROVED" => Ok(ExportDecision::Approved),
            "REJECTED" => Ok(ExportDecision::Rejected),
            other => Err(ContractError::validation(
                "decision",
                format!("expected APPROVED or REJECTED, got {other:?}"),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPermit {
    pub document_number: String,
    pub decision: ExportDecision,
    pub decided_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportShipment {
    pub vessel: String,
    pub container: String,
    pub container_temperature: f64,
    pub departure_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReceipt {
    pub importer_name: String,
    pub received_date: String,
    pub landed_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    DownPaymentReleased,
    RefundedQcFailed,
    RefundedExportRejected,
    RefundedImportRejected,
    FullySettled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PaymentStatus::DownPaymentReleased => "DOWN_PAYMENT_RELEASED",
            PaymentStatus::RefundedQcFailed => "REFUNDED_QC_FAILED",
            PaymentStatus::RefundedExportRejected => "REFUNDED_EXPORT_REJECTED",
            PaymentStatus::RefundedImportRejected => "REFUNDED_IMPORT_REJECTED",
            PaymentStatus::FullySettled => "FULLY_SETTLED",
        };
        f.write_str(name)
    }
}

/// Money side of a batch.
///
/// `remaining_invoice + total_paid - refunded == net_contract_value` after
/// every committed operation. The net value starts at the contract value,
/// becomes `down_payment + final_payout` on settlement and zero once the
/// down payment has been refunded. `total_paid` never decreases: a refund is
/// recorded in `refunded`, not by erasing what went out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finance {
    pub contract_value: Money,
    pub net_contract_value: Money,
    pub down_payment: Money,
    pub penalty_deductions: Money,
    pub quality_bonus: Money,
    pub remaining_invoice: Money,
    pub total_paid: Money,
    #[serde(default)]
    pub refunded: Money,
    pub final_payout: Money,
    pub payment_status: PaymentStatus,
}

impl Finance {
    /// Terms right after the down payment went out.
    pub fn opened(contract_value: Money, down_payment: Money) -> Self {
        Self {
            contract_value,
            net_contract_value: contract_value,
            down_payment,
            penalty_deductions: Money::ZERO,
            quality_bonus: Money::ZERO,
            remaining_invoice: contract_value - down_payment,
            total_paid: down_payment,
            refunded: Money::ZERO,
            final_payout: Money::ZERO,
            payment_status: PaymentStatus::DownPaymentReleased,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.remaining_invoice + self.total_paid - self.refunded == self.net_contract_value
    }

    /// The down payment went back to the importer. Nothing more is owed and
    /// the payment already made stays on record.
    pub(crate) fn refund_down_payment(&mut self, status: PaymentStatus) {
        self.remaining_invoice = Money::ZERO;
        self.refunded = self.down_payment;
        self.net_contract_value = Money::ZERO;
        self.payment_status = status;
    }

    pub(crate) fn settle(&mut self, total_penalties: Money, final_transfer: Money) {
        self.penalty_deductions = total_penalties;
        self.remaining_invoice = Money::ZERO;
        self.total_paid = self.down_payment + final_transfer;
        self.net_contract_value = self.total_paid;
        self.final_payout = final_transfer;
        self.payment_status = PaymentStatus::FullySettled;
    }
}

/// A coffee batch as stored under its identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_id: String,
    pub status: BatchStatus,
    pub origin: Origin,
    pub local_transport: Option<LocalTransport>,
    pub warehouse: Option<WarehouseArrival>,
    pub quality: Option<QualityReport>,
    pub export_permit: Option<ExportPermit>,
    pub export_shipment: Option<ExportShipment>,
    pub import: Option<ImportReceipt>,
    pub finance: Finance,
    pub issue_notes: Vec<String>,
    pub journey: Vec<Checkpoint>,
}

impl Batch {
    /// Cupping score recorded at warehouse quality control, if any.
    pub fn warehouse_score(&self) -> Option<u32> {
        self.quality.as_ref().map(|q| q.cupping_score)
    }

    pub fn last_checkpoint(&self) -> Option<&Checkpoint> {
        self.journey.last()
    }
}
