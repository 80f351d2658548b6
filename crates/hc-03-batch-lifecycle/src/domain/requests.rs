//! Typed arguments of the batch operations.

use super::entities::{ExportDecision, ResidueResult};
use serde::{Deserialize, Serialize};
use shared_types::{ContractError, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterHarvestRequest {
    pub batch_id: String,
    pub producer: String,
    pub farm_geo: String,
    pub location_name: String,
    pub coffee_type: String,
    pub contract_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchLocalTransportRequest {
    pub batch_id: String,
    pub driver: String,
    pub plate_number: String,
    pub temperature: f64,
    pub current_geo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordCheckpointRequest {
    pub batch_id: String,
    pub location: String,
    pub geo: String,
    pub activity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiveAtWarehouseRequest {
    pub batch_id: String,
    pub warehouse_name: String,
    pub city: String,
    pub geo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityControlRequest {
    pub batch_id: String,
    pub method: String,
    pub cupping_score: u32,
    pub residue: ResidueResult,
    pub net_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveExportRequest {
    pub batch_id: String,
    pub document_number: String,
    pub decision: ExportDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartExportShipmentRequest {
    pub batch_id: String,
    pub vessel: String,
    pub container: String,
    pub temperature: f64,
    pub origin_geo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmImportRequest {
    pub batch_id: String,
    pub importer_name: String,
    pub dest_geo: String,
    pub landed_score: u32,
}

/// Highest cupping score on the scale.
pub const MAX_CUPPING_SCORE: u32 = 100;

pub(crate) fn check_score(field: &'static str, score: u32) -> Result<(), ContractError> {
    if score > MAX_CUPPING_SCORE {
        return Err(ContractError::validation(
            field,
            format!("score must lie in 0..={MAX_CUPPING_SCORE} (got {score})"),
        ));
    }
    Ok(())
}

pub(crate) fn check_temperature(field: &'static str, celsius: f64) -> Result<(), ContractError> {
    if !celsius.is_finite() {
        return Err(ContractError::validation(field, "temperature must be a finite number"));
    }
    Ok(())
}

impl RegisterHarvestRequest {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.contract_value <= Money::ZERO {
            return Err(ContractError::validation(
                "contract_value",
                format!("must be positive (got {})", self.contract_value),
            ));
        }
        Ok(())
    }
}

impl DispatchLocalTransportRequest {
    pub fn validate(&self) -> Result<(), ContractError> {
        check_temperature("temperature", self.temperature)
    }
}

impl QualityControlRequest {
    pub fn validate(&self) -> Result<(), ContractError> {
        check_score("cupping_score", self.cupping_score)?;
        if !self.net_weight.is_finite() || self.net_weight < 0.0 {
            return Err(ContractError::validation(
                "net_weight",
                format!("must be a non-negative number (got {})", self.net_weight),
            ));
        }
        Ok(())
    }
}

impl StartExportShipmentRequest {
    pub fn validate(&self) -> Result<(), ContractError> {
        check_temperature("temperature", self.temperature)
    }
}

impl ConfirmImportRequest {
    pub fn validate(&self) -> Result<(), ContractError> {
        check_score("landed_score", self.landed_score)
    }
}
