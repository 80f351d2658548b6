//! Rates and thresholds that drive the financial side of the lifecycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{ContractError, Money};

/// Lifecycle policy. Defaults are the contract terms of the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecyclePolicy {
    /// Share of the contract value paid to the producer at registration.
    pub down_payment_rate: Decimal,
    /// Local truck temperature above which the fixed penalty applies (°C).
    pub local_heat_limit: f64,
    /// Fixed penalty for an overheated local truck.
    pub local_heat_penalty: Money,
    /// Container temperature above which the export penalty applies (°C).
    pub export_heat_limit: f64,
    /// Export heat penalty as a share of the contract value.
    pub export_heat_penalty_rate: Decimal,
    /// Cupping scores below this fail quality control.
    pub qc_pass_score: u32,
    /// Cupping scores strictly above this earn the quality bonus.
    pub bonus_score: u32,
    /// Quality bonus as a share of the contract value.
    pub quality_bonus_rate: Decimal,
    /// Landed scores below this are rejected by the importer.
    pub acceptance_score: u32,
    /// Penalty per point of quality lost in transit, as a share of the contract value.
    pub degradation_rate_per_point: Decimal,
    /// Cooperative's share of the final transfer.
    pub cooperative_commission_rate: Decimal,
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            down_payment_rate: Decimal::new(5, 2),
            local_heat_limit: 30.0,
            local_heat_penalty: Decimal::from(500_000u32),
            export_heat_limit: 25.0,
            export_heat_penalty_rate: Decimal::new(5, 2),
            qc_pass_score: 70,
            bonus_score: 85,
            quality_bonus_rate: Decimal::new(10, 2),
            acceptance_score: 80,
            degradation_rate_per_point: Decimal::new(1, 2),
            cooperative_commission_rate: Decimal::new(20, 2),
        }
    }
}

impl LifecyclePolicy {
    /// Reject rates outside `[0, 1]`, negative penalties and non-finite limits.
    pub fn validate(&self) -> Result<(), ContractError> {
        let rates = [
            ("down_payment_rate", self.down_payment_rate),
            ("export_heat_penalty_rate", self.export_heat_penalty_rate),
            ("quality_bonus_rate", self.quality_bonus_rate),
            ("degradation_rate_per_point", self.degradation_rate_per_point),
            ("cooperative_commission_rate", self.cooperative_commission_rate),
        ];
        for (field, rate) in rates {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(ContractError::validation(
                    field,
                    format!("rate must lie in [0, 1] (got {rate})"),
                ));
            }
        }
        if self.local_heat_penalty < Decimal::ZERO {
            return Err(ContractError::validation(
                "local_heat_penalty",
                "penalty must not be negative",
            ));
        }
        for (field, limit) in [
            ("local_heat_limit", self.local_heat_limit),
            ("export_heat_limit", self.export_heat_limit),
        ] {
            if !limit.is_finite() {
                return Err(ContractError::validation(field, "limit must be finite"));
            }
        }
        Ok(())
    }
}
