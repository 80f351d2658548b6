//! # Settlement Engine
//!
//! Final reconciliation at import confirmation. Pure arithmetic: the
//! transition applies the outcome, this module never touches a wallet.

use super::policy::LifecyclePolicy;
use rust_decimal::Decimal;
use shared_types::{percent_of, round_money, Money};

/// Finance figures and scores a settlement starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementInput {
    pub contract_value: Money,
    pub down_payment: Money,
    pub remaining_invoice: Money,
    pub quality_bonus: Money,
    pub penalty_deductions: Money,
    pub warehouse_score: u32,
    pub landed_score: u32,
}

/// Payout of an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSettlement {
    /// Points lost between warehouse and landed cupping.
    pub degradation_points: u32,
    /// Contract share deducted for the lost points, in percent.
    pub degradation_percent: Decimal,
    pub degradation_penalty: Money,
    /// Penalties already on the batch plus the degradation penalty.
    pub total_penalties: Money,
    pub final_transfer: Money,
    pub cooperative_share: Money,
    pub producer_share: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Landed quality below the acceptance threshold: the down payment goes back.
    Rejected { refund: Money, minimum_score: u32 },
    Accepted(AcceptedSettlement),
}

/// Settle a batch that arrived with `input.landed_score`.
///
/// Shares always add up to the final transfer exactly: the cooperative
/// commission is rounded, the producer takes the rest.
pub fn settle(policy: &LifecyclePolicy, input: &SettlementInput) -> SettlementOutcome {
    if input.landed_score < policy.acceptance_score {
        return SettlementOutcome::Rejected {
            refund: input.down_payment,
            minimum_score: policy.acceptance_score,
        };
    }

    let degradation_points = input.warehouse_score.saturating_sub(input.landed_score);
    let degradation_rate = policy.degradation_rate_per_point * Decimal::from(degradation_points);
    let degradation_penalty = percent_of(input.contract_value, degradation_rate);
    let total_penalties = input.penalty_deductions + degradation_penalty;

    let gross = round_money(input.remaining_invoice + input.quality_bonus - total_penalties);
    let final_transfer = gross.max(Money::ZERO);
    let cooperative_share = percent_of(final_transfer, policy.cooperative_commission_rate);
    let producer_share = final_transfer - cooperative_share;

    SettlementOutcome::Accepted(AcceptedSettlement {
        degradation_points,
        degradation_percent: degradation_rate * Decimal::ONE_HUNDRED,
        degradation_penalty,
        total_penalties,
        final_transfer,
        cooperative_share,
        producer_share,
    })
}
