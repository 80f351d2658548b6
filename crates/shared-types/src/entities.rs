//! # Core Domain Entities
//!
//! Roles, money and time as they are shared across subsystems.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ROLES
// =============================================================================

/// Stakeholder class that issues a contract call.
///
/// Each role has a stable identifier string (the membership id presented by
/// the caller's credentials). The identifier is also the wallet key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ProducerMSP")]
    Producer,
    #[serde(rename = "LogisticsMSP")]
    Logistics,
    #[serde(rename = "CooperativeMSP")]
    Cooperative,
    #[serde(rename = "RegulatorMSP")]
    Regulator,
    #[serde(rename = "ImporterMSP")]
    Importer,
}

impl Role {
    /// The role that underwrites refunds and may carry a negative balance.
    pub const GUARANTOR: Role = Role::Cooperative;

    /// All roles, in lifecycle order.
    pub const ALL: [Role; 5] = [
        Role::Producer,
        Role::Logistics,
        Role::Cooperative,
        Role::Regulator,
        Role::Importer,
    ];

    /// Identifier string presented by callers of this role.
    pub const fn id(self) -> &'static str {
        match self {
            Role::Producer => "ProducerMSP",
            Role::Logistics => "LogisticsMSP",
            Role::Cooperative => "CooperativeMSP",
            Role::Regulator => "RegulatorMSP",
            Role::Importer => "ImporterMSP",
        }
    }

    /// Parse a role identifier. Unknown identifiers yield `None`.
    pub fn from_id(id: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.id() == id)
    }

    /// Whether this role is exempt from the sender balance check.
    pub fn is_guarantor(self) -> bool {
        self == Role::GUARANTOR
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// =============================================================================
// MONEY
// =============================================================================

/// Currency amount. Fixed-point decimal, never floating point.
pub type Money = Decimal;

/// Decimal places kept on every computed amount.
pub const MONEY_SCALE: u32 = 2;

/// Round a computed amount to the ledger scale.
///
/// Policy: 2 decimal places, banker's rounding (midpoint to even). Applied
/// once per computed amount, never to stored balances.
pub fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// `rate` of `base`, rounded to the ledger scale.
pub fn percent_of(base: Money, rate: Decimal) -> Money {
    round_money(base * rate)
}

// =============================================================================
// TIME
// =============================================================================

/// Layout of every timestamp written into a record.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Render a transaction time in the fixed human-readable UTC layout.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
