//! # Wallet Ledger (hc-02)
//!
//! One balance record per role, mutated only by transfers.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | Conservation | `transfer()` debits and credits the same amount |
//! | 2 | Non-negative balances | Sender check in `transfer()`, guarantor exempt |
//! | 3 | Idempotent genesis | `initialize()` only creates missing wallets |
//!
//! ## Guarantor
//!
//! The cooperative underwrites refunds of the down payment. Its transfers
//! skip the balance check, so its wallet may go negative.
//!
//! All operations run against a `WorkingSet`; nothing reaches the store or
//! the event sink until the caller commits.

pub mod domain;
pub mod ledger;

pub use domain::entities::{Wallet, WalletGenesis};
pub use domain::events::{TransferEvent, BANK_TRANSFER_EVENT};
pub use ledger::WalletLedger;
