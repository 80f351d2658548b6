//! # Batch Lifecycle (hc-03)
//!
//! Tracks a green coffee batch from harvest to import and settles the
//! payments between the role wallets along the way.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | 1 | One valid predecessor set per operation | `domain/status.rs` - `TRANSITIONS` |
//! | 2 | One authorized role per operation | `domain/capability.rs` - `authorize()` |
//! | 3 | Balanced finance | `domain/entities.rs` - `Finance::is_balanced()` |
//! | 4 | All-or-nothing operations | `service/mod.rs` - `run()` |
//! | 5 | Shares sum to the final transfer | `domain/settlement.rs` - `settle()` |
//!
//! ## Money Flows
//!
//! | Stage | From | To | Amount |
//! |-------|------|----|--------|
//! | RegisterHarvest | Importer | Producer | 5 % of contract (down payment) |
//! | QC failed / export rejected / import rejected | Cooperative | Importer | down payment |
//! | ConfirmImport (accepted) | Importer | Cooperative | 20 % of final transfer |
//! | ConfirmImport (accepted) | Importer | Producer | the rest of the final transfer |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service/   - BatchLifecycleService: transitions and queries    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs - BatchLifecycleApi, BatchQueryApi            │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/status.rs     - BatchStatus, Operation, TRANSITIONS     │
//! │  domain/capability.rs - Role check                              │
//! │  domain/entities.rs   - Batch, Finance, Checkpoint              │
//! │  domain/settlement.rs - Pure settlement arithmetic              │
//! │  domain/policy.rs     - Rates and thresholds                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::{BatchLifecycleApi, BatchQueryApi, BatchScan};
pub use service::{BatchLifecycleService, LifecycleDependencies};
