//! # Harvest-Chain Test Suite
//!
//! Cross-crate scenarios driven through the runtime dispatcher, the same
//! way an operator reaches the contract.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mod.rs            # Harness: dispatcher over an in-memory store
//!     ├── settlement.rs     # Accepted imports, penalties, bonus, shares
//!     ├── refunds.rs        # QC failure, export and import rejection
//!     ├── authorization.rs  # Identity and role checks per function
//!     └── persistence.rs    # File-backed runtime across restarts
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hc-tests
//! cargo test -p hc-tests integration::refunds::
//! ```

#![allow(dead_code)]

pub mod integration;
