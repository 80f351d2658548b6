//! # Keyed Store (hc-01)
//!
//! The persistence boundary of Harvest-Chain: a sorted key→bytes map with
//! point reads, ordered range scans and atomic batch commits.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Atomic Commit | One operation's writes land together or not at all |
//! | 2 | Ordered Scan | Range scans yield keys in lexicographic byte order |
//! | 3 | Reserved Prefix | Wallet records live under `WALLET_`; batch ids never do |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Key layout and store errors
//! - `ports/` - The `KeyValueStore` driven port
//! - `adapters/` - In-memory, file-backed and RocksDB implementations
//! - `working_set.rs` - Per-operation staging of writes and events
//!
//! ## Usage
//!
//! ```ignore
//! use hc_01_keyed_store::{InMemoryKVStore, WorkingSet};
//!
//! let mut store = InMemoryKVStore::new();
//! let mut ws = WorkingSet::new(&store);
//! ws.put(b"B-1", b"{...}");
//! let commit = ws.into_commit();
//! commit.apply(&mut store, &events)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod working_set;

pub use adapters::{FileBackedKVStore, InMemoryKVStore};
#[cfg(feature = "rocksdb")]
pub use adapters::{RocksDbConfig, RocksDbStore};
pub use domain::errors::KVStoreError;
pub use domain::keys::KeyPrefix;
pub use ports::outbound::{BatchOperation, KeyValueStore, ScanResult};
pub use working_set::{PendingCommit, WorkingSet};
