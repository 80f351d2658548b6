//! # Store Errors

use shared_types::ContractError;
use thiserror::Error;

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// I/O error during read/write.
    #[error("KV store I/O error: {message}")]
    IOError { message: String },

    /// Data corruption in the store.
    #[error("KV store corruption: {message}")]
    CorruptionError { message: String },

    /// Another open store holds the ledger.
    #[error("KV store locked: {path} is held by {}", held_by(.holder))]
    Locked { path: String, holder: Option<u32> },
}

fn held_by(holder: &Option<u32>) -> String {
    match holder {
        Some(pid) => format!("process {pid}"),
        None => "another process".to_string(),
    }
}

impl From<KVStoreError> for ContractError {
    fn from(err: KVStoreError) -> Self {
        ContractError::Storage(err.to_string())
    }
}
