//! # Error Types
//!
//! `ContractError` is the only failure a contract call surfaces. Every
//! variant aborts the whole operation; nothing is retried internally.

use crate::entities::Money;
use thiserror::Error;

/// Coarse classification of a contract failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    AlreadyExists,
    InvalidTransition,
    InsufficientFunds,
    Validation,
    Storage,
}

/// Errors raised by wallet, lifecycle and query operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    /// Caller's role does not match the role the operation requires.
    #[error("Unauthorized: {operation} requires {required}, caller presented {actual}")]
    Unauthorized {
        operation: &'static str,
        required: &'static str,
        actual: String,
    },

    /// Wallet for this role was never initialized.
    #[error("Wallet not found for {role}; run InitializeWallets first")]
    WalletNotFound { role: String },

    /// No batch is stored under this identifier.
    #[error("Batch not found: {batch_id}")]
    BatchNotFound { batch_id: String },

    /// A batch already exists under this identifier.
    #[error("Batch already exists: {batch_id}")]
    BatchAlreadyExists { batch_id: String },

    /// Current status does not permit the requested operation.
    #[error(
        "Invalid transition: {operation} requires status {expected}, batch {batch_id} is {actual}{}",
        .hint.map(|h| format!(" ({h})")).unwrap_or_default()
    )]
    InvalidTransition {
        operation: &'static str,
        batch_id: String,
        expected: String,
        actual: String,
        hint: Option<&'static str>,
    },

    /// Non-guarantor sender lacks the balance for a transfer.
    #[error(
        "Insufficient funds: {role} holds {available}, needs {required} (short by {})",
        .required - .available
    )]
    InsufficientFunds {
        role: String,
        available: Money,
        required: Money,
    },

    /// Malformed or out-of-range argument.
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A stored record could not be decoded.
    #[error("Malformed record at key {key}: {reason}")]
    MalformedRecord { key: String, reason: String },

    /// The keyed store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ContractError {
    /// Build a `Validation` error.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        ContractError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ContractError::WalletNotFound { .. } | ContractError::BatchNotFound { .. } => {
                ErrorKind::NotFound
            }
            ContractError::BatchAlreadyExists { .. } => ErrorKind::AlreadyExists,
            ContractError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            ContractError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            ContractError::Validation { .. } | ContractError::MalformedRecord { .. } => {
                ErrorKind::Validation
            }
            ContractError::Storage(_) => ErrorKind::Storage,
        }
    }
}
