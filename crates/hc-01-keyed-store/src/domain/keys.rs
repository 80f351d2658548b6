//! # Key Layout
//!
//! Wallet records are namespaced under a reserved prefix; batch records are
//! stored directly under their identifier.

use shared_types::{ContractError, Role};

/// Key prefixes for the key-value store.
#[derive(Debug, Clone, Copy)]
pub enum KeyPrefix {
    /// Wallet record: `WALLET_{roleId}` -> Wallet
    Wallet,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Wallet => b"WALLET_",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &[u8]) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix);
        key
    }

    /// Build the wallet key for a role.
    pub fn wallet_key(role: Role) -> Vec<u8> {
        KeyPrefix::Wallet.key(role.id().as_bytes())
    }

    /// Whether a stored key belongs to the wallet namespace.
    pub fn is_wallet_key(key: &[u8]) -> bool {
        key.starts_with(KeyPrefix::Wallet.as_bytes())
    }

    /// Build the key for a batch identifier.
    ///
    /// INVARIANT-3: identifiers must be non-empty and must not collide with
    /// the wallet namespace.
    pub fn batch_key(batch_id: &str) -> Result<Vec<u8>, ContractError> {
        if batch_id.is_empty() {
            return Err(ContractError::validation("batch_id", "must not be empty"));
        }
        if Self::is_wallet_key(batch_id.as_bytes()) {
            return Err(ContractError::validation(
                "batch_id",
                format!("must not start with the reserved prefix WALLET_ (got {batch_id})"),
            ));
        }
        Ok(batch_id.as_bytes().to_vec())
    }
}
