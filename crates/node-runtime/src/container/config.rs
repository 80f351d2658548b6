//! # Runtime Configuration
//!
//! Everything the runtime needs before it can open the store: where the
//! records live, what the wallets start with, the lifecycle policy and who
//! may call.
//!
//! Defaults reproduce the reference deployment. `load_config()` overrides
//! them from `HC_*` environment variables.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use hc_02_wallet_ledger::WalletGenesis;
use hc_03_batch_lifecycle::LifecyclePolicy;
use rust_decimal::Decimal;
use shared_types::{ContractError, Money, Role};
use thiserror::Error;

use crate::adapters::IdentityDirectory;

/// Default tracing filter when `HC_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Starting wallet balances.
    pub genesis: WalletGenesis,
    /// Rates and thresholds of the batch lifecycle.
    pub policy: LifecyclePolicy,
    /// Enrolled caller identities.
    pub identities: IdentityDirectory,
    /// Tracing filter directive.
    pub log_filter: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            genesis: WalletGenesis::default(),
            policy: LifecyclePolicy::default(),
            identities: IdentityDirectory::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Check the configuration before anything is opened.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - a non-guarantor wallet would start with a negative balance
    /// - a policy rate lies outside `[0, 1]` or a limit is not finite
    /// - the selected backend is not compiled into this binary
    /// - no identity is enrolled
    pub fn validate(&self) -> Result<(), ConfigError> {
        for wallet in self.genesis.wallets() {
            if !wallet.role.is_guarantor() && wallet.balance < Money::ZERO {
                return Err(ConfigError::NegativeGenesisBalance {
                    role: wallet.role,
                    balance: wallet.balance,
                });
            }
        }

        self.policy.validate().map_err(ConfigError::Policy)?;

        if !self.storage.backend.is_available() {
            return Err(ConfigError::BackendUnavailable(self.storage.backend));
        }

        if self.identities.is_empty() {
            return Err(ConfigError::NoIdentities);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Only the guarantor may start below zero.
    #[error("Genesis balance of {role} must not be negative (got {balance})")]
    NegativeGenesisBalance { role: Role, balance: Money },

    /// Lifecycle policy out of range.
    #[error("Invalid lifecycle policy: {0}")]
    Policy(#[source] ContractError),

    /// Backend not compiled in.
    #[error("Storage backend '{0}' is not available in this build (enable the matching feature)")]
    BackendUnavailable(StorageBackend),

    /// Nobody could call the contract.
    #[error("Identity directory is empty")]
    NoIdentities,
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile `BTreeMap`; gone when the process exits.
    Memory,
    /// Single file rewritten atomically on every commit.
    File,
    /// RocksDB database directory (feature `rocksdb`).
    RocksDb,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Memory => "memory",
            StorageBackend::File => "file",
            StorageBackend::RocksDb => "rocksdb",
        }
    }

    /// Whether this binary can open the backend.
    pub fn is_available(self) -> bool {
        match self {
            StorageBackend::Memory | StorageBackend::File => true,
            StorageBackend::RocksDb => cfg!(feature = "rocksdb"),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" => Ok(StorageBackend::File),
            "rocksdb" | "rocks" => Ok(StorageBackend::RocksDb),
            other => Err(format!("unknown storage backend '{other}'")),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding the store files.
    pub data_dir: PathBuf,
    /// Which `KeyValueStore` implementation to open.
    pub backend: StorageBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            backend: StorageBackend::File,
        }
    }
}

impl StorageConfig {
    /// File used by the file-backed store.
    pub fn ledger_file(&self) -> PathBuf {
        self.data_dir.join("ledger.db")
    }

    /// Directory used by RocksDB.
    pub fn rocksdb_dir(&self) -> PathBuf {
        self.data_dir.join("rocksdb")
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> RuntimeConfig {
    load_config_from(|name| std::env::var(name).ok())
}

/// Load configuration, reading variables through `lookup`.
///
/// Unparsable values are logged and the default is kept.
pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    if let Some(dir) = lookup("HC_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }
    if let Some(backend) = parsed(&lookup, "HC_STORAGE_BACKEND") {
        config.storage.backend = backend;
    }
    if let Some(amount) = parsed::<Decimal>(&lookup, "HC_IMPORTER_FUNDS") {
        config.genesis.importer = amount;
    }
    if let Some(amount) = parsed::<Decimal>(&lookup, "HC_COOPERATIVE_FUNDS") {
        config.genesis.cooperative = amount;
    }
    if let Some(amount) = parsed::<Decimal>(&lookup, "HC_PRODUCER_FUNDS") {
        config.genesis.producer = amount;
    }
    if let Some(filter) = lookup("HC_LOG") {
        config.log_filter = filter;
    }

    config
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(variable = name, value = %raw, error = %e, "[runtime] Ignoring unparsable setting");
            None
        }
    }
}
