//! # Runtime Container
//!
//! Opens the configured store and wires the lifecycle service to its
//! collaborators:
//!
//! ```text
//! RuntimeConfig ──→ open_store() ──→ Box<dyn KeyValueStore>
//!                                          │
//!        SystemClock ─────────┐            │
//!        BankGateway ─────────┼──→ BatchLifecycleService
//!        WalletLedger(genesis)┘            │
//!                                          ↓
//!                      Dispatcher (+ IdentityDirectory)
//! ```

pub mod config;

pub use config::{
    load_config, load_config_from, ConfigError, RuntimeConfig, StorageBackend, StorageConfig,
};

use std::path::PathBuf;
use std::sync::Arc;

use hc_01_keyed_store::{FileBackedKVStore, InMemoryKVStore, KVStoreError, KeyValueStore};
use hc_02_wallet_ledger::WalletLedger;
use hc_03_batch_lifecycle::{BatchLifecycleService, LifecycleDependencies};
use shared_types::SystemClock;
use thiserror::Error;

use crate::adapters::BankGateway;
use crate::dispatch::Dispatcher;

/// Store behind the runtime, chosen at startup.
pub type RuntimeStore = Box<dyn KeyValueStore>;

/// Lifecycle service as the runtime wires it.
pub type RuntimeLifecycleService = BatchLifecycleService<RuntimeStore, SystemClock, Arc<BankGateway>>;

/// Startup failures.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot create data directory {}: {source}", path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open store: {0}")]
    Storage(#[from] KVStoreError),
}

/// The wired runtime.
pub struct RuntimeContainer {
    /// Name-addressed entry point onto the lifecycle service.
    pub dispatcher: Dispatcher<RuntimeLifecycleService>,
    /// Shared with the service as its event sink.
    pub bank_gateway: Arc<BankGateway>,
    /// Configuration (immutable after initialization).
    pub config: RuntimeConfig,
}

impl RuntimeContainer {
    /// Validate `config`, open the store and wire everything together.
    pub fn new(config: RuntimeConfig) -> Result<Self, ContainerError> {
        config.validate()?;

        let store = open_store(&config.storage)?;
        let bank_gateway = Arc::new(BankGateway::new());

        let deps = LifecycleDependencies {
            store,
            clock: SystemClock,
            events: bank_gateway.clone(),
        };
        let service = BatchLifecycleService::new(
            deps,
            WalletLedger::new(config.genesis.clone()),
            config.policy.clone(),
        );
        let dispatcher = Dispatcher::new(service, config.identities.clone());

        tracing::info!(
            backend = %config.storage.backend,
            data_dir = %config.storage.data_dir.display(),
            identities = config.identities.len(),
            "[runtime] Container ready"
        );

        Ok(Self {
            dispatcher,
            bank_gateway,
            config,
        })
    }
}

/// Open the backend selected in `storage`, creating the data directory.
pub fn open_store(storage: &StorageConfig) -> Result<RuntimeStore, ContainerError> {
    if storage.backend == StorageBackend::Memory {
        tracing::warn!("[runtime] Using the in-memory store; nothing survives this process");
        return Ok(Box::new(InMemoryKVStore::new()));
    }

    std::fs::create_dir_all(&storage.data_dir).map_err(|source| ContainerError::DataDir {
        path: storage.data_dir.clone(),
        source,
    })?;

    match storage.backend {
        StorageBackend::Memory | StorageBackend::File => {
            Ok(Box::new(FileBackedKVStore::open(storage.ledger_file())?))
        }
        StorageBackend::RocksDb => open_rocksdb(storage),
    }
}

#[cfg(feature = "rocksdb")]
fn open_rocksdb(storage: &StorageConfig) -> Result<RuntimeStore, ContainerError> {
    let store = hc_01_keyed_store::RocksDbStore::open_default(storage.rocksdb_dir())?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "rocksdb"))]
fn open_rocksdb(_storage: &StorageConfig) -> Result<RuntimeStore, ContainerError> {
    Err(ConfigError::BackendUnavailable(StorageBackend::RocksDb).into())
}
