//! # RocksDB Storage Adapter
//!
//! Durable `KeyValueStore` for long-running deployments. Wallets and batches
//! share the default column family, so one forward iteration covers the
//! whole key space in byte order.

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{in_range, BatchOperation, KeyValueStore, ScanResult};
use rocksdb::{
    BlockBasedOptions, Cache, DBCompressionType, Direction, IteratorMode, Options, WriteBatch,
    WriteOptions, DB,
};
use std::path::{Path, PathBuf};

/// Tuning for `RocksDbStore`.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Database directory.
    pub path: PathBuf,
    /// LRU block cache in bytes.
    pub block_cache_bytes: usize,
    /// fsync the WAL on every commit.
    pub sync_writes: bool,
}

impl RocksDbConfig {
    /// Durable defaults at `path`: 32 MiB cache, synced commits.
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            block_cache_bytes: 32 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

/// RocksDB-backed store.
pub struct RocksDbStore {
    db: DB,
    sync_writes: bool,
}

fn rocks_error(context: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: format!("RocksDB {context}: {e}"),
    }
}

impl RocksDbStore {
    /// Open the database, creating it if missing.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut table = BlockBasedOptions::default();
        table.set_bloom_filter(10.0, false);
        table.set_block_cache(&Cache::new_lru_cache(config.block_cache_bytes));

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(DBCompressionType::Snappy);
        opts.set_block_based_table_factory(&table);

        let db = DB::open(&opts, &config.path).map_err(|e| rocks_error("open failed", e))?;
        tracing::info!(path = %config.path.display(), "[hc-01] Opened RocksDB");

        Ok(Self {
            db,
            sync_writes: config.sync_writes,
        })
    }

    /// Open with `RocksDbConfig::at(path)`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::at(path))
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.get(key).map_err(|e| rocks_error("get failed", e))
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.atomic_batch_write(vec![BatchOperation::put(key, value)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for BatchOperation::Put { key, value } in operations {
            batch.put(key, value);
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.sync_writes);
        self.db
            .write_opt(batch, &write_opts)
            .map_err(|e| rocks_error("batch write failed", e))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        self.db
            .get_pinned(key)
            .map(|found| found.is_some())
            .map_err(|e| rocks_error("exists failed", e))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError> {
        let mut results = Vec::new();
        for item in self.db.iterator(IteratorMode::From(start, Direction::Forward)) {
            let (key, value) = item.map_err(|e| rocks_error("scan failed", e))?;
            if !in_range(&key, start, end) {
                break;
            }
            results.push((key.into_vec(), value.into_vec()));
        }
        Ok(results)
    }
}
