//! # Outbound Ports (Driven Ports)
//!
//! The store the contract runs against. Replication, ordering between
//! concurrent callers and durability are the implementation's business.

use crate::domain::errors::KVStoreError;

/// Ordered `(key, value)` pairs returned by a scan.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Sorted byte-keyed storage holding wallets and batches side by side.
///
/// Implemented by `InMemoryKVStore`, `FileBackedKVStore` and, with the
/// `rocksdb` feature, `RocksDbStore`.
pub trait KeyValueStore: Send + Sync {
    /// Stored bytes under `key`, if any.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Write one record outside any working set.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Commit every operation of one contract call.
    ///
    /// ## Atomic Commit (INVARIANT-1)
    ///
    /// On `Err` the store must read exactly as it did before the call.
    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Keys in `[start, end)` in ascending byte order (INVARIANT-2).
    ///
    /// An empty `end` means the scan is unbounded above, so
    /// `range_scan(b"", b"")` visits every key.
    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).range_scan(start, end)
    }
}

/// One staged write of a commit. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } => key,
        }
    }
}

/// Whether `key` falls in the half-open range `[start, end)`, empty `end` unbounded.
pub fn in_range(key: &[u8], start: &[u8], end: &[u8]) -> bool {
    key >= start && (end.is_empty() || key < end)
}
