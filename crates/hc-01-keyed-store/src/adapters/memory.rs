use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{in_range, BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::ops::Bound;

/// Volatile store for tests and throwaway runs.
///
/// A `BTreeMap` keeps keys in byte order, which is the scan order the
/// port promises.
#[derive(Debug, Default, Clone)]
pub struct InMemoryKVStore {
    records: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.records.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        // Inserts cannot fail, so applying in order is already all-or-nothing.
        self.records.extend(operations.into_iter().map(|op| match op {
            BatchOperation::Put { key, value } => (key, value),
        }));
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.records.contains_key(key))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError> {
        Ok(self
            .records
            .range::<[u8], _>((Bound::Included(start), Bound::Unbounded))
            .take_while(|(key, _)| in_range(key, start, end))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}
