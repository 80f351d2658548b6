//! # Working Set
//!
//! Staging area for one contract operation.
//!
//! Reads see the operation's own staged writes first, then the store.
//! Writes and events stay local until the operation finishes; the caller
//! turns a successful working set into a `PendingCommit` and applies it in
//! one `atomic_batch_write`. A working set that is simply dropped leaves no
//! trace, which is how an aborted operation rolls back.

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{in_range, BatchOperation, KeyValueStore, ScanResult};
use shared_types::{ContractEvent, EventSink};
use std::collections::BTreeMap;

/// Per-operation read-your-writes overlay over a `KeyValueStore`.
pub struct WorkingSet<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    staged: BTreeMap<Vec<u8>, Vec<u8>>,
    events: Vec<ContractEvent>,
}

impl<'a, S: KeyValueStore + ?Sized> WorkingSet<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        match self.staged.get(key) {
            Some(value) => Ok(Some(value.clone())),
            None => self.store.get(key),
        }
    }

    pub fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        if self.staged.contains_key(key) {
            return Ok(true);
        }
        self.store.exists(key)
    }

    /// Stage a write. Later puts to the same key replace earlier ones.
    pub fn put(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.staged.insert(key.into(), value.into());
    }

    /// Ordered scan over the store merged with staged writes.
    pub fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<ScanResult, KVStoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.store.range_scan(start, end)?.into_iter().collect();
        for (key, value) in &self.staged {
            if in_range(key, start, end) {
                merged.insert(key.clone(), value.clone());
            }
        }
        Ok(merged.into_iter().collect())
    }

    /// Queue an event for delivery after commit.
    pub fn emit(&mut self, event: ContractEvent) {
        self.events.push(event);
    }

    pub fn staged_writes(&self) -> usize {
        self.staged.len()
    }

    pub fn staged_events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Freeze the staged writes and events, releasing the store borrow.
    pub fn into_commit(self) -> PendingCommit {
        PendingCommit {
            operations: self
                .staged
                .into_iter()
                .map(|(key, value)| BatchOperation::put(key, value))
                .collect(),
            events: self.events,
        }
    }
}

/// Writes and events of a finished operation, ready to apply.
#[derive(Debug, Clone, Default)]
pub struct PendingCommit {
    operations: Vec<BatchOperation>,
    events: Vec<ContractEvent>,
}

impl PendingCommit {
    pub fn operations(&self) -> &[BatchOperation] {
        &self.operations
    }

    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Write everything in one atomic batch, then deliver the events.
    ///
    /// Events are only delivered once the batch is durable.
    pub fn apply<S: KeyValueStore + ?Sized>(
        self,
        store: &mut S,
        sink: &dyn EventSink,
    ) -> Result<(), KVStoreError> {
        if !self.operations.is_empty() {
            tracing::debug!("[hc-01] Committing {} staged writes", self.operations.len());
            store.atomic_batch_write(self.operations)?;
        }
        for event in &self.events {
            sink.emit(event);
        }
        Ok(())
    }
}
