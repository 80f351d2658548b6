use super::lock::LedgerLock;
use crate::domain::errors::KVStoreError;
use crate::ports::outbound::{in_range, BatchOperation, KeyValueStore, ScanResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::Bound;
use std::path::{Path, PathBuf};

type Records = BTreeMap<Vec<u8>, Vec<u8>>;

/// Ledger persisted as one file, for single-node runs without RocksDB.
///
/// Records live in memory and the file is rewritten on every commit through
/// a sibling temp file plus rename, so a crash leaves either the old or the
/// new snapshot on disk. The store holds an exclusive lock on the ledger
/// for as long as it is open.
pub struct FileBackedKVStore {
    records: Records,
    path: PathBuf,
    _lock: LedgerLock,
}

impl FileBackedKVStore {
    /// Open the ledger file at `path`.
    ///
    /// A missing file is an empty ledger. A truncated one is a corruption
    /// error, never an empty ledger. Fails `KVStoreError::Locked` while
    /// another store has the same ledger open.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, KVStoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let lock = LedgerLock::acquire(&path)?;

        let records = match std::fs::read(&path) {
            Ok(bytes) => {
                let records = decode_records(&bytes)?;
                tracing::info!(
                    path = %path.display(),
                    lock = %lock.path().display(),
                    keys = records.len(),
                    bytes = bytes.len(),
                    "[hc-01] Loaded ledger file"
                );
                records
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "[hc-01] Starting empty ledger file");
                Records::new()
            }
            Err(e) => return Err(io_error(e)),
        };

        Ok(Self {
            records,
            path,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), KVStoreError> {
        let bytes = encode_records(&self.records)?;
        let staging = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&staging).map_err(io_error)?;
        file.write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(io_error)?;
        std::fs::rename(&staging, &self.path).map_err(io_error)?;

        tracing::debug!(keys = self.records.len(), "[hc-01] Ledger file rewritten");
        Ok(())
    }
}

// Layout: repeated [len:u32 LE][key][len:u32 LE][value], keys ascending.
fn encode_records(records: &Records) -> Result<Vec<u8>, KVStoreError> {
    let mut out = Vec::new();
    for chunk in records.iter().flat_map(|(k, v)| [k, v]) {
        out.extend_from_slice(&chunk_len(chunk.len())?.to_le_bytes());
        out.extend_from_slice(chunk);
    }
    Ok(out)
}

/// Length prefix for a chunk; a chunk that does not fit is refused, never wrapped.
fn chunk_len(len: usize) -> Result<u32, KVStoreError> {
    u32::try_from(len).map_err(|_| KVStoreError::IOError {
        message: format!("record of {len} bytes exceeds the ledger file limit"),
    })
}

fn decode_records(bytes: &[u8]) -> Result<Records, KVStoreError> {
    let mut records = Records::new();
    let mut rest = bytes;
    while !rest.is_empty() {
        let key = take_chunk(bytes, &mut rest)?;
        let value = take_chunk(bytes, &mut rest)?;
        records.insert(key, value);
    }
    Ok(records)
}

fn take_chunk(whole: &[u8], rest: &mut &[u8]) -> Result<Vec<u8>, KVStoreError> {
    let offset = whole.len() - rest.len();
    let truncated = || KVStoreError::CorruptionError {
        message: format!("ledger file truncated at offset {offset}"),
    };

    let (prefix, tail) = rest.split_first_chunk::<4>().ok_or_else(truncated)?;
    let len = u32::from_le_bytes(*prefix) as usize;
    if tail.len() < len {
        return Err(truncated());
    }
    let (chunk, tail) = tail.split_at(len);
    *rest = tail;
    Ok(chunk.to_vec())
}

fn io_error(e: std::io::Error) -> KVStoreError {
    KVStoreError::IOError {
        message: e.to_string(),
    }
}

impl KeyValueStore for FileBackedKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.atomic_batch_write(vec![BatchOperation::put(key, value)])
    }

    fn atomic_batch_write(&mut self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let snapshot = self.records.clone();
        for BatchOperation::Put { key, value } in operations {
            self.records.insert(key, value);
        }
        self.persist().inspect_err(|_| {
            // Memory must not run ahead of the file.
            self.records = snapshot;
        })
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
