//! # Ledger File Lock
//!
//! One process at a time may hold a file-backed ledger. Two holders would
//! each rewrite the whole file from their own snapshot and silently drop the
//! other's commits.
//!
//! The lock is an exclusive `fs2` lock (flock on Unix, LockFileEx on
//! Windows) on a sibling `.lock` file. It is released when the handle
//! closes, so a crashed process never leaves the ledger stuck.

use crate::domain::errors::KVStoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Exclusive hold on a ledger file, released on drop.
#[derive(Debug)]
pub(crate) struct LedgerLock {
    file: File,
    path: PathBuf,
}

impl LedgerLock {
    /// Lock file guarding `ledger`: same name, `.lock` extension.
    pub(crate) fn path_for(ledger: &Path) -> PathBuf {
        ledger.with_extension("lock")
    }

    /// Take the lock without waiting.
    ///
    /// Fails `KVStoreError::Locked` while another store has the ledger open,
    /// naming the holder's pid when it can be read.
    pub(crate) fn acquire(ledger: &Path) -> Result<Self, KVStoreError> {
        let path = Self::path_for(ledger);
        let io = |e: std::io::Error| KVStoreError::IOError {
            message: format!("lock file {}: {e}", path.display()),
        };

        // No truncate before the lock is ours: the holder's pid must survive.
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(io)?;

        if file.try_lock_exclusive().is_err() {
            return Err(KVStoreError::Locked {
                path: path.display().to_string(),
                holder: std::fs::read_to_string(&path)
                    .ok()
                    .and_then(|s| s.trim().parse().ok()),
            });
        }

        let pid = std::process::id();
        stamp_pid(&mut file, pid).map_err(io)?;

        tracing::debug!(path = %path.display(), pid, "[hc-01] Ledger lock acquired");
        Ok(Self { file, path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

fn stamp_pid(file: &mut File, pid: u32) -> std::io::Result<()> {
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{pid}")?;
    file.sync_all()
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        // The file stays: unlinking it would let a late opener lock an orphan inode.
        let _ = FileExt::unlock(&self.file);
    }
}
