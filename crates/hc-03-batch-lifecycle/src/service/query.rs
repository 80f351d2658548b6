//! # Batch Queries
//!
//! Read-only; no working set, no commit.

use super::{decode_batch, BatchLifecycleService};
use crate::domain::Batch;
use crate::ports::inbound::{BatchQueryApi, BatchScan};
use hc_01_keyed_store::{KeyPrefix, KeyValueStore};
use shared_types::{Clock, ContractError, EventSink};

impl<S, C, E> BatchQueryApi for BatchLifecycleService<S, C, E>
where
    S: KeyValueStore,
    C: Clock,
    E: EventSink,
{
    fn read_batch(&self, batch_id: &str) -> Result<Batch, ContractError> {
        let not_found = || ContractError::BatchNotFound {
            batch_id: batch_id.to_string(),
        };
        if batch_id.is_empty() || KeyPrefix::is_wallet_key(batch_id.as_bytes()) {
            return Err(not_found());
        }
        let bytes = self.store.get(batch_id.as_bytes())?.ok_or_else(not_found)?;
        decode_batch(batch_id.as_bytes(), &bytes)
    }

    fn batch_exists(&self, batch_id: &str) -> Result<bool, ContractError> {
        if batch_id.is_empty() || KeyPrefix::is_wallet_key(batch_id.as_bytes()) {
            return Ok(false);
        }
        Ok(self.store.exists(batch_id.as_bytes())?)
    }

    fn scan_batches(&self) -> Result<BatchScan, ContractError> {
        let mut scan = BatchScan::default();

        for (key, value) in self.store.range_scan(b"", b"")? {
            if KeyPrefix::is_wallet_key(&key) {
                continue;
            }
            match decode_batch(&key, &value) {
                Ok(batch) if !batch.batch_id.is_empty() => scan.batches.push(batch),
                Ok(_) => {
                    tracing::debug!(key = %String::from_utf8_lossy(&key), "[hc-03] Skipping record without batch id");
                    scan.skipped += 1;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "[hc-03] Skipping undecodable record");
                    scan.skipped += 1;
                }
            }
        }

        if scan.skipped > 0 {
            tracing::warn!(
                skipped = scan.skipped,
                returned = scan.batches.len(),
                "[hc-03] Batch scan skipped malformed records"
            );
        }
        Ok(scan)
    }
}
