//! # Batch Lifecycle Service
//!
//! The main service implementing `BatchLifecycleApi` and `BatchQueryApi`.
//!
//! ## Architecture
//!
//! Every state-changing call:
//! 1. Authorizes the caller against the operation's role
//! 2. Opens a `WorkingSet` over the store and stamps the operation time
//! 3. Runs the transition, staging batch and wallet writes plus events
//! 4. Commits everything in one atomic batch, then delivers the events
//!
//! A failure anywhere before step 4 drops the working set untouched.

mod query;
mod transitions;

use crate::domain::{authorize, Batch, Checkpoint, LifecyclePolicy, Operation};
use hc_01_keyed_store::{KeyValueStore, WorkingSet};
use hc_02_wallet_ledger::WalletLedger;
use shared_types::{format_timestamp, Clock, ContractError, EventSink, RoleResolver};

/// The Batch Lifecycle Service.
pub struct BatchLifecycleService<S, C, E>
where
    S: KeyValueStore,
    C: Clock,
    E: EventSink,
{
    /// Keyed store holding wallets and batches.
    pub(crate) store: S,
    /// Source of operation timestamps.
    pub(crate) clock: C,
    /// Receives events after each commit.
    pub(crate) events: E,
    pub(crate) ledger: WalletLedger,
    pub(crate) policy: LifecyclePolicy,
}

/// Dependencies for BatchLifecycleService
pub struct LifecycleDependencies<S, C, E> {
    pub store: S,
    pub clock: C,
    pub events: E,
}

impl<S, C, E> BatchLifecycleService<S, C, E>
where
    S: KeyValueStore,
    C: Clock,
    E: EventSink,
{
    pub fn new(
        deps: LifecycleDependencies<S, C, E>,
        ledger: WalletLedger,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            store: deps.store,
            clock: deps.clock,
            events: deps.events,
            ledger,
            policy,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct store access, bypassing the lifecycle rules.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn policy(&self) -> &LifecyclePolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &WalletLedger {
        &self.ledger
    }

    /// Authorize `caller` for `operation`, then run it.
    pub(crate) fn transition<T>(
        &mut self,
        operation: Operation,
        caller: &dyn RoleResolver,
        body: impl FnOnce(&mut OperationContext<'_, S>) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        authorize(operation, caller)?;
        self.run(operation.name(), body)
    }

    /// Run `body` in a fresh working set and commit what it staged.
    pub(crate) fn run<T>(
        &mut self,
        operation: &'static str,
        body: impl FnOnce(&mut OperationContext<'_, S>) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        let mut ctx = OperationContext {
            ws: WorkingSet::new(&self.store),
            ledger: &self.ledger,
            policy: &self.policy,
            timestamp: format_timestamp(self.clock.now()),
        };

        let value = match body(&mut ctx) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(operation, error = %e, "[hc-03] Operation aborted, nothing written");
                return Err(e);
            }
        };

        let commit = ctx.ws.into_commit();
        let writes = commit.operations().len();
        commit.apply(&mut self.store, &self.events)?;
        tracing::debug!(operation, writes, "[hc-03] Operation committed");
        Ok(value)
    }
}

/// Everything one operation may touch.
pub(crate) struct OperationContext<'a, S: KeyValueStore> {
    pub(crate) ws: WorkingSet<'a, S>,
    pub(crate) ledger: &'a WalletLedger,
    pub(crate) policy: &'a LifecyclePolicy,
    /// Operation time, already formatted for records.
    pub(crate) timestamp: String,
}

impl<S: KeyValueStore> OperationContext<'_, S> {
    pub(crate) fn checkpoint(
        &self,
        location: &str,
        coordinates: &str,
        activity: impl Into<String>,
        actor: &str,
    ) -> Checkpoint {
        Checkpoint {
            timestamp: self.timestamp.clone(),
            location: location.to_string(),
            coordinates: coordinates.to_string(),
            activity: activity.into(),
            actor: actor.to_string(),
        }
    }
}

/// Decode a stored batch record.
pub(crate) fn decode_batch(key: &[u8], bytes: &[u8]) -> Result<Batch, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::MalformedRecord {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: e.to_string(),
    })
}

pub(crate) fn encode_batch(batch: &Batch) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(batch).map_err(|e| ContractError::Storage(e.to_string()))
}
