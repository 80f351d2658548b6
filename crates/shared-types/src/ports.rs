//! # Collaborator Ports
//!
//! The ambient facts a contract call consumes but never computes: who is
//! calling, what time it is, and where notifications go.
//!
//! These are the interfaces the host application implements. Reference
//! adapters live at the bottom of this module.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Yields the caller's role identifier for the current operation.
pub trait RoleResolver {
    /// Raw role identifier as presented by the caller's credentials.
    fn caller_role(&self) -> String;
}

/// Yields the timestamp of the current operation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// A notification emitted by a committed operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    /// Event name, e.g. `BankTransfer`.
    pub name: String,
    /// JSON payload.
    pub payload: serde_json::Value,
}

impl ContractEvent {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Fire-and-forget notification sink.
///
/// Events reach the sink only after the operation that raised them has
/// committed.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &ContractEvent);
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// =============================================================================

/// Resolver that always answers with one fixed identifier.
#[derive(Debug, Clone)]
pub struct StaticRole(pub String);

impl StaticRole {
    pub fn of(role: crate::Role) -> Self {
        Self(role.id().to_string())
    }
}

impl RoleResolver for StaticRole {
    fn caller_role(&self) -> String {
        self.0.clone()
    }
}

impl RoleResolver for crate::Role {
    fn caller_role(&self) -> String {
        self.id().to_string()
    }
}

/// Wall-clock time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant, for deterministic records in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&self, _event: &ContractEvent) {}
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ContractEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ContractEvent> {
        self.events.lock().clone()
    }

    /// Events with the given name.
    pub fn named(&self, name: &str) -> Vec<ContractEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &ContractEvent) {
        tracing::trace!(name = %event.name, "recorded event");
        self.events.lock().push(event.clone());
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: &ContractEvent) {
        (**self).emit(event)
    }
}
