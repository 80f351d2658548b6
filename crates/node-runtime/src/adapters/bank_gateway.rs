//! # Bank Gateway Adapter
//!
//! Event sink standing in for the bank settlement hand-off. Every committed
//! `BankTransfer` becomes one structured "transfer request" log line.

use std::sync::atomic::{AtomicUsize, Ordering};

use hc_02_wallet_ledger::{TransferEvent, BANK_TRANSFER_EVENT};
use shared_types::{ContractEvent, EventSink};

/// Forwards transfer events to the (simulated) bank.
#[derive(Debug, Default)]
pub struct BankGateway {
    forwarded: AtomicUsize,
}

impl BankGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of transfer requests handed off so far.
    pub fn forwarded(&self) -> usize {
        self.forwarded.load(Ordering::Relaxed)
    }
}

impl EventSink for BankGateway {
    fn emit(&self, event: &ContractEvent) {
        if event.name != BANK_TRANSFER_EVENT {
            tracing::debug!(name = %event.name, payload = %event.payload, "[runtime] Contract event");
            return;
        }

        match TransferEvent::from_event(event) {
            Some(transfer) => {
                self.forwarded.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    from = %transfer.from,
                    to = %transfer.to,
                    amount = %transfer.amount,
                    "[runtime] Bank transfer request"
                );
            }
            None => {
                tracing::warn!(payload = %event.payload, "[runtime] Unreadable bank transfer event dropped");
            }
        }
    }
}
