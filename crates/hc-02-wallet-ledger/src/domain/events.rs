use serde::{Deserialize, Serialize};
use shared_types::{ContractEvent, Money, Role};

/// Name of the event raised by every transfer.
pub const BANK_TRANSFER_EVENT: &str = "BankTransfer";

/// Payload of a `BankTransfer` event: the instruction handed to the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub from: Role,
    pub to: Role,
    pub amount: Money,
}

impl TransferEvent {
    pub fn into_event(self) -> ContractEvent {
        // Role and Decimal always serialize
        let payload = serde_json::to_value(&self).unwrap_or(serde_json::Value::Null);
        ContractEvent::new(BANK_TRANSFER_EVENT, payload)
    }

    /// Read the payload back out of a delivered event.
    pub fn from_event(event: &ContractEvent) -> Option<Self> {
        if event.name != BANK_TRANSFER_EVENT {
            return None;
        }
        serde_json::from_value(event.payload.clone()).ok()
    }
}
