//! # Integration Scenarios
//!
//! Every scenario drives the contract by function name and positional string
//! arguments, as the CLI does, then checks balances, batch records and the
//! bank transfer events that reached the sink.

pub mod authorization;
pub mod persistence;
pub mod refunds;
pub mod settlement;

// =============================================================================
// TEST FIXTURES (only compiled during tests)
// =============================================================================

#[cfg(test)]
pub(crate) mod harness {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use hc_01_keyed_store::InMemoryKVStore;
    use hc_02_wallet_ledger::{TransferEvent, WalletGenesis, WalletLedger, BANK_TRANSFER_EVENT};
    use hc_03_batch_lifecycle::{BatchLifecycleService, LifecycleDependencies, LifecyclePolicy};
    use node_runtime::{DispatchError, Dispatcher, IdentityDirectory};
    use serde_json::Value;
    use shared_types::{FixedClock, Money, RecordingEventSink};

    pub type TestService =
        BatchLifecycleService<InMemoryKVStore, FixedClock, Arc<RecordingEventSink>>;

    pub const PRODUCER: &str = "ProducerUser";
    pub const LOGISTICS: &str = "LogisticsUser";
    pub const COOPERATIVE: &str = "CooperativeUser";
    pub const REGULATOR: &str = "RegulatorUser";
    pub const IMPORTER: &str = "ImporterUser";

    /// Dispatcher over a fresh in-memory store with wallets initialized.
    pub struct Harness {
        pub dispatcher: Dispatcher<TestService>,
        pub sink: Arc<RecordingEventSink>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_genesis(WalletGenesis::default())
        }

        pub fn with_genesis(genesis: WalletGenesis) -> Self {
            let sink = Arc::new(RecordingEventSink::new());
            let deps = LifecycleDependencies {
                store: InMemoryKVStore::new(),
                clock: FixedClock(Utc.with_ymd_and_hms(2025, 4, 21, 7, 30, 0).unwrap()),
                events: sink.clone(),
            };
            let service = BatchLifecycleService::new(
                deps,
                WalletLedger::new(genesis),
                LifecyclePolicy::default(),
            );
            let mut harness = Self {
                dispatcher: Dispatcher::new(service, IdentityDirectory::default()),
                sink,
            };
            harness.call(IMPORTER, "InitializeWallets", &[]);
            harness.sink.clear();
            harness
        }

        pub fn try_call(
            &mut self,
            identity: &str,
            function: &str,
            args: &[&str],
        ) -> Result<Value, DispatchError> {
            self.dispatcher.invoke(identity, function, args)
        }

        pub fn call(&mut self, identity: &str, function: &str, args: &[&str]) -> Value {
            match self.try_call(identity, function, args) {
                Ok(value) => value,
                Err(e) => panic!("{function}({args:?}) as {identity} failed: {e}"),
            }
        }

        pub fn balance(&mut self, role_id: &str) -> Money {
            let wallet = self.call(PRODUCER, "GetBalance", &[role_id]);
            money(&wallet["balance"])
        }

        /// `(importer, cooperative, producer)` balances.
        pub fn balances(&mut self) -> (Money, Money, Money) {
            (
                self.balance("ImporterMSP"),
                self.balance("CooperativeMSP"),
                self.balance("ProducerMSP"),
            )
        }

        pub fn batch(&mut self, batch_id: &str) -> Value {
            self.call(PRODUCER, "ReadBatch", &[batch_id])
        }

        /// Bank transfers delivered since the harness was built.
        pub fn transfers(&self) -> Vec<TransferEvent> {
            self.sink
                .named(BANK_TRANSFER_EVENT)
                .iter()
                .filter_map(TransferEvent::from_event)
                .collect()
        }

        // ---------------------------------------------------------------------
        // Journey steps
        // ---------------------------------------------------------------------

        pub fn register(&mut self, batch_id: &str, contract_value: &str) -> Value {
            self.call(
                PRODUCER,
                "RegisterHarvest",
                &[
                    batch_id,
                    "Pak Budi",
                    "-7.315, 110.173",
                    "Temanggung Highlands",
                    "Arabica Java",
                    contract_value,
                ],
            )
        }

        pub fn dispatch_local(&mut self, batch_id: &str, temperature: &str) -> Value {
            self.call(
                LOGISTICS,
                "DispatchLocalTransport",
                &[batch_id, "Slamet", "AA 1234 XY", temperature, "-7.300, 110.180"],
            )
        }

        pub fn receive(&mut self, batch_id: &str) -> Value {
            self.call(
                COOPERATIVE,
                "ReceiveAtWarehouse",
                &[batch_id, "Gudang Sindoro", "Temanggung", "-7.310, 110.170"],
            )
        }

        pub fn quality(&mut self, batch_id: &str, score: &str, residue: &str) -> Value {
            self.call(
                COOPERATIVE,
                "ProcessQualityControl",
                &[batch_id, "Full Washed", score, residue, "1200"],
            )
        }

        pub fn approve(&mut self, batch_id: &str, decision: &str) -> Value {
            self.call(REGULATOR, "ApproveExport", &[batch_id, "PEB-2025-0042", decision])
        }

        pub fn ship(&mut self, batch_id: &str, temperature: &str) -> Value {
            self.call(
                LOGISTICS,
                "StartExportShipment",
                &[batch_id, "MV Java Star", "MSKU 123456-7", temperature, "-6.102, 106.880"],
            )
        }

        pub fn try_confirm(&mut self, batch_id: &str, landed: &str) -> Result<Value, DispatchError> {
            self.try_call(
                IMPORTER,
                "ConfirmImport",
                &[batch_id, "Tokyo Coffee Trading", "35.689, 139.691", landed],
            )
        }

        pub fn confirm(&mut self, batch_id: &str, landed: &str) -> Value {
            match self.try_confirm(batch_id, landed) {
                Ok(value) => value,
                Err(e) => panic!("ConfirmImport({batch_id}, {landed}) failed: {e}"),
            }
        }

        /// Register at `contract_value` and drive the batch to `IN_TRANSIT_EXPORT`.
        pub fn in_transit(
            &mut self,
            batch_id: &str,
            contract_value: &str,
            score: &str,
            local_temperature: &str,
            export_temperature: &str,
        ) {
            self.register(batch_id, contract_value);
            self.dispatch_local(batch_id, local_temperature);
            self.receive(batch_id);
            self.quality(batch_id, score, "CLEAN");
            self.approve(batch_id, "APPROVED");
            self.ship(batch_id, export_temperature);
        }
    }

    /// Decimal rendered as a JSON string.
    pub fn money(value: &Value) -> Money {
        match value.as_str().map(str::parse::<Money>) {
            Some(Ok(amount)) => amount,
            _ => panic!("not a money value: {value}"),
        }
    }

    /// `remaining_invoice + total_paid - refunded == net_contract_value`.
    pub fn assert_balanced(batch: &Value) {
        let finance = &batch["finance"];
        assert_eq!(
            money(&finance["remaining_invoice"]) + money(&finance["total_paid"])
                - money(&finance["refunded"]),
            money(&finance["net_contract_value"]),
            "finance out of balance: {finance}"
        );
    }
}
