//! # Settlement Scenarios
//!
//! Batches that reach `IMPORT_ACCEPTED`: bonus, heat penalties, degradation
//! and the cooperative/producer split of the final transfer.

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use hc_02_wallet_ledger::{TransferEvent, WalletGenesis};
    use node_runtime::DispatchError;
    use rust_decimal_macros::dec;
    use shared_types::{ErrorKind, Role};

    #[test]
    fn test_registration_releases_down_payment() {
        let mut h = Harness::new();
        let batch = h.register("KOPI-001", "10000");

        assert_eq!(batch["status"], "HARVESTED");
        assert_eq!(batch["finance"]["payment_status"], "DOWN_PAYMENT_RELEASED");
        assert_eq!(money(&batch["finance"]["down_payment"]), dec!(500));
        assert_eq!(money(&batch["finance"]["remaining_invoice"]), dec!(9500));
        assert_balanced(&batch);

        assert_eq!(
            h.transfers(),
            vec![TransferEvent {
                from: Role::Importer,
                to: Role::Producer,
                amount: dec!(500),
            }]
        );
        let (importer, _, producer) = h.balances();
        assert_eq!(importer, dec!(10000000000) - dec!(500));
        assert_eq!(producer, dec!(500));
    }

    #[test]
    fn test_full_journey_with_bonus_settles_shares() {
        let mut h = Harness::new();
        h.in_transit("KOPI-001", "10000", "90", "24.5", "18");
        let batch = h.batch("KOPI-001");
        assert_eq!(batch["status"], "IN_TRANSIT_EXPORT");
        assert_eq!(money(&batch["finance"]["quality_bonus"]), dec!(1000));

        let settled = h.confirm("KOPI-001", "90");

        assert_eq!(settled["status"], "IMPORT_ACCEPTED");
        assert_eq!(settled["finance"]["payment_status"], "FULLY_SETTLED");
        assert_eq!(money(&settled["finance"]["final_payout"]), dec!(10500));
        assert_eq!(money(&settled["finance"]["total_paid"]), dec!(11000));
        assert_eq!(money(&settled["finance"]["remaining_invoice"]), dec!(0));
        assert_balanced(&settled);

        let (importer, cooperative, producer) = h.balances();
        assert_eq!(importer, dec!(10000000000) - dec!(500) - dec!(10500));
        assert_eq!(cooperative, dec!(5000000000) + dec!(2100));
        assert_eq!(producer, dec!(500) + dec!(8400));

        let amounts: Vec<_> = h.transfers().iter().map(|t| (t.to, t.amount)).collect();
        assert_eq!(
            amounts,
            vec![
                (Role::Producer, dec!(500)),
                (Role::Cooperative, dec!(2100)),
                (Role::Producer, dec!(8400)),
            ]
        );

        let last = settled["journey"].as_array().and_then(|j| j.last()).cloned().unwrap();
        assert_eq!(last["actor"], "Tokyo Coffee Trading");
        assert_eq!(last["activity"], "Landed quality verification (score 90)");
    }

    #[test]
    fn test_degradation_is_deducted_per_point() {
        let mut h = Harness::new();
        h.in_transit("KOPI-002", "10000", "90", "24", "20");

        let settled = h.confirm("KOPI-002", "85");

        // 9 500 + 1 000 bonus - 5 points x 1 % x 10 000
        assert_eq!(money(&settled["finance"]["final_payout"]), dec!(10000));
        assert_eq!(money(&settled["finance"]["penalty_deductions"]), dec!(500));
        assert_balanced(&settled);
        let notes = settled["issue_notes"].to_string();
        assert!(notes.contains("Quality degraded by 5 points (deduction 5.00%)"), "{notes}");

        let (_, cooperative, producer) = h.balances();
        assert_eq!(cooperative, dec!(5000000000) + dec!(2000));
        assert_eq!(producer, dec!(500) + dec!(8000));
    }

    #[test]
    fn test_export_heat_penalty_without_bonus() {
        let mut h = Harness::new();
        h.in_transit("KOPI-003", "10000", "80", "24", "26.5");

        let batch = h.batch("KOPI-003");
        assert_eq!(money(&batch["finance"]["quality_bonus"]), dec!(0));
        assert_eq!(money(&batch["finance"]["penalty_deductions"]), dec!(500));
        assert!(batch["issue_notes"]
            .to_string()
            .contains("PENALTY: container overheated (26.5°C)"));

        let settled = h.confirm("KOPI-003", "80");
        assert_eq!(money(&settled["finance"]["final_payout"]), dec!(9000));

        let (_, cooperative, producer) = h.balances();
        assert_eq!(cooperative, dec!(5000000000) + dec!(1800));
        assert_eq!(producer, dec!(500) + dec!(7200));
    }

    #[test]
    fn test_penalties_beyond_invoice_pay_nothing() {
        let mut h = Harness::new();
        // Local heat penalty of 500 000 dwarfs a 10 000 contract.
        h.in_transit("KOPI-004", "10000", "90", "31", "20");
        h.sink.clear();

        let settled = h.confirm("KOPI-004", "90");

        assert_eq!(settled["status"], "IMPORT_ACCEPTED");
        assert_eq!(settled["finance"]["payment_status"], "FULLY_SETTLED");
        assert_eq!(money(&settled["finance"]["final_payout"]), dec!(0));
        assert_eq!(money(&settled["finance"]["total_paid"]), dec!(500));
        assert_balanced(&settled);
        // Zero legs are not transferred.
        assert!(h.transfers().is_empty());
    }

    #[test]
    fn test_importer_short_of_funds_aborts_settlement() {
        let mut h = Harness::with_genesis(WalletGenesis {
            importer: dec!(600),
            ..WalletGenesis::default()
        });
        h.in_transit("KOPI-005", "10000", "90", "24", "20");
        let before_batch = h.batch("KOPI-005");
        let before_balances = h.balances();
        h.sink.clear();

        let err = h.try_confirm("KOPI-005", "90").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);
        assert!(matches!(err, DispatchError::Contract(_)));
        assert_eq!(h.batch("KOPI-005"), before_batch);
        assert_eq!(h.balances(), before_balances);
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn test_checkpoints_accumulate_along_the_journey() {
        let mut h = Harness::new();
        h.register("KOPI-006", "10000");
        h.dispatch_local("KOPI-006", "22");
        h.call(
            LOGISTICS,
            "RecordCheckpoint",
            &["KOPI-006", "Secang rest area", "-7.40, 110.26", "Driver rest stop"],
        );
        h.receive("KOPI-006");
        h.quality("KOPI-006", "86", "CLEAN");
        h.approve("KOPI-006", "APPROVED");
        h.ship("KOPI-006", "20");
        h.call(
            LOGISTICS,
            "RecordCheckpoint",
            &["KOPI-006", "Strait of Malacca", "2.50, 101.00", "Vessel position report"],
        );
        let settled = h.confirm("KOPI-006", "86");

        let journey = settled["journey"].as_array().cloned().unwrap_or_default();
        let activities: Vec<_> = journey
            .iter()
            .filter_map(|c| c["activity"].as_str().map(str::to_string))
            .collect();
        assert_eq!(activities.len(), 7, "{activities:?}");
        assert_eq!(activities[0], "Harvest & initial registration");
        assert_eq!(activities[2], "Driver rest stop");
        assert_eq!(activities[5], "Vessel position report");
        assert_eq!(activities[6], "Landed quality verification (score 86)");
        assert!(journey
            .iter()
            .all(|c| c["timestamp"] == "2025-04-21 07:30:00 UTC"));
    }

    #[test]
    fn test_listing_returns_batches_in_key_order_without_wallets() {
        let mut h = Harness::new();
        h.register("KOPI-B", "2000");
        h.register("KOPI-A", "3000");
        h.register("KOPI-C", "4000");

        let listed = h.call(PRODUCER, "ListAllBatches", &[]);
        let ids: Vec<_> = listed
            .as_array()
            .map(|batches| batches.iter().map(|b| b["batch_id"].clone()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["KOPI-A", "KOPI-B", "KOPI-C"]);

        let scan = h.call(PRODUCER, "ScanBatches", &[]);
        assert_eq!(scan["skipped"], 0);
    }

    #[test]
    fn test_genesis_constants() {
        let mut h = Harness::new();
        let (importer, cooperative, producer) = h.balances();
        assert_eq!(importer, dec!(10000000000));
        assert_eq!(cooperative, dec!(5000000000));
        assert_eq!(producer, dec!(0));
    }
}
