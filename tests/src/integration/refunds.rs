//! # Refund Scenarios
//!
//! Every terminal failure sends the down payment back to the importer out of
//! the guarantor's wallet and zeroes what the batch still owes.

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use hc_02_wallet_ledger::{TransferEvent, WalletGenesis};
    use rust_decimal_macros::dec;
    use shared_types::{ErrorKind, Role};

    fn refund() -> TransferEvent {
        TransferEvent {
            from: Role::Cooperative,
            to: Role::Importer,
            amount: dec!(500),
        }
    }

    fn assert_refunded(batch: &serde_json::Value, payment_status: &str) {
        assert_eq!(batch["finance"]["payment_status"], payment_status);
        assert_eq!(money(&batch["finance"]["remaining_invoice"]), dec!(0));
        // The down payment stays on record as paid; the refund is booked beside it.
        assert_eq!(money(&batch["finance"]["total_paid"]), dec!(500));
        assert_eq!(money(&batch["finance"]["refunded"]), dec!(500));
        assert_eq!(money(&batch["finance"]["net_contract_value"]), dec!(0));
        assert_balanced(batch);
    }

    #[test]
    fn test_failed_quality_control_refunds_from_guarantor() {
        // An empty guarantor wallet shows the overdraft exemption.
        let mut h = Harness::with_genesis(WalletGenesis {
            cooperative: dec!(0),
            ..WalletGenesis::default()
        });
        h.register("KOPI-101", "10000");
        h.dispatch_local("KOPI-101", "24");
        h.receive("KOPI-101");
        h.sink.clear();

        let batch = h.quality("KOPI-101", "60", "CLEAN");

        assert_eq!(batch["status"], "QC_FAILED");
        assert_refunded(&batch, "REFUNDED_QC_FAILED");
        assert!(batch["issue_notes"]
            .to_string()
            .contains("EXPORT FAILED: poor cup quality or residue detected"));

        let (importer, cooperative, producer) = h.balances();
        assert_eq!(cooperative, dec!(-500));
        assert_eq!(importer, dec!(10000000000));
        // The producer keeps the down payment.
        assert_eq!(producer, dec!(500));
        assert_eq!(h.transfers(), vec![refund()]);
    }

    #[test]
    fn test_contaminated_batch_fails_despite_high_score() {
        let mut h = Harness::new();
        h.register("KOPI-102", "10000");
        h.dispatch_local("KOPI-102", "24");
        h.receive("KOPI-102");

        let batch = h.quality("KOPI-102", "92", "CONTAMINATED");

        assert_eq!(batch["status"], "QC_FAILED");
        assert_eq!(money(&batch["finance"]["quality_bonus"]), dec!(0));
        assert_refunded(&batch, "REFUNDED_QC_FAILED");
    }

    #[test]
    fn test_failed_batch_cannot_be_approved() {
        let mut h = Harness::new();
        h.register("KOPI-103", "10000");
        h.dispatch_local("KOPI-103", "24");
        h.receive("KOPI-103");
        h.quality("KOPI-103", "50", "CLEAN");

        let err = h
            .try_call(REGULATOR, "ApproveExport", &["KOPI-103", "PEB-1", "APPROVED"])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        let message = err.to_string();
        assert!(message.contains("READY_FOR_EXPORT"), "{message}");
        assert!(message.contains("QC_FAILED"), "{message}");
    }

    #[test]
    fn test_export_rejection_refunds() {
        let mut h = Harness::new();
        h.register("KOPI-104", "10000");
        h.dispatch_local("KOPI-104", "24");
        h.receive("KOPI-104");
        h.quality("KOPI-104", "75", "CLEAN");
        h.sink.clear();

        let batch = h.approve("KOPI-104", "REJECTED");

        assert_eq!(batch["status"], "EXPORT_REJECTED");
        assert_refunded(&batch, "REFUNDED_EXPORT_REJECTED");
        assert_eq!(h.transfers(), vec![refund()]);

        let err = h
            .try_call(
                LOGISTICS,
                "StartExportShipment",
                &["KOPI-104", "MV Java Star", "MSKU 1", "20", "-6.1, 106.8"],
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[test]
    fn test_unknown_decision_is_rejected_without_side_effects() {
        let mut h = Harness::new();
        h.register("KOPI-105", "10000");
        h.dispatch_local("KOPI-105", "24");
        h.receive("KOPI-105");
        h.quality("KOPI-105", "75", "CLEAN");
        let before = h.batch("KOPI-105");
        h.sink.clear();

        let err = h
            .try_call(REGULATOR, "ApproveExport", &["KOPI-105", "PEB-1", "MAYBE"])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.batch("KOPI-105"), before);
        assert!(h.sink.events().is_empty());
    }

    #[test]
    fn test_low_landed_score_rejects_import() {
        let mut h = Harness::new();
        h.in_transit("KOPI-106", "10000", "90", "24", "20");
        h.sink.clear();

        let batch = h.confirm("KOPI-106", "70");

        assert_eq!(batch["status"], "IMPORT_REJECTED");
        assert_refunded(&batch, "REFUNDED_IMPORT_REJECTED");
        assert!(batch["issue_notes"]
            .to_string()
            .contains("REJECTED: landed score 70 is below the minimum of 80"));
        assert_eq!(batch["import"]["landed_score"], 70);
        assert_eq!(h.transfers(), vec![refund()]);

        let (_, cooperative, _) = h.balances();
        assert_eq!(cooperative, dec!(5000000000) - dec!(500));
    }

    #[test]
    fn test_terminal_batches_accept_no_further_checkpoints() {
        let mut h = Harness::new();
        h.in_transit("KOPI-107", "10000", "90", "24", "20");
        h.confirm("KOPI-107", "40");
        let before = h.batch("KOPI-107");

        let err = h
            .try_call(
                LOGISTICS,
                "RecordCheckpoint",
                &["KOPI-107", "Yokohama", "35.44, 139.64", "Late scan"],
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(h.batch("KOPI-107"), before);
    }
}
