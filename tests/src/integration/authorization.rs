//! # Authorization Scenarios
//!
//! Each state-changing function accepts exactly one role. Callers are
//! checked twice: the identity must be enrolled, and its role must match.

#[cfg(test)]
mod tests {
    use super::super::harness::*;
    use node_runtime::DispatchError;
    use shared_types::ErrorKind;

    const IDENTITIES: [&str; 5] = [PRODUCER, LOGISTICS, COOPERATIVE, REGULATOR, IMPORTER];

    /// Every identity except `allowed` is refused `function`, and the
    /// stored batch is unchanged afterwards.
    fn assert_only(h: &mut Harness, allowed: &str, function: &str, args: &[&str]) {
        let before = h.batch(args[0]);
        for identity in IDENTITIES.into_iter().filter(|i| *i != allowed) {
            let err = h.try_call(identity, function, args).unwrap_err();
            assert_eq!(
                err.kind(),
                ErrorKind::Unauthorized,
                "{identity} must not call {function}"
            );
            assert_eq!(h.batch(args[0]), before);
        }
        h.call(allowed, function, args);
    }

    #[test]
    fn test_each_step_accepts_one_role() {
        let mut h = Harness::new();
        h.register("KOPI-201", "10000");

        assert_only(
            &mut h,
            LOGISTICS,
            "DispatchLocalTransport",
            &["KOPI-201", "Slamet", "AA 1", "22", "-7.3, 110.1"],
        );
        assert_only(
            &mut h,
            LOGISTICS,
            "RecordCheckpoint",
            &["KOPI-201", "Secang", "-7.4, 110.2", "Rest stop"],
        );
        assert_only(
            &mut h,
            COOPERATIVE,
            "ReceiveAtWarehouse",
            &["KOPI-201", "Gudang", "Temanggung", "-7.3, 110.1"],
        );
        assert_only(
            &mut h,
            COOPERATIVE,
            "ProcessQualityControl",
            &["KOPI-201", "Washed", "88", "CLEAN", "1000"],
        );
        assert_only(&mut h, REGULATOR, "ApproveExport", &["KOPI-201", "PEB-7", "APPROVED"]);
        assert_only(
            &mut h,
            LOGISTICS,
            "StartExportShipment",
            &["KOPI-201", "MV Java Star", "MSKU 1", "20", "-6.1, 106.8"],
        );
        assert_only(
            &mut h,
            IMPORTER,
            "ConfirmImport",
            &["KOPI-201", "Tokyo Coffee Trading", "35.6, 139.6", "88"],
        );

        assert_eq!(h.batch("KOPI-201")["status"], "IMPORT_ACCEPTED");
    }

    #[test]
    fn test_registration_is_producer_only() {
        let mut h = Harness::new();
        let args = ["KOPI-202", "Pak Budi", "geo", "Temanggung", "Arabica", "10000"];

        for identity in [LOGISTICS, COOPERATIVE, REGULATOR, IMPORTER] {
            let err = h.try_call(identity, "RegisterHarvest", &args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert_eq!(h.call(REGULATOR, "BatchExists", &["KOPI-202"]), false);
        assert!(h.transfers().is_empty());

        h.call(PRODUCER, "RegisterHarvest", &args);
        assert_eq!(h.call(REGULATOR, "BatchExists", &["KOPI-202"]), true);
    }

    #[test]
    fn test_queries_are_open_to_every_enrolled_identity() {
        let mut h = Harness::new();
        h.register("KOPI-203", "10000");

        for identity in IDENTITIES {
            h.call(identity, "ReadBatch", &["KOPI-203"]);
            h.call(identity, "ListAllBatches", &[]);
            h.call(identity, "GetBalance", &["ImporterMSP"]);
        }
    }

    #[test]
    fn test_unenrolled_identity_cannot_even_read() {
        let mut h = Harness::new();
        let err = h.try_call("Mallory", "ListAllBatches", &[]).unwrap_err();
        assert!(matches!(err, DispatchError::UnknownIdentity { .. }));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_unknown_wallet_and_batch_are_not_found() {
        let mut h = Harness::new();

        let wallet = h.try_call(PRODUCER, "GetBalance", &["LogisticsMSP"]).unwrap_err();
        assert_eq!(wallet.kind(), ErrorKind::NotFound);

        let bogus = h.try_call(PRODUCER, "GetBalance", &["NobodyMSP"]).unwrap_err();
        assert_eq!(bogus.kind(), ErrorKind::NotFound);

        let batch = h.try_call(PRODUCER, "ReadBatch", &["KOPI-404"]).unwrap_err();
        assert_eq!(batch.kind(), ErrorKind::NotFound);

        let wallet_key = h
            .try_call(PRODUCER, "ReadBatch", &["WALLET_ImporterMSP"])
            .unwrap_err();
        assert_eq!(wallet_key.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_duplicate_and_reserved_batch_ids() {
        let mut h = Harness::new();
        h.register("KOPI-204", "10000");

        let duplicate = h
            .try_call(
                PRODUCER,
                "RegisterHarvest",
                &["KOPI-204", "Pak Budi", "geo", "Temanggung", "Arabica", "10000"],
            )
            .unwrap_err();
        assert_eq!(duplicate.kind(), ErrorKind::AlreadyExists);

        for id in ["", "WALLET_ProducerMSP"] {
            let err = h
                .try_call(
                    PRODUCER,
                    "RegisterHarvest",
                    &[id, "Pak Budi", "geo", "Temanggung", "Arabica", "10000"],
                )
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "batch id {id:?}");
        }

        let zero = h
            .try_call(
                PRODUCER,
                "RegisterHarvest",
                &["KOPI-205", "Pak Budi", "geo", "Temanggung", "Arabica", "0"],
            )
            .unwrap_err();
        assert_eq!(zero.kind(), ErrorKind::Validation);
        assert_eq!(h.transfers().len(), 1);
    }
}
