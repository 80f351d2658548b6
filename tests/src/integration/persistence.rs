//! # Persistence Scenarios
//!
//! The runtime container over the file-backed store: a batch started in one
//! process finishes in another, and refused calls leave the file untouched.

#[cfg(test)]
mod tests {
    use std::path::Path;

    use node_runtime::container::{RuntimeConfig, RuntimeContainer, StorageBackend, StorageConfig};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::Value;

    fn container(dir: &Path) -> RuntimeContainer {
        let config = RuntimeConfig {
            storage: StorageConfig {
                data_dir: dir.to_path_buf(),
                backend: StorageBackend::File,
            },
            ..RuntimeConfig::default()
        };
        match RuntimeContainer::new(config) {
            Ok(container) => container,
            Err(e) => panic!("runtime failed to start: {e}"),
        }
    }

    fn call(container: &mut RuntimeContainer, identity: &str, function: &str, args: &[&str]) -> Value {
        match container.dispatcher.invoke(identity, function, args) {
            Ok(value) => value,
            Err(e) => panic!("{function} as {identity} failed: {e}"),
        }
    }

    #[test]
    fn test_journey_spans_restarts() {
        let dir = tempfile::tempdir().unwrap();

        let steps: [(&str, &str, &[&str]); 7] = [
            (
                "ProducerUser",
                "RegisterHarvest",
                &["KOPI-301", "Pak Budi", "-7.3, 110.1", "Temanggung", "Arabica", "10000"],
            ),
            (
                "LogisticsUser",
                "DispatchLocalTransport",
                &["KOPI-301", "Slamet", "AA 1", "22", "-7.3, 110.1"],
            ),
            (
                "CooperativeUser",
                "ReceiveAtWarehouse",
                &["KOPI-301", "Gudang", "Temanggung", "-7.3, 110.1"],
            ),
            (
                "CooperativeUser",
                "ProcessQualityControl",
                &["KOPI-301", "Washed", "90", "CLEAN", "1000"],
            ),
            ("RegulatorUser", "ApproveExport", &["KOPI-301", "PEB-9", "APPROVED"]),
            (
                "LogisticsUser",
                "StartExportShipment",
                &["KOPI-301", "MV Java Star", "MSKU 1", "20", "-6.1, 106.8"],
            ),
            (
                "ImporterUser",
                "ConfirmImport",
                &["KOPI-301", "Tokyo Coffee Trading", "35.6, 139.6", "90"],
            ),
        ];

        {
            let mut first = container(dir.path());
            call(&mut first, "ImporterUser", "InitializeWallets", &[]);
        }
        // One process per step, like separate CLI invocations.
        for (identity, function, args) in steps {
            let mut runtime = container(dir.path());
            call(&mut runtime, identity, function, args);
        }

        let mut last = container(dir.path());
        let batch = call(&mut last, "RegulatorUser", "ReadBatch", &["KOPI-301"]);
        assert_eq!(batch["status"], "IMPORT_ACCEPTED");
        assert_eq!(batch["journey"].as_array().map(Vec::len), Some(5));

        let cooperative = call(&mut last, "RegulatorUser", "GetBalance", &["CooperativeMSP"]);
        let balance = cooperative["balance"].as_str().and_then(|s| s.parse::<Decimal>().ok());
        assert_eq!(balance, Some(dec!(5000002100)));
    }

    #[test]
    fn test_refused_call_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut runtime = container(dir.path());
        call(&mut runtime, "ImporterUser", "InitializeWallets", &[]);
        call(
            &mut runtime,
            "ProducerUser",
            "RegisterHarvest",
            &["KOPI-302", "Pak Budi", "geo", "Temanggung", "Arabica", "10000"],
        );

        let file = runtime.config.storage.ledger_file();
        let before = std::fs::read(&file).unwrap();

        let refused = runtime.dispatcher.invoke(
            "CooperativeUser",
            "ReceiveAtWarehouse",
            &["KOPI-302", "Gudang", "Temanggung", "geo"],
        );
        assert!(refused.is_err());
        assert_eq!(std::fs::read(&file).unwrap(), before);
    }
}
