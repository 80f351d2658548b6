//! Catalog of the callable contract functions.

use std::fmt;

/// A function addressable by name through the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    InitializeWallets,
    GetBalance,
    RegisterHarvest,
    DispatchLocalTransport,
    RecordCheckpoint,
    ReceiveAtWarehouse,
    ProcessQualityControl,
    ApproveExport,
    StartExportShipment,
    ConfirmImport,
    ReadBatch,
    BatchExists,
    ListAllBatches,
    ScanBatches,
}

impl Function {
    pub const ALL: [Function; 14] = [
        Function::InitializeWallets,
        Function::GetBalance,
        Function::RegisterHarvest,
        Function::DispatchLocalTransport,
        Function::RecordCheckpoint,
        Function::ReceiveAtWarehouse,
        Function::ProcessQualityControl,
        Function::ApproveExport,
        Function::StartExportShipment,
        Function::ConfirmImport,
        Function::ReadBatch,
        Function::BatchExists,
        Function::ListAllBatches,
        Function::ScanBatches,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Function::InitializeWallets => "InitializeWallets",
            Function::GetBalance => "GetBalance",
            Function::RegisterHarvest => "RegisterHarvest",
            Function::DispatchLocalTransport => "DispatchLocalTransport",
            Function::RecordCheckpoint => "RecordCheckpoint",
            Function::ReceiveAtWarehouse => "ReceiveAtWarehouse",
            Function::ProcessQualityControl => "ProcessQualityControl",
            Function::ApproveExport => "ApproveExport",
            Function::StartExportShipment => "StartExportShipment",
            Function::ConfirmImport => "ConfirmImport",
            Function::ReadBatch => "ReadBatch",
            Function::BatchExists => "BatchExists",
            Function::ListAllBatches => "ListAllBatches",
            Function::ScanBatches => "ScanBatches",
        }
    }

    /// Positional parameter names, in call order.
    pub const fn parameters(self) -> &'static [&'static str] {
        match self {
            Function::InitializeWallets | Function::ListAllBatches | Function::ScanBatches => &[],
            Function::GetBalance => &["roleId"],
            Function::RegisterHarvest => &[
                "batchId",
                "producer",
                "farmGeo",
                "locationName",
                "coffeeType",
                "contractValue",
            ],
            Function::DispatchLocalTransport => {
                &["batchId", "driver", "plate", "temperature", "currentGeo"]
            }
            Function::RecordCheckpoint => &["batchId", "location", "geo", "activity"],
            Function::ReceiveAtWarehouse => &["batchId", "warehouseName", "city", "geo"],
            Function::ProcessQualityControl => {
                &["batchId", "method", "cuppingScore", "residue", "netWeight"]
            }
            Function::ApproveExport => &["batchId", "documentNumber", "decision"],
            Function::StartExportShipment => {
                &["batchId", "vessel", "container", "temperature", "originGeo"]
            }
            Function::ConfirmImport => &["batchId", "importerName", "destGeo", "landedScore"],
            Function::ReadBatch | Function::BatchExists => &["batchId"],
        }
    }

    pub fn arity(self) -> usize {
        self.parameters().len()
    }

    /// Whether the function only reads.
    pub fn is_query(self) -> bool {
        matches!(
            self,
            Function::GetBalance
                | Function::ReadBatch
                | Function::BatchExists
                | Function::ListAllBatches
                | Function::ScanBatches
        )
    }

    /// Look up a function by its name or a legacy alias.
    pub fn from_name(name: &str) -> Option<Function> {
        if let Some(function) = Function::ALL.into_iter().find(|f| f.name() == name) {
            return Some(function);
        }
        match name {
            "InitWallet" => Some(Function::InitializeWallets),
            "GetWalletBalance" => Some(Function::GetBalance),
            "CreateBatch" => Some(Function::RegisterHarvest),
            "TransportToWarehouse" => Some(Function::DispatchLocalTransport),
            "AddCheckpoint" => Some(Function::RecordCheckpoint),
            "ProcessAndQC" => Some(Function::ProcessQualityControl),
            "GetAllBatches" => Some(Function::ListAllBatches),
            _ => None,
        }
    }

    /// `Name(param, ...)` usage line.
    pub fn usage(self) -> String {
        format!("{}({})", self.name(), self.parameters().join(", "))
    }

    /// One line of the function listing; read-only functions are marked.
    pub fn listing(self) -> String {
        if self.is_query() {
            format!("{}  [read-only]", self.usage())
        } else {
            self.usage()
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
