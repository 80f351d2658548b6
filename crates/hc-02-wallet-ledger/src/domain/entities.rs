use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{Money, Role};

/// Balance record of one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub role: Role,
    pub balance: Money,
}

impl Wallet {
    pub fn new(role: Role, balance: Money) -> Self {
        Self { role, balance }
    }

    /// Whether this wallet may pay `amount` without the guarantor exemption.
    pub fn covers(&self, amount: Money) -> bool {
        self.balance >= amount
    }
}

/// Starting balances seeded by wallet initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletGenesis {
    pub importer: Money,
    pub cooperative: Money,
    pub producer: Money,
}

impl Default for WalletGenesis {
    fn default() -> Self {
        Self {
            importer: Decimal::from(10_000_000_000u64),
            cooperative: Decimal::from(5_000_000_000u64),
            producer: Decimal::ZERO,
        }
    }
}

impl WalletGenesis {
    /// Seeded wallets in creation order.
    pub fn wallets(&self) -> [Wallet; 3] {
        [
            Wallet::new(Role::Importer, self.importer),
            Wallet::new(Role::Cooperative, self.cooperative),
            Wallet::new(Role::Producer, self.producer),
        ]
    }
}
