//! # Wallet Ledger Operations
//!
//! Initialization, balance lookup and guarded transfer, all staged in the
//! caller's working set.

use crate::domain::entities::{Wallet, WalletGenesis};
use crate::domain::events::TransferEvent;
use hc_01_keyed_store::{KeyPrefix, KeyValueStore, WorkingSet};
use shared_types::{ContractError, Money, Role};

/// Wallet operations parameterized by the genesis balances.
#[derive(Debug, Clone, Default)]
pub struct WalletLedger {
    genesis: WalletGenesis,
}

impl WalletLedger {
    pub fn new(genesis: WalletGenesis) -> Self {
        Self { genesis }
    }

    pub fn genesis(&self) -> &WalletGenesis {
        &self.genesis
    }

    /// Create the seeded wallets that do not exist yet.
    ///
    /// Existing wallets keep their balance. Returns the roles created.
    pub fn initialize<S: KeyValueStore + ?Sized>(
        &self,
        ws: &mut WorkingSet<'_, S>,
    ) -> Result<Vec<Role>, ContractError> {
        let mut created = Vec::new();
        for wallet in self.genesis.wallets() {
            let key = KeyPrefix::wallet_key(wallet.role);
            if ws.exists(&key)? {
                tracing::debug!("[hc-02] Wallet {} already present, leaving it", wallet.role);
                continue;
            }
            tracing::info!(role = %wallet.role, balance = %wallet.balance, "[hc-02] Created wallet");
            created.push(wallet.role);
            stage(ws, &wallet)?;
        }
        Ok(created)
    }

    /// Load the wallet of `role`.
    pub fn wallet<S: KeyValueStore + ?Sized>(
        &self,
        ws: &WorkingSet<'_, S>,
        role: Role,
    ) -> Result<Wallet, ContractError> {
        let key = KeyPrefix::wallet_key(role);
        let bytes = ws.get(&key)?.ok_or_else(|| ContractError::WalletNotFound {
            role: role.id().to_string(),
        })?;
        serde_json::from_slice(&bytes).map_err(|e| ContractError::MalformedRecord {
            key: String::from_utf8_lossy(&key).into_owned(),
            reason: e.to_string(),
        })
    }

    pub fn balance<S: KeyValueStore + ?Sized>(
        &self,
        ws: &WorkingSet<'_, S>,
        role: Role,
    ) -> Result<Money, ContractError> {
        Ok(self.wallet(ws, role)?.balance)
    }

    /// Wallet lookup by raw role identifier.
    ///
    /// Identifiers that name no role have no wallet either.
    pub fn wallet_of<S: KeyValueStore + ?Sized>(
        &self,
        ws: &WorkingSet<'_, S>,
        role_id: &str,
    ) -> Result<Wallet, ContractError> {
        let role = Role::from_id(role_id).ok_or_else(|| ContractError::WalletNotFound {
            role: role_id.to_string(),
        })?;
        self.wallet(ws, role)
    }

    pub fn balance_of<S: KeyValueStore + ?Sized>(
        &self,
        ws: &WorkingSet<'_, S>,
        role_id: &str,
    ) -> Result<Money, ContractError> {
        Ok(self.wallet_of(ws, role_id)?.balance)
    }

    /// Move `amount` from one wallet to another and raise a `BankTransfer` event.
    ///
    /// Every sender except the guarantor must hold at least `amount`.
    pub fn transfer<S: KeyValueStore + ?Sized>(
        &self,
        ws: &mut WorkingSet<'_, S>,
        from: Role,
        to: Role,
        amount: Money,
    ) -> Result<(), ContractError> {
        if amount < Money::ZERO {
            return Err(ContractError::validation(
                "amount",
                format!("transfer amount must not be negative (got {amount})"),
            ));
        }
        if from == to {
            return Err(ContractError::validation(
                "to",
                format!("sender and receiver are both {from}"),
            ));
        }

        let mut sender = self.wallet(ws, from)?;
        let mut receiver = self.wallet(ws, to)?;

        if !from.is_guarantor() && !sender.covers(amount) {
            tracing::warn!(
                role = %from,
                available = %sender.balance,
                required = %amount,
                "[hc-02] Transfer refused"
            );
            return Err(ContractError::InsufficientFunds {
                role: from.id().to_string(),
                available: sender.balance,
                required: amount,
            });
        }

        sender.balance -= amount;
        receiver.balance += amount;
        stage(ws, &sender)?;
        stage(ws, &receiver)?;
        ws.emit(TransferEvent { from, to, amount }.into_event());

        tracing::info!(%from, %to, %amount, "[hc-02] Transfer staged");
        Ok(())
    }
}

fn stage<S: KeyValueStore + ?Sized>(
    ws: &mut WorkingSet<'_, S>,
    wallet: &Wallet,
) -> Result<(), ContractError> {
    let bytes = serde_json::to_vec(wallet).map_err(|e| ContractError::Storage(e.to_string()))?;
    ws.put(KeyPrefix::wallet_key(wallet.role), bytes);
    Ok(())
}
