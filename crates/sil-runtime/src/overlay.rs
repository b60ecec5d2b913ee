use std::collections::BTreeMap;

use sil_store::{AccountStore, StoreResult};
use sil_types::{Account, Address};

/// Copy-on-write view of every account a transaction touches.
///
/// Instructions mutate the overlay only. Nothing reaches the store until the
/// runtime takes [`changes`](Self::changes) after the last instruction
/// succeeds; dropping the overlay discards every effect.
#[derive(Debug)]
pub struct TransactionAccounts {
    accounts: BTreeMap<Address, Account>,
    original: BTreeMap<Address, Account>,
}

impl TransactionAccounts {
    /// Load `addresses` from the store. Absent addresses become empty accounts.
    pub fn load(store: &dyn AccountStore, addresses: &[Address]) -> StoreResult<Self> {
        let loaded = store.read_batch(addresses)?;
        let accounts: BTreeMap<Address, Account> = addresses
            .iter()
            .copied()
            .zip(loaded.into_iter().map(Option::unwrap_or_default))
            .collect();
        Ok(Self {
            original: accounts.clone(),
            accounts,
        })
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Account> {
        self.accounts.get_mut(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    /// Sum of lamports across the overlay.
    pub fn total_lamports(&self) -> u128 {
        self.accounts
            .values()
            .map(|account| u128::from(account.lamports))
            .sum()
    }

    /// Sum of lamports as they were when loaded.
    pub fn original_lamports(&self) -> u128 {
        self.original
            .values()
            .map(|account| u128::from(account.lamports))
            .sum()
    }

    /// Accounts whose state differs from what was loaded.
    pub fn changes(&self) -> Vec<(Address, Account)> {
        self.accounts
            .iter()
            .filter(|(address, account)| self.original.get(address) != Some(account))
            .map(|(address, account)| (*address, account.clone()))
            .collect()
    }
}
