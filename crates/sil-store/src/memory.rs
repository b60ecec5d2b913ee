use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use sil_types::{Account, Address};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::AccountStore;

/// In-memory, HashMap-based account store.
///
/// Intended for tests and embedding. All accounts are held in memory behind
/// a `RwLock`; a commit batch is applied under a single write guard.
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Address, Account>>,
    read_only: AtomicBool,
}

impl InMemoryAccountStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            read_only: AtomicBool::new(false),
        }
    }

    /// Number of accounts currently stored.
    pub fn len(&self) -> usize {
        self.accounts.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.accounts.read().expect("lock poisoned").is_empty()
    }

    /// Sum of lamports across all stored accounts.
    pub fn total_lamports(&self) -> u128 {
        self.accounts
            .read()
            .expect("lock poisoned")
            .values()
            .map(|account| u128::from(account.lamports))
            .sum()
    }

    /// Reject every subsequent commit with [`StoreError::ReadOnly`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn read(&self, address: &Address) -> StoreResult<Option<Account>> {
        let map = self.accounts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(address).cloned())
    }

    fn commit(&self, changes: &[(Address, Account)]) -> StoreResult<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.accounts.write().map_err(|_| StoreError::Poisoned)?;
        for (address, account) in changes {
            if account.is_populated() {
                map.insert(*address, account.clone());
            } else {
                map.remove(address);
            }
        }
        trace!(changes = changes.len(), "committed account batch");
        Ok(())
    }

    fn read_batch(&self, addresses: &[Address]) -> StoreResult<Vec<Option<Account>>> {
        let map = self.accounts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(addresses.iter().map(|a| map.get(a).cloned()).collect())
    }
}

impl std::fmt::Debug for InMemoryAccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAccountStore")
            .field("account_count", &self.len())
            .finish()
    }
}
