use sil_types::{Account, Address};

use crate::error::StoreResult;

/// Address-keyed account store.
///
/// All implementations must satisfy these invariants:
/// - `commit` applies every change in the batch or none of them.
/// - An account written with zero lamports and empty data is deleted.
/// - Reads never observe half of a batch.
pub trait AccountStore: Send + Sync {
    /// Read an account by address.
    ///
    /// Returns `Ok(None)` if nothing is stored at the address.
    fn read(&self, address: &Address) -> StoreResult<Option<Account>>;

    /// Check whether anything is stored at the address.
    fn exists(&self, address: &Address) -> StoreResult<bool> {
        Ok(self.read(address)?.is_some())
    }

    /// Atomically apply a batch of account states.
    fn commit(&self, changes: &[(Address, Account)]) -> StoreResult<()>;

    /// Read multiple accounts in a batch.
    ///
    /// Default implementation calls `read()` for each address. Backends may
    /// override to read under a single lock.
    fn read_batch(&self, addresses: &[Address]) -> StoreResult<Vec<Option<Account>>> {
        addresses.iter().map(|address| self.read(address)).collect()
    }
}
