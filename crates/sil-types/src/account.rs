use serde::{Deserialize, Serialize};

use crate::address::{Address, SYSTEM_PROGRAM_ID};

/// A single account: balance, owning program, and opaque record bytes.
///
/// The store never interprets `data`. Only the owning program may change it;
/// anyone holding a signature may debit lamports from a system-owned account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Deposit held by the account (storage cost plus any free balance).
    pub lamports: u64,
    /// Program allowed to write `data`.
    pub owner: Address,
    /// Serialized record contents.
    pub data: Vec<u8>,
}

impl Account {
    /// Create an account with `space` zeroed bytes.
    pub fn new(lamports: u64, space: usize, owner: Address) -> Self {
        Self {
            lamports,
            owner,
            data: vec![0u8; space],
        }
    }

    /// A system-owned account holding only lamports.
    pub fn with_lamports(lamports: u64) -> Self {
        Self::new(lamports, 0, SYSTEM_PROGRAM_ID)
    }

    /// Returns `true` if the address holds anything at all.
    ///
    /// Accounts with no lamports and no data are treated as absent and are
    /// removed from the store on commit.
    pub fn is_populated(&self) -> bool {
        self.lamports > 0 || !self.data.is_empty()
    }

    /// Returns `true` if the account is owned by `program`.
    pub fn is_owned_by(&self, program: &Address) -> bool {
        self.owner == *program
    }

    /// Length of the allocated data region.
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocates_zeroed_space() {
        let owner = Address::from_tag(b"owner");
        let account = Account::new(10, 16, owner);
        assert_eq!(account.data_len(), 16);
        assert!(account.data.iter().all(|b| *b == 0));
        assert!(account.is_owned_by(&owner));
    }

    #[test]
    fn default_account_is_absent() {
        assert!(!Account::default().is_populated());
        assert!(Account::with_lamports(1).is_populated());
        assert!(Account::new(0, 1, SYSTEM_PROGRAM_ID).is_populated());
    }
}
