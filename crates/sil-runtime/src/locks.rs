use std::collections::{HashMap, HashSet};
use std::sync::{Condvar, Mutex};

use sil_types::Address;
use tracing::trace;

/// Per-address account locks.
///
/// A writable account is held by at most one transaction; read-only
/// accounts may be shared by any number of readers but never overlap a
/// writer. A transaction acquires all of its locks at once or waits, so two
/// transactions can never interleave on the same writable account and lock
/// ordering cannot deadlock.
pub struct AccountLocks {
    state: Mutex<LockState>,
    released: Condvar,
}

#[derive(Default)]
struct LockState {
    write: HashSet<Address>,
    read: HashMap<Address, usize>,
}

impl LockState {
    fn can_lock(&self, writable: &[Address], readonly: &[Address]) -> bool {
        writable
            .iter()
            .all(|a| !self.write.contains(a) && !self.read.contains_key(a))
            && readonly.iter().all(|a| !self.write.contains(a))
    }
}

impl AccountLocks {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LockState::default()),
            released: Condvar::new(),
        }
    }

    /// Block until every address can be locked, then lock them all.
    pub fn lock(&self, writable: Vec<Address>, readonly: Vec<Address>) -> AccountLockGuard<'_> {
        let mut state = self.state.lock().expect("lock poisoned");
        while !state.can_lock(&writable, &readonly) {
            state = self.released.wait(state).expect("lock poisoned");
        }
        for address in &writable {
            state.write.insert(*address);
        }
        for address in &readonly {
            *state.read.entry(*address).or_insert(0) += 1;
        }
        trace!(
            writable = writable.len(),
            readonly = readonly.len(),
            "acquired account locks"
        );
        AccountLockGuard {
            locks: self,
            writable,
            readonly,
        }
    }

    fn release(&self, writable: &[Address], readonly: &[Address]) {
        let mut state = self.state.lock().expect("lock poisoned");
        for address in writable {
            state.write.remove(address);
        }
        for address in readonly {
            if let Some(count) = state.read.get_mut(address) {
                *count -= 1;
                if *count == 0 {
                    state.read.remove(address);
                }
            }
        }
        drop(state);
        self.released.notify_all();
    }
}

impl Default for AccountLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases its locks when dropped.
pub struct AccountLockGuard<'a> {
    locks: &'a AccountLocks,
    writable: Vec<Address>,
    readonly: Vec<Address>,
}

impl Drop for AccountLockGuard<'_> {
    fn drop(&mut self) {
        self.locks.release(&self.writable, &self.readonly);
    }
}
