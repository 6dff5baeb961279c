//! Per-account read/write locks.
//!
//! A transaction takes its whole account set at once under a single monitor,
//! so there is no lock ordering and no deadlock. Writable accounts are held
//! exclusively and read-only accounts are shared.

use std::collections::{HashMap, HashSet};

use parking_lot::{Condvar, Mutex};
use puzi_core::Address;
use tracing::debug;

#[derive(Debug, Default)]
struct LockTable {
    writers: HashSet<Address>,
    readers: HashMap<Address, usize>,
}

impl LockTable {
    fn is_free(&self, writable: &[Address], readonly: &[Address]) -> bool {
        writable
            .iter()
            .all(|a| !self.writers.contains(a) && !self.readers.contains_key(a))
            && readonly.iter().all(|a| !self.writers.contains(a))
    }

    fn take(&mut self, writable: &[Address], readonly: &[Address]) {
        self.writers.extend(writable.iter().copied());
        for address in readonly {
            *self.readers.entry(*address).or_default() += 1;
        }
    }

    fn release(&mut self, writable: &[Address], readonly: &[Address]) {
        for address in writable {
            self.writers.remove(address);
        }
        for address in readonly {
            if let Some(count) = self.readers.get_mut(address) {
                *count -= 1;
                if *count == 0 {
                    self.readers.remove(address);
                }
            }
        }
    }
}

/// Lock manager for the ledger's accounts.
#[derive(Debug, Default)]
pub(crate) struct AccountLocks {
    table: Mutex<LockTable>,
    released: Condvar,
}

impl AccountLocks {
    /// Blocks until every account in the set is available, then takes them.
    ///
    /// `writable` and `readonly` must be disjoint and free of duplicates.
    pub(crate) fn acquire(&self, writable: Vec<Address>, readonly: Vec<Address>) -> AccountLockGuard<'_> {
        let mut table = self.table.lock();
        while !table.is_free(&writable, &readonly) {
            self.released.wait(&mut table);
        }
        table.take(&writable, &readonly);
        debug!(
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
}

/// Releases its account set on drop.
pub(crate) struct AccountLockGuard<'a> {
    locks: &'a AccountLocks,
    writable: Vec<Address>,
    readonly: Vec<Address>,
}

impl Drop for AccountLockGuard<'_> {
    fn drop(&mut self) {
        self.locks.table.lock().release(&self.writable, &self.readonly);
        self.locks.released.notify_all();
    }
}
