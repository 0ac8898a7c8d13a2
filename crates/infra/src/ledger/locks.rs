use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use stockledger_core::{OwnerId, RecordId};

use crate::error::StorageError;

#[derive(Debug)]
struct Slot {
    lock: Arc<Mutex<()>>,
    holders: usize,
}

/// One mutex per record id, handed out on demand.
///
/// An entry only lives while some caller holds a [`RecordLease`] for it, so
/// requests for unknown or foreign ids leave nothing behind.
#[derive(Debug, Default)]
pub(super) struct RecordLocks {
    inner: Mutex<HashMap<RecordId, Slot>>,
}

impl RecordLocks {
    pub(super) fn lease(&self, id: RecordId) -> Result<RecordLease<'_>, StorageError> {
        let mut map = self.table()?;
        let slot = map.entry(id).or_insert_with(|| Slot {
            lock: Arc::default(),
            holders: 0,
        });
        slot.holders += 1;
        Ok(RecordLease {
            locks: self,
            id,
            lock: Arc::clone(&slot.lock),
        })
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.inner.lock().expect("record lock table").len()
    }

    fn table(&self) -> Result<MutexGuard<'_, HashMap<RecordId, Slot>>, StorageError> {
        self.inner
            .lock()
            .map_err(|_| StorageError::poisoned("record lock table"))
    }
}

/// A checked-out record mutex. Dropping the last lease for an id removes its entry.
///
/// Declare the guard from [`RecordLease::serialize`] after the lease so it drops first.
pub(super) struct RecordLease<'a> {
    locks: &'a RecordLocks,
    id: RecordId,
    lock: Arc<Mutex<()>>,
}

impl RecordLease<'_> {
    pub(super) fn serialize(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.lock.lock().map_err(|_| StorageError::poisoned("record"))
    }
}

impl Drop for RecordLease<'_> {
    fn drop(&mut self) {
        let Ok(mut map) = self.locks.inner.lock() else {
            return;
        };
        if let Some(slot) = map.get_mut(&self.id) {
            slot.holders = slot.holders.saturating_sub(1);
            if slot.holders == 0 {
                map.remove(&self.id);
            }
        }
    }
}

/// Per-owner reader/writer gate around store+log commits.
#[derive(Debug, Default)]
pub(super) struct CommitGates {
    inner: Mutex<HashMap<OwnerId, Arc<RwLock<()>>>>,
}

impl CommitGates {
    pub(super) fn gate(&self, owner: OwnerId) -> Result<Arc<RwLock<()>>, StorageError> {
        let mut map = self
            .inner
            .lock()
            .map_err(|_| StorageError::poisoned("commit gate table"))?;
        Ok(Arc::clone(map.entry(owner).or_default()))
    }
}
