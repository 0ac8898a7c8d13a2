//! Inventory record store: the live set of records per owner.

pub mod in_memory;

use std::sync::Arc;

use stockledger_core::{OwnerId, RecordId};
use stockledger_inventory::InventoryRecord;

use crate::error::StorageError;

pub use in_memory::InMemoryRecordStore;

/// Owner-isolated storage of live inventory records.
///
/// ## Contract
///
/// - `list` returns records in insertion order; ordering beyond that is the caller's job.
/// - Every lookup is keyed by owner; a record is invisible under any other owner.
/// - `replace` updates a record in place, keeping its position.
/// - `remove` returns the removed record with the position it held, or `None`
///   when it was not there.
/// - `restore` puts a removed record back at that position, so a rolled-back
///   removal leaves `list` order untouched.
///
/// The store performs no validation and no locking across calls; the ledger
/// processor serializes writers and gates readers.
pub trait RecordStore: Send + Sync {
    fn insert(&self, record: InventoryRecord) -> Result<(), StorageError>;
    fn get(&self, owner: OwnerId, id: RecordId) -> Result<Option<InventoryRecord>, StorageError>;
    fn list(&self, owner: OwnerId) -> Result<Vec<InventoryRecord>, StorageError>;
    fn replace(&self, record: InventoryRecord) -> Result<(), StorageError>;
    fn remove(&self, owner: OwnerId, id: RecordId) -> Result<Option<(usize, InventoryRecord)>, StorageError>;
    fn restore(&self, record: InventoryRecord, position: usize) -> Result<(), StorageError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn insert(&self, record: InventoryRecord) -> Result<(), StorageError> {
        (**self).insert(record)
    }

    fn get(&self, owner: OwnerId, id: RecordId) -> Result<Option<InventoryRecord>, StorageError> {
        (**self).get(owner, id)
    }

    fn list(&self, owner: OwnerId) -> Result<Vec<InventoryRecord>, StorageError> {
        (**self).list(owner)
    }

    fn replace(&self, record: InventoryRecord) -> Result<(), StorageError> {
        (**self).replace(record)
    }

    fn remove(&self, owner: OwnerId, id: RecordId) -> Result<Option<(usize, InventoryRecord)>, StorageError> {
        (**self).remove(owner, id)
    }

    fn restore(&self, record: InventoryRecord, position: usize) -> Result<(), StorageError> {
        (**self).restore(record, position)
    }
}
