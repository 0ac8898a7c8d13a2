use std::collections::HashMap;
use std::sync::RwLock;

use stockledger_core::{OwnerId, RecordId};
use stockledger_inventory::InventoryRecord;

use super::RecordStore;
use crate::error::StorageError;

/// In-memory record store for tests/dev.
///
/// Records are kept per owner in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<HashMap<OwnerId, Vec<InventoryRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, record: InventoryRecord) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("record store"))?;
        let records = map.entry(record.owner()).or_default();
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(StorageError::Unavailable(format!(
                "record {} already stored",
                record.record_id()
            )));
        }
        records.push(record);
        Ok(())
    }

    fn get(&self, owner: OwnerId, id: RecordId) -> Result<Option<InventoryRecord>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::poisoned("record store"))?;
        Ok(map
            .get(&owner)
            .and_then(|records| records.iter().find(|r| r.record_id() == id))
            .cloned())
    }

    fn list(&self, owner: OwnerId) -> Result<Vec<InventoryRecord>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::poisoned("record store"))?;
        Ok(map.get(&owner).cloned().unwrap_or_default())
    }

    fn replace(&self, record: InventoryRecord) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("record store"))?;
        let slot = map
            .get_mut(&record.owner())
            .and_then(|records| records.iter_mut().find(|r| r.record_id() == record.record_id()))
            .ok_or_else(|| {
                StorageError::Unavailable(format!("record {} vanished during update", record.record_id()))
            })?;
        *slot = record;
        Ok(())
    }

    fn remove(&self, owner: OwnerId, id: RecordId) -> Result<Option<(usize, InventoryRecord)>, StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("record store"))?;
        let Some(records) = map.get_mut(&owner) else {
            return Ok(None);
        };
        Ok(records
            .iter()
            .position(|r| r.record_id() == id)
            .map(|idx| (idx, records.remove(idx))))
    }

    fn restore(&self, record: InventoryRecord, position: usize) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("record store"))?;
        let records = map.entry(record.owner()).or_default();
        if records.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(StorageError::Unavailable(format!(
                "record {} already stored",
                record.record_id()
            )));
        }
        // Later removals may have shortened the list.
        let position = position.min(records.len());
        records.insert(position, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockledger_core::Aggregate;
    use stockledger_inventory::{CreateRecord, RecordCommand};

    fn record(owner: OwnerId, name: &str) -> InventoryRecord {
        let id = RecordId::new();
        let mut record = InventoryRecord::empty(id, owner);
        let events = record
            .handle(&RecordCommand::Create(CreateRecord {
                owner,
                record_id: id,
                name: name.to_string(),
                category: None,
                quantity: 5,
                capital_price: 1,
                selling_price: 2,
                image: None,
                occurred_at: Utc::now(),
            }))
            .unwrap();
        record.apply(&events[0]);
        record
    }

    #[test]
    fn list_preserves_insertion_order_per_owner() {
        let store = InMemoryRecordStore::new();
        let owner = OwnerId::new();
        let other = OwnerId::new();

        store.insert(record(owner, "a")).unwrap();
        store.insert(record(other, "x")).unwrap();
        store.insert(record(owner, "b")).unwrap();

        let names: Vec<String> = store
            .list(owner)
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(store.list(other).unwrap().len(), 1);
    }

    #[test]
    fn get_is_owner_scoped() {
        let store = InMemoryRecordStore::new();
        let owner = OwnerId::new();
        let rec = record(owner, "a");
        let id = rec.record_id();
        store.insert(rec).unwrap();

        assert!(store.get(owner, id).unwrap().is_some());
        assert!(store.get(OwnerId::new(), id).unwrap().is_none());
    }

    #[test]
    fn remove_missing_returns_none() {
        let store = InMemoryRecordStore::new();
        let owner = OwnerId::new();
        let rec = record(owner, "a");
        let id = rec.record_id();
        store.insert(rec).unwrap();

        assert!(store.remove(owner, id).unwrap().is_some());
        assert!(store.remove(owner, id).unwrap().is_none());
        assert!(store.list(owner).unwrap().is_empty());
    }

    #[test]
    fn restore_puts_a_removed_record_back_in_place() {
        let store = InMemoryRecordStore::new();
        let owner = OwnerId::new();
        for name in ["a", "b", "c"] {
            store.insert(record(owner, name)).unwrap();
        }
        let middle = store.list(owner).unwrap()[1].record_id();

        let (position, removed) = store.remove(owner, middle).unwrap().unwrap();
        assert_eq!(position, 1);
        store.restore(removed.clone(), position).unwrap();

        let names: Vec<String> = store
            .list(owner)
            .unwrap()
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(store.restore(removed, position).is_err(), "duplicate restore is refused");
    }

    #[test]
    fn restore_past_the_end_appends() {
        let store = InMemoryRecordStore::new();
        let owner = OwnerId::new();
        let rec = record(owner, "a");
        store.restore(rec, 7).unwrap();
        assert_eq!(store.list(owner).unwrap().len(), 1);
    }
}
