use std::collections::HashMap;
use std::sync::RwLock;

use stockledger_core::OwnerId;
use stockledger_events::OwnerScoped;
use stockledger_inventory::AuditEntry;

use super::AuditLog;
use crate::error::StorageError;

/// In-memory audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    inner: RwLock<HashMap<OwnerId, Vec<AuditEntry>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), StorageError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StorageError::poisoned("audit log"))?;
        map.entry(entry.owner()).or_default().push(entry);
        Ok(())
    }

    fn query(
        &self,
        owner: OwnerId,
        predicate: &dyn Fn(&AuditEntry) -> bool,
    ) -> Result<Vec<AuditEntry>, StorageError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StorageError::poisoned("audit log"))?;
        Ok(map
            .get(&owner)
            .map(|entries| entries.iter().filter(|e| predicate(e)).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockledger_core::{Money, RecordId};
    use stockledger_inventory::{AuditAction, RecordSnapshot};

    fn entry(owner: OwnerId, action: AuditAction) -> AuditEntry {
        let now = Utc::now();
        AuditEntry::new(
            action,
            RecordSnapshot {
                id: RecordId::new(),
                owner,
                name: "Flour".to_string(),
                category: None,
                quantity: 10,
                used: 2,
                capital_price: Money::new(100),
                selling_price: Money::new(150),
                image: None,
                created_at: now,
                updated_at: now,
            },
            now,
        )
    }

    #[test]
    fn query_is_owner_scoped_and_ordered() {
        let log = InMemoryAuditLog::new();
        let owner = OwnerId::new();
        let first = entry(owner, AuditAction::Consume);
        let second = entry(owner, AuditAction::Delete);
        log.append(first.clone()).unwrap();
        log.append(entry(OwnerId::new(), AuditAction::Delete)).unwrap();
        log.append(second.clone()).unwrap();

        let all = log.query(owner, &|_| true).unwrap();
        assert_eq!(all, vec![first, second.clone()]);

        let deletes = log
            .query(owner, &|e| e.action() == AuditAction::Delete)
            .unwrap();
        assert_eq!(deletes, vec![second]);
    }

    #[test]
    fn unknown_owner_yields_nothing() {
        let log = InMemoryAuditLog::new();
        log.append(entry(OwnerId::new(), AuditAction::Consume)).unwrap();
        assert!(log.query(OwnerId::new(), &|_| true).unwrap().is_empty());
    }
}
