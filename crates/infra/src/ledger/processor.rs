use tracing::{debug, info, warn};

use stockledger_core::{Aggregate, BlobRef, OwnerId, RecordId};
use stockledger_events::Event;
use stockledger_inventory::{
    AuditEntry, ConsumeStock, CreateRecord, DeleteRecord, EditRecord, InventoryRecord,
    RecordChanges, RecordCommand, RecordEvent, RecordSnapshot,
};

use super::{Ledger, NewRecord};
use crate::audit_log::AuditLog;
use crate::error::LedgerError;
use crate::store::RecordStore;

impl<S, L> Ledger<S, L>
where
    S: RecordStore,
    L: AuditLog,
{
    /// Add a new record owned by `owner`, with `used = 0`.
    pub fn create(&self, owner: OwnerId, draft: NewRecord) -> Result<InventoryRecord, LedgerError> {
        let record_id = RecordId::new();
        let mut record = InventoryRecord::empty(record_id, owner);
        let command = RecordCommand::Create(CreateRecord {
            owner,
            record_id,
            name: draft.name,
            category: draft.category,
            quantity: draft.quantity,
            capital_price: draft.capital_price,
            selling_price: draft.selling_price,
            image: draft.image,
            occurred_at: self.now(),
        });
        let events = record.handle(&command)?;
        apply_all(&mut record, &events);

        self.commit(owner, || Ok(self.store.insert(record.clone())?))?;
        info!(owner = %owner, record_id = %record_id, quantity = record.quantity(), "inventory record created");
        Ok(record)
    }

    /// Consume `amount_used` units and record a `CONSUME` audit entry.
    ///
    /// All-or-nothing: on any failure the record is left as it was.
    pub fn consume(
        &self,
        owner: OwnerId,
        record_id: RecordId,
        amount_used: i64,
    ) -> Result<InventoryRecord, LedgerError> {
        let lease = self.locks.lease(record_id)?;
        let _serial = lease.serialize()?;

        let current = self.load_live(owner, record_id)?;
        let command = RecordCommand::Consume(ConsumeStock {
            owner,
            record_id,
            amount_used,
            occurred_at: self.now(),
        });
        let events = current.handle(&command).inspect_err(|err| {
            warn!(owner = %owner, record_id = %record_id, amount_used, error = %err, "consume rejected");
        })?;
        let mut next = current.clone();
        apply_all(&mut next, &events);
        let entry = audit_entry(&events, next.snapshot())?;

        self.commit(owner, || {
            self.store.replace(next.clone())?;
            if let Err(err) = self.log.append(entry) {
                warn!(owner = %owner, record_id = %record_id, error = %err, "audit append failed, restoring record");
                if let Err(restore) = self.store.replace(current) {
                    warn!(record_id = %record_id, error = %restore, "record restore failed");
                }
                return Err(err.into());
            }
            Ok(())
        })?;

        info!(owner = %owner, record_id = %record_id, amount_used, used = next.used(), remaining = next.remaining(), "stock consumed");
        Ok(next)
    }

    /// Remove a record from the live set and record a `DELETE` audit entry.
    pub fn delete(&self, owner: OwnerId, record_id: RecordId) -> Result<RecordId, LedgerError> {
        let lease = self.locks.lease(record_id)?;
        let _serial = lease.serialize()?;

        let current = self.load_live(owner, record_id)?;
        let command = RecordCommand::Delete(DeleteRecord {
            owner,
            record_id,
            occurred_at: self.now(),
        });
        let events = current.handle(&command)?;
        let entry = audit_entry(&events, current.snapshot())?;

        self.commit(owner, || {
            let (position, _) = self
                .store
                .remove(owner, record_id)?
                .ok_or(LedgerError::NotFound)?;
            if let Err(err) = self.log.append(entry) {
                warn!(owner = %owner, record_id = %record_id, error = %err, "audit append failed, restoring record");
                if let Err(restore) = self.store.restore(current, position) {
                    warn!(record_id = %record_id, error = %restore, "record restore failed");
                }
                return Err(err.into());
            }
            Ok(())
        })?;

        info!(owner = %owner, record_id = %record_id, "inventory record deleted");
        Ok(record_id)
    }

    /// Apply non-destructive changes (rename, reprice, restock, recategorize, image).
    ///
    /// No audit entry is written; the live record keeps the full truth.
    pub fn edit(
        &self,
        owner: OwnerId,
        record_id: RecordId,
        changes: RecordChanges,
    ) -> Result<InventoryRecord, LedgerError> {
        let lease = self.locks.lease(record_id)?;
        let _serial = lease.serialize()?;

        let current = self.load_live(owner, record_id)?;
        let command = RecordCommand::Edit(EditRecord {
            owner,
            record_id,
            changes,
            occurred_at: self.now(),
        });
        let events = current.handle(&command)?;
        let mut next = current;
        apply_all(&mut next, &events);

        self.commit(owner, || Ok(self.store.replace(next.clone())?))?;
        info!(owner = %owner, record_id = %record_id, "inventory record edited");
        Ok(next)
    }

    /// Point a record's image at an uploaded blob.
    pub fn attach_image(
        &self,
        owner: OwnerId,
        record_id: RecordId,
        image: BlobRef,
    ) -> Result<InventoryRecord, LedgerError> {
        self.edit(
            owner,
            record_id,
            RecordChanges {
                image: Some(image),
                ..RecordChanges::default()
            },
        )
    }

    fn load_live(&self, owner: OwnerId, record_id: RecordId) -> Result<InventoryRecord, LedgerError> {
        self.store
            .get(owner, record_id)?
            .filter(InventoryRecord::is_live)
            .ok_or(LedgerError::NotFound)
    }
}

fn apply_all(record: &mut InventoryRecord, events: &[RecordEvent]) {
    for event in events {
        debug!(event_type = event.event_type(), "applying event");
        record.apply(event);
    }
}

fn audit_entry(events: &[RecordEvent], snapshot: RecordSnapshot) -> Result<AuditEntry, LedgerError> {
    events
        .iter()
        .find_map(|event| AuditEntry::capture(event, snapshot.clone()))
        .ok_or_else(|| LedgerError::InvariantViolation("destructive command emitted no audit event".to_string()))
}
