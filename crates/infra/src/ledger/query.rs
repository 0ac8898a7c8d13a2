use std::collections::BTreeSet;

use tracing::debug;

use stockledger_core::{OwnerId, RecordId};
use stockledger_inventory::{
    AuditEntry, FilterCriteria, InventoryRecord, InventorySummary, RecordSnapshot, ViewItem,
    join_view,
};

use super::Ledger;
use crate::audit_log::AuditLog;
use crate::error::LedgerError;
use crate::store::RecordStore;

impl<S, L> Ledger<S, L>
where
    S: RecordStore,
    L: AuditLog,
{
    /// Live records of `owner`, in insertion order.
    pub fn get(&self, owner: OwnerId) -> Result<Vec<InventoryRecord>, LedgerError> {
        self.snapshot(owner, || Ok(self.store.list(owner)?))
    }

    pub fn get_record(&self, owner: OwnerId, record_id: RecordId) -> Result<InventoryRecord, LedgerError> {
        self.snapshot(owner, || {
            self.store
                .get(owner, record_id)?
                .filter(InventoryRecord::is_live)
                .ok_or(LedgerError::NotFound)
        })
    }

    /// Joined live+history view.
    ///
    /// Empty criteria yield an empty result without touching storage.
    pub fn filter(&self, owner: OwnerId, criteria: &FilterCriteria) -> Result<Vec<ViewItem>, LedgerError> {
        criteria.validate()?;
        if criteria.is_empty() {
            debug!(owner = %owner, "filter called without criteria");
            return Ok(Vec::new());
        }

        let (records, entries) = self.snapshot(owner, || {
            let records = self.store.list(owner)?;
            let entries = self.log.query(owner, &|e| criteria.matches_entry(e))?;
            Ok((records, entries))
        })?;

        let rows = join_view(
            owner,
            records.iter().map(InventoryRecord::snapshot),
            entries,
            criteria,
        );
        debug!(owner = %owner, rows = rows.len(), "filter evaluated");
        Ok(rows)
    }

    /// Distinct non-blank categories of live records, sorted.
    pub fn categories(&self, owner: OwnerId) -> Result<Vec<String>, LedgerError> {
        let records = self.get(owner)?;
        let set: BTreeSet<String> = records
            .iter()
            .filter_map(|r| r.category())
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(set.into_iter().collect())
    }

    pub fn summary(&self, owner: OwnerId) -> Result<InventorySummary, LedgerError> {
        let snapshots: Vec<RecordSnapshot> = self
            .get(owner)?
            .iter()
            .map(InventoryRecord::snapshot)
            .collect();
        Ok(InventorySummary::from_records(&snapshots))
    }

    /// Audit entries for one record, oldest first.
    ///
    /// `NotFound` when the id has neither history nor a live record.
    pub fn history(&self, owner: OwnerId, record_id: RecordId) -> Result<Vec<AuditEntry>, LedgerError> {
        self.snapshot(owner, || {
            let entries = self.log.query(owner, &|e| e.record_id() == record_id)?;
            if entries.is_empty() && self.store.get(owner, record_id)?.is_none() {
                return Err(LedgerError::NotFound);
            }
            Ok(entries)
        })
    }
}
