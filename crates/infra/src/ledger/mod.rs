//! Ledger processor: validated, atomic mutations plus consistent reads.
//!
//! Every destructive operation follows the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Lock the record (serializes writers on the same id)
//!   ↓
//! 2. Load the live record (owner-scoped; foreign or missing => NotFound)
//!   ↓
//! 3. Handle command (pure decision logic, produces events)
//!   ↓
//! 4. Under the owner's commit gate: mutate the store, append the audit entry
//!   ↓
//! 5. On append failure, restore the store (same value, same position) and
//!    surface the storage error
//! ```
//!
//! Readers take the owner's commit gate in shared mode, so a filter or summary
//! never observes a store change without its audit entry (or the reverse).

mod locks;
mod processor;
mod query;

use chrono::{DateTime, Utc};

use stockledger_core::{BlobRef, OwnerId};

use crate::audit_log::AuditLog;
use crate::error::{LedgerError, StorageError};
use crate::store::RecordStore;

use locks::{CommitGates, RecordLocks};

/// Input for [`Ledger::create`]; the id and timestamps are assigned by the ledger.
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub name: String,
    pub category: Option<String>,
    pub quantity: i64,
    pub capital_price: i64,
    pub selling_price: i64,
    pub image: Option<BlobRef>,
}

/// Orchestrates the record store and the audit log.
///
/// Generic over both backends so tests can swap in failing or instrumented
/// implementations.
pub struct Ledger<S, L> {
    store: S,
    log: L,
    locks: RecordLocks,
    gates: CommitGates,
}

impl<S, L> Ledger<S, L>
where
    S: RecordStore,
    L: AuditLog,
{
    pub fn new(store: S, log: L) -> Self {
        Self {
            store,
            log,
            locks: RecordLocks::default(),
            gates: CommitGates::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audit_log(&self) -> &L {
        &self.log
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Number of record ids with a lock entry; zero whenever no mutation is in flight.
    #[cfg(test)]
    pub(crate) fn tracked_record_locks(&self) -> usize {
        self.locks.len()
    }

    /// Run `f` while holding the owner's commit gate exclusively.
    fn commit<T>(
        &self,
        owner: OwnerId,
        f: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let gate = self.gates.gate(owner)?;
        let _guard = gate
            .write()
            .map_err(|_| StorageError::poisoned("commit gate"))?;
        f()
    }

    /// Run `f` while holding the owner's commit gate in shared mode.
    fn snapshot<T>(
        &self,
        owner: OwnerId,
        f: impl FnOnce() -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let gate = self.gates.gate(owner)?;
        let _guard = gate
            .read()
            .map_err(|_| StorageError::poisoned("commit gate"))?;
        f()
    }
}
