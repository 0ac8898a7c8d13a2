//! Append-only audit log of consume and delete actions.

pub mod in_memory;

use std::sync::Arc;

use stockledger_core::OwnerId;
use stockledger_inventory::AuditEntry;

use crate::error::StorageError;

pub use in_memory::InMemoryAuditLog;

/// Append-only, owner-isolated store of [`AuditEntry`] values.
///
/// Entries are never updated or removed. `query` returns matches in append order.
pub trait AuditLog: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), StorageError>;

    fn query(
        &self,
        owner: OwnerId,
        predicate: &dyn Fn(&AuditEntry) -> bool,
    ) -> Result<Vec<AuditEntry>, StorageError>;
}

impl<L> AuditLog for Arc<L>
where
    L: AuditLog + ?Sized,
{
    fn append(&self, entry: AuditEntry) -> Result<(), StorageError> {
        (**self).append(entry)
    }

    fn query(
        &self,
        owner: OwnerId,
        predicate: &dyn Fn(&AuditEntry) -> bool,
    ) -> Result<Vec<AuditEntry>, StorageError> {
        (**self).query(owner, predicate)
    }
}
