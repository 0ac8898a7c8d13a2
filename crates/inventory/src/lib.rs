//! Inventory ledger domain module.
//!
//! This crate contains the business rules for stock records, their audit
//! trail and the live+history read model, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod audit;
pub mod filter;
pub mod receipt;
pub mod record;
pub mod summary;

pub use audit::{AuditAction, AuditEntry, RecordSnapshot};
pub use filter::{BoundEdge, FilterCriteria, ViewItem, ViewKey, join_view, parse_bound};
pub use receipt::Receipt;
pub use record::{
    ConsumeStock, CreateRecord, DeleteRecord, EditRecord, InventoryRecord, RecordChanges,
    RecordCommand, RecordCreated, RecordDeleted, RecordEdited, RecordEvent, StockConsumed,
};
pub use summary::InventorySummary;
