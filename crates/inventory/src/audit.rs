//! Audit trail for destructive record operations.
//!
//! An [`AuditEntry`] is written once per consume or delete and never changes
//! afterwards. It carries a [`RecordSnapshot`], a value copy of the record as
//! it stood at the moment of the action.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stockledger_core::{BlobRef, DomainError, Money, OwnerId, RecordId};
use stockledger_events::{Event, OwnerScoped};

use crate::record::RecordEvent;

/// Destructive action captured in the audit log.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Consume,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Consume => "CONSUME",
            AuditAction::Delete => "DELETE",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for AuditAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CONSUME" => Ok(AuditAction::Consume),
            "DELETE" => Ok(AuditAction::Delete),
            _ => Err(DomainError::validation(format!(
                "action must be DELETE or CONSUME, got '{s}'"
            ))),
        }
    }
}

/// Value copy of an inventory record's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub id: RecordId,
    pub owner: OwnerId,
    pub name: String,
    pub category: Option<String>,
    pub quantity: u64,
    pub used: u64,
    pub capital_price: Money,
    pub selling_price: Money,
    pub image: Option<BlobRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordSnapshot {
    pub fn remaining(&self) -> u64 {
        self.quantity.saturating_sub(self.used)
    }
}

/// Immutable historical entry for a consume or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    entry_id: Uuid,
    action: AuditAction,
    /// For `CONSUME`: the record after the update. For `DELETE`: the record just before removal.
    snapshot: RecordSnapshot,
    occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(action: AuditAction, snapshot: RecordSnapshot, occurred_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: Uuid::now_v7(),
            action,
            snapshot,
            occurred_at,
        }
    }

    /// Build the audit entry for a committed event, if the event is destructive.
    ///
    /// Returns `None` for creations and edits; those leave full truth in the live record.
    pub fn capture(event: &RecordEvent, snapshot: RecordSnapshot) -> Option<Self> {
        let action = match event {
            RecordEvent::Consumed(_) => AuditAction::Consume,
            RecordEvent::Deleted(_) => AuditAction::Delete,
            RecordEvent::Created(_) | RecordEvent::Edited(_) => return None,
        };
        Some(Self::new(action, snapshot, event.occurred_at()))
    }

    pub fn entry_id(&self) -> Uuid {
        self.entry_id
    }

    pub fn action(&self) -> AuditAction {
        self.action
    }

    pub fn snapshot(&self) -> &RecordSnapshot {
        &self.snapshot
    }

    pub fn record_id(&self) -> RecordId {
        self.snapshot.id
    }

    /// Timestamp of the action (`consumedAt` or `deletedAt`).
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn consumed_at(&self) -> Option<DateTime<Utc>> {
        (self.action == AuditAction::Consume).then_some(self.occurred_at)
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        (self.action == AuditAction::Delete).then_some(self.occurred_at)
    }
}

impl OwnerScoped for AuditEntry {
    fn owner(&self) -> OwnerId {
        self.snapshot.owner
    }
}
