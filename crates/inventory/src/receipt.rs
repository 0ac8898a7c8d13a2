//! Purchase receipts uploaded by an owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{BlobRef, DomainError, DomainResult, OwnerId, ReceiptId};
use stockledger_events::OwnerScoped;

/// Metadata of an uploaded receipt. The file itself lives in the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub owner: OwnerId,
    pub title: String,
    pub url: BlobRef,
    pub uploaded_at: DateTime<Utc>,
}

impl Receipt {
    pub fn new(owner: OwnerId, title: &str, url: BlobRef, uploaded_at: DateTime<Utc>) -> DomainResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("receipt title cannot be empty"));
        }
        Ok(Self {
            id: ReceiptId::new(),
            owner,
            title: title.to_string(),
            url,
            uploaded_at,
        })
    }
}

impl OwnerScoped for Receipt {
    fn owner(&self) -> OwnerId {
        self.owner
    }
}
