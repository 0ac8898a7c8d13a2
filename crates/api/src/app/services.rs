//! Service wiring shared by all handlers.

use std::sync::Arc;

use stockledger_core::{BlobRef, OwnerId, ReceiptId, RecordId};
use stockledger_infra::audit_log::InMemoryAuditLog;
use stockledger_infra::blob::InMemoryBlobStore;
use stockledger_infra::read_model::InMemoryOwnerStore;
use stockledger_infra::store::InMemoryRecordStore;
use stockledger_infra::uploads::Uploads;
use stockledger_infra::{Ledger, LedgerError};
use stockledger_inventory::{InventoryRecord, Receipt};

pub type AppLedger = Ledger<Arc<InMemoryRecordStore>, Arc<InMemoryAuditLog>>;
pub type AppUploads = Uploads<Arc<InMemoryBlobStore>, Arc<InMemoryOwnerStore<ReceiptId, Receipt>>>;

pub struct AppServices {
    pub ledger: AppLedger,
    pub uploads: AppUploads,
}

impl AppServices {
    pub fn in_memory(blob_base_url: &str) -> Self {
        let ledger = Ledger::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryAuditLog::new()),
        );
        let uploads = Uploads::new(
            Arc::new(InMemoryBlobStore::new(blob_base_url)),
            Arc::new(InMemoryOwnerStore::new()),
        );
        tracing::info!(blob_base_url, "in-memory ledger services ready");
        Self { ledger, uploads }
    }

    /// Upload an image and point the record at it.
    ///
    /// The record is checked first so a foreign or missing id stores nothing.
    pub fn attach_image(
        &self,
        owner: OwnerId,
        record_id: RecordId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<InventoryRecord, LedgerError> {
        self.ledger.get_record(owner, record_id)?;
        let url: BlobRef = self.uploads.store_image(owner, content_type, bytes)?;
        self.ledger.attach_image(owner, record_id, url)
    }
}
