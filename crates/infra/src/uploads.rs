//! Image and receipt uploads backed by a [`BlobStore`].

use chrono::Utc;
use tracing::info;

use stockledger_core::{BlobRef, OwnerId, ReceiptId};
use stockledger_inventory::Receipt;

use crate::blob::{BlobStore, StoredBlob};
use crate::error::LedgerError;
use crate::read_model::OwnerStore;

pub struct Uploads<B, R> {
    blobs: B,
    receipts: R,
}

impl<B, R> Uploads<B, R>
where
    B: BlobStore,
    R: OwnerStore<ReceiptId, Receipt>,
{
    pub fn new(blobs: B, receipts: R) -> Self {
        Self { blobs, receipts }
    }

    /// Store an image and return the reference to put on a record.
    pub fn store_image(
        &self,
        owner: OwnerId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<BlobRef, LedgerError> {
        let url = self.blobs.put(owner, content_type, bytes)?;
        info!(owner = %owner, url = %url, "image stored");
        Ok(url)
    }

    /// Store a receipt file under a required title.
    pub fn upload_receipt(
        &self,
        owner: OwnerId,
        title: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Receipt, LedgerError> {
        if title.trim().is_empty() {
            return Err(LedgerError::Validation("receipt title cannot be empty".to_string()));
        }

        let url = self.blobs.put(owner, content_type, bytes)?;
        let receipt = Receipt::new(owner, title, url, Utc::now())?;
        self.receipts.upsert(owner, receipt.id, receipt.clone())?;
        info!(owner = %owner, receipt_id = %receipt.id, "receipt uploaded");
        Ok(receipt)
    }

    /// Receipts of `owner`, newest first.
    pub fn receipts(&self, owner: OwnerId) -> Result<Vec<Receipt>, LedgerError> {
        let mut receipts = self.receipts.list(owner)?;
        receipts.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(receipts)
    }

    pub fn blob(&self, key: &str) -> Result<Option<StoredBlob>, LedgerError> {
        Ok(self.blobs.get(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use crate::read_model::InMemoryOwnerStore;

    fn uploads() -> Uploads<InMemoryBlobStore, InMemoryOwnerStore<ReceiptId, Receipt>> {
        Uploads::new(InMemoryBlobStore::default(), InMemoryOwnerStore::new())
    }

    #[test]
    fn receipts_are_listed_newest_first() {
        let uploads = uploads();
        let owner = OwnerId::new();
        let first = uploads
            .upload_receipt(owner, "March supplier", Some("image/jpeg"), vec![1])
            .unwrap();
        let second = uploads
            .upload_receipt(owner, "April supplier", None, vec![2])
            .unwrap();

        let listed = uploads.receipts(owner).unwrap();
        assert_eq!(listed, vec![second, first]);
        assert!(uploads.receipts(OwnerId::new()).unwrap().is_empty());
    }

    #[test]
    fn receipt_requires_title_and_content() {
        let uploads = uploads();
        let owner = OwnerId::new();
        assert!(matches!(
            uploads.upload_receipt(owner, "  ", None, vec![1]),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            uploads.upload_receipt(owner, "Receipt", None, vec![]),
            Err(LedgerError::Validation(_))
        ));
        assert!(uploads.receipts(owner).unwrap().is_empty());
    }

    #[test]
    fn stored_image_is_retrievable() {
        let uploads = uploads();
        let owner = OwnerId::new();
        let url = uploads.store_image(owner, Some("image/png"), vec![9, 9]).unwrap();
        let key = url.as_str().rsplit('/').next().unwrap();
        assert_eq!(uploads.blob(key).unwrap().unwrap().bytes, vec![9, 9]);
    }
}
