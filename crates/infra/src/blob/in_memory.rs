use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use stockledger_core::{BlobRef, OwnerId};

use super::{BlobError, BlobStore, StoredBlob};

/// In-memory blob store; references are `{base_url}/{uuid}`.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("/blobs")
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(
        &self,
        owner: OwnerId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<BlobRef, BlobError> {
        if bytes.is_empty() {
            return Err(BlobError::Empty);
        }

        let key = Uuid::now_v7().to_string();
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| BlobError::Unavailable("blob store lock poisoned".to_string()))?;
        blobs.insert(
            key.clone(),
            StoredBlob {
                owner,
                content_type: content_type.map(str::to_string),
                bytes,
            },
        );
        Ok(BlobRef::new(format!("{}/{key}", self.base_url)))
    }

    fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| BlobError::Unavailable("blob store lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_returns_resolvable_reference() {
        let store = InMemoryBlobStore::new("http://localhost/blobs/");
        let owner = OwnerId::new();
        let url = store.put(owner, Some("image/png"), vec![1, 2, 3]).unwrap();

        let key = url
            .as_str()
            .strip_prefix("http://localhost/blobs/")
            .unwrap();
        let blob = store.get(key).unwrap().unwrap();
        assert_eq!(blob.bytes, vec![1, 2, 3]);
        assert_eq!(blob.content_type.as_deref(), Some("image/png"));
        assert_eq!(blob.owner, owner);
    }

    #[test]
    fn empty_upload_is_rejected() {
        let store = InMemoryBlobStore::default();
        assert_eq!(store.put(OwnerId::new(), None, vec![]), Err(BlobError::Empty));
    }
}
