//! Blob storage for uploaded files (record images, receipts).

pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

use stockledger_core::{BlobRef, OwnerId};

pub use in_memory::InMemoryBlobStore;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("blob content is empty")]
    Empty,

    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

/// Stored file plus the metadata it was uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub owner: OwnerId,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Stores opaque bytes and hands back a resolvable [`BlobRef`].
pub trait BlobStore: Send + Sync {
    fn put(
        &self,
        owner: OwnerId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<BlobRef, BlobError>;

    /// Fetch by the key segment of a previously returned reference.
    fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError>;
}

impl<B> BlobStore for Arc<B>
where
    B: BlobStore + ?Sized,
{
    fn put(
        &self,
        owner: OwnerId,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<BlobRef, BlobError> {
        (**self).put(owner, content_type, bytes)
    }

    fn get(&self, key: &str) -> Result<Option<StoredBlob>, BlobError> {
        (**self).get(key)
    }
}
