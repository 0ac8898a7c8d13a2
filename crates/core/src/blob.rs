//! Opaque references handed out by the blob store.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Retrievable reference (URL or key) to an uploaded image or receipt file.
///
/// The ledger stores and forwards it verbatim and never inspects its content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for BlobRef {}

impl core::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
