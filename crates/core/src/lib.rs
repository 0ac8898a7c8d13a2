//! `stockledger-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod aggregate;
pub mod blob;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use blob::BlobRef;
pub use error::{DomainError, DomainResult};
pub use id::{OwnerId, ReceiptId, RecordId};
pub use money::Money;
pub use value_object::ValueObject;
