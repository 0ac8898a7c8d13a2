//! Owner-isolated key/value storage for secondary documents (receipts).

pub mod owner_store;

pub use owner_store::{InMemoryOwnerStore, OwnerStore};
