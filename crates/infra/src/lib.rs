//! Infrastructure layer: persistence backends, blob storage and the ledger
//! processor that ties them together.

pub mod audit_log;
pub mod blob;
pub mod error;
pub mod ledger;
pub mod read_model;
pub mod store;
pub mod uploads;


pub use error::{LedgerError, StorageError};
pub use ledger::{Ledger, NewRecord};
