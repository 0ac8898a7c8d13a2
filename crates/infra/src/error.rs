use thiserror::Error;

use stockledger_core::DomainError;

use crate::blob::BlobError;

/// Persistence backend failure.
///
/// These are **infrastructure errors** as opposed to domain errors; they are
/// surfaced to the caller once and never retried here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot serve the request (I/O failure, poisoned lock, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn poisoned(what: &str) -> Self {
        Self::Unavailable(format!("{what} lock poisoned"))
    }
}

/// Error returned by every ledger operation.
///
/// Each variant maps to a distinct message and HTTP status at the API boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),

    /// Missing or owned by someone else.
    #[error("not found")]
    NotFound,

    #[error("cannot consume {requested} units: only {remaining} remaining")]
    Overconsumption { requested: u64, remaining: u64 },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => LedgerError::Validation(msg),
            DomainError::InvalidId(msg) => LedgerError::Validation(msg),
            DomainError::NotFound => LedgerError::NotFound,
            DomainError::Overconsumption { requested, remaining } => {
                LedgerError::Overconsumption { requested, remaining }
            }
            DomainError::InvariantViolation(msg) => LedgerError::InvariantViolation(msg),
        }
    }
}

impl From<BlobError> for LedgerError {
    fn from(value: BlobError) -> Self {
        match value {
            BlobError::Empty => LedgerError::Validation("uploaded file is empty".to_string()),
            BlobError::Unavailable(msg) => LedgerError::Storage(StorageError::Unavailable(msg)),
        }
    }
}
