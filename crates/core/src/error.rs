//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, stock limits). Storage concerns belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, non-positive quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The target does not exist, or belongs to another owner.
    #[error("not found")]
    NotFound,

    /// Consuming `requested` units would exceed the `remaining` stock.
    #[error("cannot consume {requested} units: only {remaining} remaining")]
    Overconsumption { requested: u64, remaining: u64 },

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn overconsumption(requested: u64, remaining: u64) -> Self {
        Self::Overconsumption { requested, remaining }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
