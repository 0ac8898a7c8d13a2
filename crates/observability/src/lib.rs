//! Shared tracing/logging setup for stockledger binaries.

pub mod tracing;

pub use crate::tracing::{LogFormat, init, init_with};
