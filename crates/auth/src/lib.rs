//! `stockledger-auth`: resolves a bearer token to the owner it speaks for.
//!
//! This crate is decoupled from HTTP and storage; the ledger trusts whatever
//! owner id it hands back.

pub mod claims;
pub mod jwt;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
