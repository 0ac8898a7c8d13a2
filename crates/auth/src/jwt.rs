use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtError {
    #[error("malformed or unsigned token: {0}")]
    Decode(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError>;
}

/// HMAC-SHA256 validator over a shared secret.
///
/// Expiry is checked by [`validate_claims`] against our own `issued_at` /
/// `expires_at` claims, not the registered `exp` claim.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        Self {
            key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, JwtError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation)
            .map_err(|e| JwtError::Decode(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
