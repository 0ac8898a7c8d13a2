//! Process configuration, read from the environment (and `.env` when present).

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_BLOB_BASE_URL: &str = "/blobs";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STOCKLEDGER_BIND is not a socket address: {0}")]
    InvalidBind(String),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    /// Prefix of the URLs handed out for uploaded blobs.
    pub blob_base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let bind_raw = env::var("STOCKLEDGER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_raw.clone()))?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let blob_base_url = env::var("BLOB_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BLOB_BASE_URL.to_string());

        Ok(Self {
            bind,
            jwt_secret,
            blob_base_url,
        })
    }

    /// Defaults with an explicit secret; used by tests and embedders.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.into(),
            blob_base_url: DEFAULT_BLOB_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_secret_uses_local_defaults() {
        let cfg = ApiConfig::with_secret("abc");
        assert_eq!(cfg.jwt_secret, "abc");
        assert_eq!(cfg.blob_base_url, "/blobs");
        assert!(cfg.bind.ip().is_loopback());
    }
}
