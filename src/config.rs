//! Server configuration

use anyhow::{bail, Context, Result};
use chrono::Duration;
use std::env;

use crate::{
    keys::EID_CARD_PUBLIC_KEY,
    store::{ChallengeStore, MaxAge},
};

/// Configuration for the authentication server
///
/// Loaded from `EID_AUTH_*` environment variables (a `.env` file is honoured).
///
/// # Example
/// ```rust
/// use eid_auth::ServerConfig;
///
/// let config = ServerConfig::from_lookup(|name| match name {
///     "EID_AUTH_PORT" => Some("8080".to_string()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(config.port, 8080);
/// assert!(config.challenge_ttl.is_none());
/// ```
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Client public key, base64 DER SubjectPublicKeyInfo on P-384
    pub public_key: String,
    /// Challenge lifetime in seconds
    ///
    /// `None` keeps challenges until they are consumed or overwritten.
    pub challenge_ttl: Option<i64>,
    /// Seconds between sweeps of expired challenges
    pub cleanup_interval: u64,
    /// Comma-separated list of allowed CORS origins (None = permissive)
    pub cors_origins: Option<String>,
    /// Log filter used when RUST_LOG is not set
    pub log_level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let challenge_ttl = match lookup("EID_AUTH_CHALLENGE_TTL") {
            Some(raw) => {
                let ttl: i64 = raw.parse().context("Invalid EID_AUTH_CHALLENGE_TTL")?;
                if ttl <= 0 || Duration::try_seconds(ttl).is_none() {
                    bail!("EID_AUTH_CHALLENGE_TTL out of range: {ttl}");
                }
                Some(ttl)
            }
            None => None,
        };

        let config = ServerConfig {
            host: lookup("EID_AUTH_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("EID_AUTH_PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid EID_AUTH_PORT")?,
            public_key: lookup("EID_AUTH_PUBLIC_KEY")
                .unwrap_or_else(|| EID_CARD_PUBLIC_KEY.to_string()),
            challenge_ttl,
            cleanup_interval: lookup("EID_AUTH_CLEANUP_INTERVAL")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .context("Invalid EID_AUTH_CLEANUP_INTERVAL")?,
            cors_origins: lookup("EID_AUTH_CORS_ORIGINS").filter(|s| !s.trim().is_empty()),
            log_level: lookup("EID_AUTH_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        };

        Ok(config)
    }

    /// Build an empty challenge store with the configured expiry policy
    pub fn challenge_store(&self) -> ChallengeStore {
        match self.challenge_ttl {
            Some(ttl) => ChallengeStore::with_expiry(MaxAge(Duration::seconds(ttl))),
            None => ChallengeStore::new(),
        }
    }
}
