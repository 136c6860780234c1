//! Payment token configuration

use serde::{Deserialize, Serialize};

/// Signing secret used when nothing is configured. Rejected in production.
pub const DEVELOPMENT_TOKEN_SECRET: &str = "development-secret-please-change-in-production";

/// Payment token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Secret key for the keyed hash over token payloads
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,

    /// How often the expired-token sweep runs, in seconds
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,

    /// Whether the background sweep runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            ttl_seconds: default_ttl_seconds(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
            cleanup_enabled: default_cleanup_enabled(),
        }
    }
}

impl TokenConfig {
    /// Create from `TOKEN_SECRET` / `TOKEN_TTL_SECONDS` / `TOKEN_CLEANUP_INTERVAL_SECONDS`
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("TOKEN_SECRET").unwrap_or_else(|_| default_secret()),
            ttl_seconds: std::env::var("TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_ttl_seconds),
            cleanup_interval_seconds: std::env::var("TOKEN_CLEANUP_INTERVAL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_cleanup_interval_seconds),
            cleanup_enabled: default_cleanup_enabled(),
        }
    }

    /// Whether the built-in development secret is still in use
    pub fn uses_development_secret(&self) -> bool {
        self.secret == DEVELOPMENT_TOKEN_SECRET
    }
}

fn default_secret() -> String {
    DEVELOPMENT_TOKEN_SECRET.to_string()
}

fn default_ttl_seconds() -> u64 {
    600
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_cleanup_enabled() -> bool {
    true
}
