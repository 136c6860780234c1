//! Configuration for the token services

use chrono::Duration;

use bp_shared::config::token::{TokenConfig, DEVELOPMENT_TOKEN_SECRET};

use crate::domain::entities::token::TOKEN_LIFETIME_MINUTES;

/// Longest accepted token lifetime (one day)
pub const MAX_TTL_SECONDS: i64 = 86_400;

/// Configuration for issuing and validating payment tokens
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Secret key for the keyed payload hash
    pub secret_key: String,
    /// How long an issued token is accepted
    pub ttl: Duration,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret_key: DEVELOPMENT_TOKEN_SECRET.to_string(),
            ttl: Duration::minutes(TOKEN_LIFETIME_MINUTES),
        }
    }
}

impl From<&TokenConfig> for TokenServiceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self {
            secret_key: config.secret.clone(),
            ttl: Duration::seconds(
                i64::try_from(config.ttl_seconds)
                    .unwrap_or(MAX_TTL_SECONDS)
                    .min(MAX_TTL_SECONDS),
            ),
        }
    }
}
