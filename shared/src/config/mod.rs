//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `ledger` - Bonus ledger rules, backend selection and lock timeouts
//! - `server` - HTTP server configuration
//! - `token` - Payment token signing, lifetime and cleanup cadence

pub mod database;
pub mod environment;
pub mod ledger;
pub mod server;
pub mod token;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use environment::{Environment, LoggingConfig};
pub use ledger::{LedgerBackend, LedgerConfig};
pub use server::ServerConfig;
pub use token::TokenConfig;

/// Prefix for environment variable overrides, e.g. `BONUSPAY__TOKEN__SECRET`
pub const ENV_PREFIX: &str = "BONUSPAY";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    #[serde(default)]
    pub environment: Environment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Payment token configuration
    #[serde(default)]
    pub token: TokenConfig,

    /// Ledger configuration
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            token: TokenConfig::default(),
            ledger: LedgerConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Build configuration from plain environment variables
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            token: TokenConfig::from_env(),
            ledger: LedgerConfig::from_env(),
            logging: LoggingConfig::for_environment(env),
        }
    }

    /// Load layered configuration
    ///
    /// Sources, lowest priority first:
    /// 1. Values from [`AppConfig::from_env`] (including `.env` files)
    /// 2. `config/<environment>.toml`, if present
    /// 3. `BONUSPAY__SECTION__KEY` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let environment = Environment::from_env();
        dotenvy::from_filename(environment.env_file()).ok();
        dotenvy::dotenv().ok();

        let defaults = config::Config::try_from(&Self::from_env())?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::with_name(&format!("config/{}", environment))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject configurations that must never reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.token.uses_development_secret() {
            return Err("token secret must be set in production".to_string());
        }
        if self.token.secret.is_empty() {
            return Err("token secret must not be empty".to_string());
        }
        if self.token.ttl_seconds == 0 || self.token.ttl_seconds > 86_400 {
            return Err(format!(
                "token ttl must be within 1..=86400 seconds, got {}",
                self.token.ttl_seconds
            ));
        }
        if self.ledger.accrual_percent > 100 {
            return Err(format!(
                "accrual percent must be within 0..=100, got {}",
                self.ledger.accrual_percent
            ));
        }
        Ok(())
    }
}
