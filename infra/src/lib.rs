//! # Infrastructure Layer
//!
//! Concrete persistence for the BonusPay backend, following the repository
//! traits declared in `bp_core`.
//!
//! ## Architecture
//!
//! - **Database**: MySQL connection pool, schema bootstrap and the
//!   [`MySqlLedgerRepository`](database::MySqlLedgerRepository) using SQLx
//!
//! Payment tokens are never persisted; they live in the process-local store
//! from `bp_core`.
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
