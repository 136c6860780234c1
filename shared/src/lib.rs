//! Shared utilities and common types for the BonusPay server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures and error codes
//! - Utility functions (phone validation and masking)

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, Environment, DatabaseConfig, LedgerBackend, LedgerConfig,
    LoggingConfig, ServerConfig, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::phone;
