//! # BonusPay Core
//!
//! Core business logic for the BonusPay backend: short-lived signed payment
//! tokens and the bonus ledger that settles against them. This crate contains
//! domain entities, business services, repository interfaces, and error types.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::{
    CleanupResult, LedgerService, LedgerServiceConfig, TokenCleanupConfig, TokenCleanupService,
    TokenService, TokenServiceConfig,
};
