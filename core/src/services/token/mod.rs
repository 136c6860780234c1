//! Payment token services
//!
//! This module handles all token-related operations:
//! - Signing and encoding token strings
//! - Issuing tokens and registering them in the token store
//! - Validating presented tokens against signature, store and expiry
//! - Background cleanup of expired tokens

mod cleanup;
mod config;
mod issuer;
mod service;
mod signer;
mod validator;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::{TokenServiceConfig, MAX_TTL_SECONDS};
pub use issuer::TokenIssuer;
pub use service::TokenService;
pub use signer::{TokenSigner, TOKEN_SEPARATOR};
pub use validator::TokenValidator;
