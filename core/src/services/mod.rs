//! Business services containing domain logic and use cases.

pub mod ledger;
pub mod token;

// Re-export commonly used types
pub use ledger::{LedgerService, LedgerServiceConfig};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
