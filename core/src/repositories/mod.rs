//! Repository interfaces and their process-local implementations.

pub mod ledger_store;
pub mod token_store;

pub use ledger_store::{BalanceMutation, InMemoryLedgerRepository, LedgerRepository};
pub use token_store::{InMemoryTokenStore, TokenStore};
