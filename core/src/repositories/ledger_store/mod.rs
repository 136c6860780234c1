//! Ledger repository module.

mod r#trait;
pub use r#trait::{BalanceMutation, LedgerRepository};

mod memory;
pub use memory::InMemoryLedgerRepository;
