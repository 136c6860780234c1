//! Bonus ledger services
//!
//! - Account registration and balance/history queries
//! - Settlement (write-off) and accrual with per-subject serialization
//! - Cancellable variants of both mutations

mod config;
mod locks;
mod rules;
mod service;


pub use config::{LedgerServiceConfig, DEFAULT_ACCRUAL_PERCENT};
pub use locks::{SubjectGuard, SubjectLocks};
pub use rules::{accrual_bonus, min_qualifying_purchase, settlement_bonus, MAX_ACCRUAL_PERCENT};
pub use service::LedgerService;
