//! Configuration for the ledger service

use std::time::Duration;

use bp_shared::config::ledger::LedgerConfig;

use crate::domain::entities::account::DEFAULT_INITIAL_BALANCE;

/// Default accrual rate in percent
pub const DEFAULT_ACCRUAL_PERCENT: u32 = 12;

/// Configuration for the bonus ledger service
#[derive(Debug, Clone)]
pub struct LedgerServiceConfig {
    /// Welcome balance of a newly registered account
    pub initial_balance: u64,
    /// Percent of a purchase credited by the token-driven accrual flow
    pub accrual_percent: u32,
    /// Bounded wait for a subject's exclusive access
    pub lock_timeout: Duration,
}

impl Default for LedgerServiceConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            accrual_percent: DEFAULT_ACCRUAL_PERCENT,
            lock_timeout: Duration::from_secs(2),
        }
    }
}

impl From<&LedgerConfig> for LedgerServiceConfig {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            initial_balance: config.initial_balance,
            accrual_percent: config.accrual_percent.min(100),
            lock_timeout: Duration::from_millis(config.lock_timeout_ms.max(1)),
        }
    }
}
