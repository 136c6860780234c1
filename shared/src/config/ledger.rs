//! Bonus ledger configuration

use serde::{Deserialize, Serialize};

/// Where account balances and transactions are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackend {
    /// Process-local storage, lost on restart
    #[default]
    Memory,
    /// MySQL tables `accounts` and `transactions`
    MySql,
}

impl std::str::FromStr for LedgerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(LedgerBackend::Memory),
            "mysql" => Ok(LedgerBackend::MySql),
            _ => Err(format!("Invalid ledger backend: {}", s)),
        }
    }
}

/// Bonus ledger configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Storage backend
    #[serde(default)]
    pub backend: LedgerBackend,

    /// Welcome balance credited on registration
    #[serde(default = "default_initial_balance")]
    pub initial_balance: u64,

    /// Percentage of a purchase credited as bonus on accrual
    #[serde(default = "default_accrual_percent")]
    pub accrual_percent: u32,

    /// Upper bound on waiting for a subject's exclusive access, in milliseconds
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackend::default(),
            initial_balance: default_initial_balance(),
            accrual_percent: default_accrual_percent(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl LedgerConfig {
    /// Create from `LEDGER_BACKEND` / `LEDGER_INITIAL_BALANCE` / `LEDGER_ACCRUAL_PERCENT` / `LEDGER_LOCK_TIMEOUT_MS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: std::env::var("LEDGER_BACKEND")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.backend),
            initial_balance: std::env::var("LEDGER_INITIAL_BALANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.initial_balance),
            accrual_percent: std::env::var("LEDGER_ACCRUAL_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.accrual_percent),
            lock_timeout_ms: std::env::var("LEDGER_LOCK_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.lock_timeout_ms),
        }
    }
}

fn default_initial_balance() -> u64 {
    1000
}

fn default_accrual_percent() -> u32 {
    12
}

fn default_lock_timeout_ms() -> u64 {
    2000
}
