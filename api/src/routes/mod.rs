//! Route handlers
//!
//! - `accounts`: registration and balance lookup
//! - `tokens`: issuance and validation of payment tokens
//! - `bonus`: token-authorised quote, settlement and accrual

pub mod accounts;
pub mod bonus;
pub mod tokens;

/// Leading characters of a token, safe to put in logs
pub(crate) fn token_prefix(token: &str) -> &str {
    token.get(..8).unwrap_or(token)
}
