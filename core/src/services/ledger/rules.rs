//! Bonus arithmetic
//!
//! Pure functions, no I/O. Every amount is a non-negative integer; results
//! that would not fit are reported as malformed input.

use crate::errors::{DomainError, DomainResult, LedgerError};

/// Share of a purchase that bonus may cover, as a divisor
pub const MAX_BONUS_DIVISOR: u64 = 2;

/// Upper bound of an accrual rate, in percent
pub const MAX_ACCRUAL_PERCENT: u32 = 100;

pub fn ensure_positive_purchase(purchase_amount: u64) -> DomainResult<()> {
    if purchase_amount == 0 {
        return Err(DomainError::malformed("purchase amount must be positive"));
    }
    Ok(())
}

/// Bonus written off against a purchase: `min(balance, purchase / 2, cap)`
///
/// # Returns
/// * `Ok(bonus)` - Always positive
/// * `Err(LedgerError::InsufficientBonus)` - Nothing applicable, with the
///   smallest purchase that would qualify
pub fn settlement_bonus(balance: u64, purchase_amount: u64, cap: Option<u64>) -> DomainResult<u64> {
    let max_bonus = purchase_amount / MAX_BONUS_DIVISOR;
    let bonus = balance
        .min(max_bonus)
        .min(cap.unwrap_or(u64::MAX));

    if bonus == 0 {
        return Err(LedgerError::InsufficientBonus {
            min_qualifying_purchase: min_qualifying_purchase(balance),
        }
        .into());
    }

    Ok(bonus)
}

/// Smallest purchase reported with `InsufficientBonus`: `balance * 2 + 1`
pub fn min_qualifying_purchase(balance: u64) -> u64 {
    balance
        .saturating_mul(MAX_BONUS_DIVISOR)
        .saturating_add(1)
}

/// Bonus credited for a purchase: `floor(purchase * percent / 100)`
pub fn accrual_bonus(purchase_amount: u64, percent: u32) -> DomainResult<u64> {
    if percent > MAX_ACCRUAL_PERCENT {
        return Err(DomainError::malformed(format!(
            "accrual percent must be within 0..={}",
            MAX_ACCRUAL_PERCENT
        )));
    }

    purchase_amount
        .checked_mul(u64::from(percent))
        .map(|scaled| scaled / 100)
        .ok_or_else(|| DomainError::malformed("purchase amount too large"))
}

pub fn credit(balance: u64, amount: u64) -> DomainResult<u64> {
    balance
        .checked_add(amount)
        .ok_or_else(|| DomainError::malformed("balance would overflow"))
}
