//! Outcomes of ledger operations returned to callers.

use serde::{Deserialize, Serialize};

use crate::domain::entities::account::SubjectId;

/// Result of writing off bonus against a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub subject: SubjectId,
    pub purchase_amount: u64,
    /// Bonus deducted from the balance
    pub bonus_applied: u64,
    /// What the holder still pays: `purchase_amount - bonus_applied`
    pub remainder_due: u64,
    pub new_balance: u64,
}

/// Result of crediting bonus for a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualReceipt {
    pub subject: SubjectId,
    pub purchase_amount: u64,
    pub bonus_added: u64,
    pub new_balance: u64,
}

/// Non-binding preview of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementQuote {
    pub subject: SubjectId,
    pub purchase_amount: u64,
    pub bonus_applicable: u64,
    pub remainder_due: u64,
    pub balance: u64,
}
