use serde::{Deserialize, Serialize};
use validator::Validate;

use bp_core::domain::value_objects::{AccrualReceipt, Settlement, SettlementQuote};

/// Body shared by the quote, settle and accrue endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BonusRequest {
    /// Token presented by the holder
    #[validate(length(min = 1, max = 512))]
    pub token: String,

    #[validate(range(min = 1))]
    pub purchase_amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub subject: i64,
    pub purchase_amount: u64,
    pub bonus_applicable: u64,
    pub remainder_due: u64,
    pub balance: u64,
}

impl From<SettlementQuote> for QuoteResponse {
    fn from(quote: SettlementQuote) -> Self {
        Self {
            subject: quote.subject.value(),
            purchase_amount: quote.purchase_amount,
            bonus_applicable: quote.bonus_applicable,
            remainder_due: quote.remainder_due,
            balance: quote.balance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleResponse {
    pub subject: i64,
    pub purchase_amount: u64,
    pub bonus_applied: u64,
    pub remainder_due: u64,
    pub new_balance: u64,
}

impl From<Settlement> for SettleResponse {
    fn from(settlement: Settlement) -> Self {
        Self {
            subject: settlement.subject.value(),
            purchase_amount: settlement.purchase_amount,
            bonus_applied: settlement.bonus_applied,
            remainder_due: settlement.remainder_due,
            new_balance: settlement.new_balance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccrueResponse {
    pub subject: i64,
    pub purchase_amount: u64,
    pub bonus_added: u64,
    pub new_balance: u64,
}

impl From<AccrualReceipt> for AccrueResponse {
    fn from(receipt: AccrualReceipt) -> Self {
        Self {
            subject: receipt.subject.value(),
            purchase_amount: receipt.purchase_amount,
            bonus_added: receipt.bonus_added,
            new_balance: receipt.new_balance,
        }
    }
}
