use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use bp_core::domain::entities::account::Account;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterAccountRequest {
    /// Chat or session identifier of the holder
    pub subject: i64,

    /// Russian mobile number, `8XXXXXXXXXX` or `+7XXXXXXXXXX`
    #[validate(length(min = 11, max = 16))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub subject: i64,
    pub balance: u64,
    pub registered_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            subject: account.subject.value(),
            balance: account.balance,
            registered_at: account.registered_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub subject: i64,
    pub balance: u64,
}
