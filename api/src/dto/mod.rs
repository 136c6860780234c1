//! Request and response bodies

pub mod accounts;
pub mod bonus;
pub mod tokens;

pub use accounts::{AccountResponse, BalanceResponse, RegisterAccountRequest};
pub use bonus::{AccrueResponse, BonusRequest, QuoteResponse, SettleResponse};
pub use tokens::{IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, ValidateTokenResponse};
