//! Domain-specific error types for payment tokens and the bonus ledger
//!
//! Error messages here are safe to show to operators. Whether a message may
//! also reach an end user is decided by [`super::DomainError::is_user_facing`].

use thiserror::Error;

use crate::domain::entities::account::SubjectId;

/// Token validation and issuance failures
///
/// Validation failures are terminal for the request that presented the token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Token signature mismatch")]
    SignatureMismatch,

    #[error("Unknown token")]
    Unknown,

    #[error("Token expired")]
    Expired,

    #[error("Token subject does not match its record")]
    SubjectMismatch,

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Ledger mutation and lookup failures
///
/// Every variant guarantees that no partial mutation was committed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {subject}")]
    SubjectNotFound { subject: SubjectId },

    #[error("Account already registered: {subject}")]
    AlreadyRegistered { subject: SubjectId },

    #[error("Insufficient bonus, minimum qualifying purchase is {min_qualifying_purchase}")]
    InsufficientBonus { min_qualifying_purchase: u64 },

    #[error("Concurrent update conflict")]
    ConcurrencyConflict,

    #[error("Storage failure: {message}")]
    StorageFailure { message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl LedgerError {
    /// Whether a caller may retry the same request with bounded backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LedgerError::ConcurrencyConflict | LedgerError::StorageFailure { .. }
        )
    }

    /// Convenience constructor for storage failures
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::StorageFailure {
            message: message.into(),
        }
    }
}
