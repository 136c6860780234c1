//! Domain-specific error types and error handling.

mod types;


pub use types::{LedgerError, TokenError};

use bp_shared::errors::error_codes;
use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl DomainError {
    /// Convenience constructor for input validation failures
    pub fn malformed(message: impl Into<String>) -> Self {
        DomainError::MalformedInput {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::MalformedInput { .. } => error_codes::MALFORMED_INPUT,
            DomainError::Internal { .. } => error_codes::INTERNAL_ERROR,
            DomainError::Token(err) => match err {
                TokenError::MalformedToken => error_codes::TOKEN_MALFORMED,
                TokenError::SignatureMismatch => error_codes::TOKEN_SIGNATURE_MISMATCH,
                TokenError::Unknown => error_codes::TOKEN_UNKNOWN,
                TokenError::Expired => error_codes::TOKEN_EXPIRED,
                TokenError::SubjectMismatch => error_codes::TOKEN_SUBJECT_MISMATCH,
                TokenError::GenerationFailed => error_codes::TOKEN_GENERATION_FAILED,
            },
            DomainError::Ledger(err) => match err {
                LedgerError::SubjectNotFound { .. } => error_codes::SUBJECT_NOT_FOUND,
                LedgerError::AlreadyRegistered { .. } => error_codes::ALREADY_REGISTERED,
                LedgerError::InsufficientBonus { .. } => error_codes::INSUFFICIENT_BONUS,
                LedgerError::ConcurrencyConflict => error_codes::CONCURRENCY_CONFLICT,
                LedgerError::StorageFailure { .. } => error_codes::STORAGE_FAILURE,
                LedgerError::Cancelled => error_codes::CANCELLED,
            },
        }
    }

    /// Whether the message can be shown verbatim to an end user
    ///
    /// Storage, concurrency and internal failures carry operator detail and
    /// must be replaced with a generic message before leaving the service.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            DomainError::Internal { .. }
                | DomainError::Ledger(LedgerError::ConcurrencyConflict)
                | DomainError::Ledger(LedgerError::StorageFailure { .. })
        )
    }

    /// Whether the failed operation may be retried by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, DomainError::Ledger(err) if err.is_retryable())
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
