//! Domain entities representing core business objects.

pub mod account;
pub mod token;

// Re-export commonly used types
pub use account::{
    Account, SubjectId, TransactionKind, TransactionRecord, DEFAULT_INITIAL_BALANCE,
};
pub use token::{
    IssuedToken, TokenPayload, TokenRecord, ValidatedToken, NONCE_LENGTH,
    TOKEN_LIFETIME_MINUTES,
};
