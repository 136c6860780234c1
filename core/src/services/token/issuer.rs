//! Token issuance

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::entities::account::SubjectId;
use crate::domain::entities::token::{IssuedToken, TokenPayload, TokenRecord};
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::TokenStore;

use super::signer::TokenSigner;

/// Builds signed tokens and registers them in the token store
pub struct TokenIssuer<S: TokenStore> {
    store: Arc<S>,
    signer: TokenSigner,
    ttl: Duration,
}

impl<S: TokenStore> TokenIssuer<S> {
    pub fn new(store: Arc<S>, signer: TokenSigner, ttl: Duration) -> Self {
        Self { store, signer, ttl }
    }

    /// Issues a token bound to `subject`, optionally carrying a spending cap
    ///
    /// Earlier tokens of the same subject stay valid until they expire.
    ///
    /// # Returns
    /// * `Ok(IssuedToken)` - Token string and its expiry
    /// * `Err(DomainError::MalformedInput)` - Cap of zero
    /// * `Err(TokenError::GenerationFailed)` - Registration failed
    pub async fn issue(&self, subject: SubjectId, cap: Option<u64>) -> DomainResult<IssuedToken> {
        if cap == Some(0) {
            return Err(DomainError::malformed("spending cap must be positive"));
        }

        let payload = TokenPayload::new(subject, cap);
        let record = TokenRecord::for_payload(&payload, self.ttl);
        let expires_at = record.expires_at;
        let token = self.signer.encode(&payload);

        self.store.insert(token.clone(), record).await.map_err(|e| {
            error!(subject = %subject, error = %e, "Failed to register payment token");
            DomainError::Token(TokenError::GenerationFailed)
        })?;

        debug!(subject = %subject, capped = cap.is_some(), %expires_at, "Issued payment token");

        Ok(IssuedToken { token, expires_at })
    }
}
