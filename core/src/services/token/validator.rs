//! Token validation

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::entities::token::ValidatedToken;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::TokenStore;

use super::signer::TokenSigner;

/// Verifies signature, registration and liveness of presented tokens
pub struct TokenValidator<S: TokenStore> {
    store: Arc<S>,
    signer: TokenSigner,
}

impl<S: TokenStore> TokenValidator<S> {
    pub fn new(store: Arc<S>, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    /// Validates a token and returns what it asserts
    ///
    /// The store is authoritative: a correctly signed token that is not
    /// registered, or whose record has expired, is rejected. An expired
    /// record is evicted on the spot rather than left for the sweep.
    ///
    /// # Returns
    /// * `Ok(ValidatedToken)` - Subject and cap from the stored record
    /// * `Err(TokenError::MalformedToken)` - Undecodable token
    /// * `Err(TokenError::SignatureMismatch)` - Forged or altered token
    /// * `Err(TokenError::Unknown)` - Not registered (never issued, invalidated or swept)
    /// * `Err(TokenError::Expired)` - Registered but past its expiry
    /// * `Err(TokenError::SubjectMismatch)` - Record and payload disagree
    pub async fn validate(&self, token: &str) -> DomainResult<ValidatedToken> {
        let payload = self.signer.decode(token).map_err(|e| {
            warn!(error = %e, "Rejected payment token");
            e
        })?;

        let record = self
            .store
            .get(token)
            .await?
            .ok_or(TokenError::Unknown)?;

        if record.is_expired_at(Utc::now()) {
            self.store.remove(token).await?;
            debug!(subject = %record.subject, "Evicted expired payment token");
            return Err(TokenError::Expired.into());
        }

        if record.subject != payload.subject {
            warn!(
                payload_subject = %payload.subject,
                record_subject = %record.subject,
                "Payment token subject does not match its record"
            );
            return Err(TokenError::SubjectMismatch.into());
        }

        Ok(ValidatedToken {
            subject: record.subject,
            cap: record.cap,
        })
    }
}
