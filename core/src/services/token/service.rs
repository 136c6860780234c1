//! Token service tying issuance, validation and invalidation together

use std::sync::Arc;
use tracing::info;

use crate::domain::entities::account::SubjectId;
use crate::domain::entities::token::{IssuedToken, ValidatedToken};
use crate::errors::DomainResult;
use crate::repositories::TokenStore;

use super::config::TokenServiceConfig;
use super::issuer::TokenIssuer;
use super::signer::TokenSigner;
use super::validator::TokenValidator;

/// Service for managing payment tokens
///
/// Owns no global state: the token store is constructed by the caller and
/// shared through `Arc`, so its lifetime is the lifetime of the process
/// wiring that created it.
pub struct TokenService<S: TokenStore> {
    store: Arc<S>,
    issuer: TokenIssuer<S>,
    validator: TokenValidator<S>,
}

impl<S: TokenStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Token store shared with the cleanup scheduler
    /// * `config` - Signing secret and token lifetime
    ///
    /// # Returns
    ///
    /// A new `TokenService` or `DomainError::Internal` if the secret is unusable
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> DomainResult<Self> {
        let signer = TokenSigner::new(&config.secret_key)?;

        Ok(Self {
            issuer: TokenIssuer::new(store.clone(), signer.clone(), config.ttl),
            validator: TokenValidator::new(store.clone(), signer),
            store,
        })
    }

    /// Issues a token for `subject`, see [`TokenIssuer::issue`]
    pub async fn issue(&self, subject: SubjectId, cap: Option<u64>) -> DomainResult<IssuedToken> {
        self.issuer.issue(subject, cap).await
    }

    /// Validates a presented token, see [`TokenValidator::validate`]
    pub async fn validate(&self, token: &str) -> DomainResult<ValidatedToken> {
        self.validator.validate(token).await
    }

    /// Removes a token so that later validations fail with `Unknown`
    ///
    /// # Returns
    /// * `Ok(true)` - Token was registered and is now gone
    /// * `Ok(false)` - Token was not registered
    pub async fn invalidate(&self, token: &str) -> DomainResult<bool> {
        let removed = self.store.remove(token).await?;
        if removed {
            info!("Payment token invalidated");
        }
        Ok(removed)
    }

    /// The underlying token store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
