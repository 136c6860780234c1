//! Token store trait defining the registry of issued payment tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainResult;

/// Registry mapping an issued token string to its [`TokenRecord`]
///
/// Implementations must tolerate concurrent inserts, reads and deletes from
/// independent callers. Membership is authoritative: a token that is not in
/// the store is not valid, whatever its signature says.
///
/// Nothing here survives a process restart; restarting invalidates every
/// outstanding token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Register a freshly issued token
    ///
    /// # Returns
    /// * `Ok(())` - Token registered
    /// * `Err(DomainError)` - A record already exists under this token string
    async fn insert(&self, token: String, record: TokenRecord) -> DomainResult<()>;

    /// Look up the record for a token string
    async fn get(&self, token: &str) -> DomainResult<Option<TokenRecord>>;

    /// Remove a token
    ///
    /// # Returns
    /// * `Ok(true)` - Token was removed
    /// * `Ok(false)` - Token was not present
    async fn remove(&self, token: &str) -> DomainResult<bool>;

    /// Remove every record whose expiry is at or before `now`
    ///
    /// # Returns
    /// Number of records removed
    async fn remove_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;

    /// Number of registered tokens, expired or not
    async fn len(&self) -> DomainResult<usize>;

    /// Whether the store holds no tokens
    async fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len().await? == 0)
    }
}
