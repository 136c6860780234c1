//! Process-local token store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::TokenRecord;
use crate::errors::{DomainResult, TokenError};

use super::r#trait::TokenStore;

/// In-memory token store backed by a read-write locked map
///
/// Cloning yields another handle to the same map.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, TokenRecord>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert(&self, token: String, record: TokenRecord) -> DomainResult<()> {
        let mut tokens = self.tokens.write().await;

        if tokens.contains_key(&token) {
            return Err(TokenError::GenerationFailed.into());
        }

        tokens.insert(token, record);
        Ok(())
    }

    async fn get(&self, token: &str) -> DomainResult<Option<TokenRecord>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> DomainResult<bool> {
        let mut tokens = self.tokens.write().await;
        Ok(tokens.remove(token).is_some())
    }

    async fn remove_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|_, record| !record.is_expired_at(now));

        Ok(initial_count - tokens.len())
    }

    async fn len(&self) -> DomainResult<usize> {
        Ok(self.tokens.read().await.len())
    }
}
