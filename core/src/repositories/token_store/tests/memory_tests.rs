//! Unit tests for the in-memory token store

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::account::SubjectId;
use crate::domain::entities::token::TokenRecord;
use crate::errors::{DomainError, TokenError};
use crate::repositories::token_store::{InMemoryTokenStore, TokenStore};

fn record(subject: i64, expires_in: Duration) -> TokenRecord {
    TokenRecord {
        subject: SubjectId::new(subject),
        expires_at: Utc::now() + expires_in,
        cap: None,
    }
}

#[tokio::test]
async fn test_insert_get_remove() {
    let store = InMemoryTokenStore::new();
    let rec = record(1, Duration::minutes(10));

    store.insert("tok-a".to_string(), rec.clone()).await.unwrap();
    assert_eq!(store.get("tok-a").await.unwrap(), Some(rec));
    assert_eq!(store.get("tok-b").await.unwrap(), None);

    assert!(store.remove("tok-a").await.unwrap());
    assert!(!store.remove("tok-a").await.unwrap());
    assert!(store.is_empty().await.unwrap());
}

#[tokio::test]
async fn test_duplicate_insert_is_rejected() {
    let store = InMemoryTokenStore::new();
    store
        .insert("same".to_string(), record(1, Duration::minutes(10)))
        .await
        .unwrap();

    let result = store
        .insert("same".to_string(), record(2, Duration::minutes(10)))
        .await;

    assert_eq!(result, Err(DomainError::Token(TokenError::GenerationFailed)));
    assert_eq!(store.get("same").await.unwrap().unwrap().subject, SubjectId::new(1));
}

#[tokio::test]
async fn test_remove_expired_only_touches_expired() {
    let store = InMemoryTokenStore::new();
    store.insert("live".to_string(), record(1, Duration::minutes(5))).await.unwrap();
    store.insert("dead-1".to_string(), record(2, -Duration::seconds(1))).await.unwrap();
    store.insert("dead-2".to_string(), record(3, -Duration::minutes(30))).await.unwrap();

    assert_eq!(store.remove_expired(Utc::now()).await.unwrap(), 2);
    assert_eq!(store.remove_expired(Utc::now()).await.unwrap(), 0);
    assert_eq!(store.len().await.unwrap(), 1);
    assert!(store.get("live").await.unwrap().is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_insert_read_delete() {
    let store = Arc::new(InMemoryTokenStore::new());
    let mut handles = Vec::new();

    for i in 0..64i64 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("tok-{i}");
            store.insert(key.clone(), record(i, Duration::minutes(1))).await.unwrap();
            let found = store.get(&key).await.unwrap().unwrap();
            assert_eq!(found.subject, SubjectId::new(i));
            if i % 2 == 0 {
                assert!(store.remove(&key).await.unwrap());
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len().await.unwrap(), 32);
}
