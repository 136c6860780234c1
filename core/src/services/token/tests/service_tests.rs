//! Unit tests for token issuance and validation

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::account::SubjectId;
use crate::domain::entities::token::{TokenPayload, TokenRecord};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{InMemoryTokenStore, TokenStore};
use crate::services::token::{TokenService, TokenServiceConfig, TokenSigner};

const SECRET: &str = "service-test-secret";

fn create_test_service(ttl: Duration) -> TokenService<InMemoryTokenStore> {
    let config = TokenServiceConfig {
        secret_key: SECRET.to_string(),
        ttl,
    };
    TokenService::new(Arc::new(InMemoryTokenStore::new()), config)
        .expect("Failed to create token service")
}

fn token_error(result: Result<impl std::fmt::Debug, DomainError>) -> TokenError {
    match result {
        Err(DomainError::Token(e)) => e,
        other => panic!("expected token error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issue_then_validate_round_trip() {
    let service = create_test_service(Duration::minutes(10));
    let subject = SubjectId::new(123456);

    let issued = service.issue(subject, Some(500)).await.unwrap();
    let validated = service.validate(&issued.token).await.unwrap();

    assert_eq!(validated.subject, subject);
    assert_eq!(validated.cap, Some(500));

    let lifetime = issued.expires_at - Utc::now();
    assert!(lifetime > Duration::minutes(9) && lifetime <= Duration::minutes(10));
}

#[tokio::test]
async fn test_identity_only_token() {
    let service = create_test_service(Duration::minutes(10));
    let issued = service.issue(SubjectId::new(5), None).await.unwrap();

    let validated = service.validate(&issued.token).await.unwrap();
    assert_eq!(validated.cap, None);
}

#[tokio::test]
async fn test_zero_cap_is_rejected() {
    let service = create_test_service(Duration::minutes(10));
    let result = service.issue(SubjectId::new(5), Some(0)).await;

    assert!(matches!(result, Err(DomainError::MalformedInput { .. })));
    assert!(service.store().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_reissue_keeps_prior_token_valid() {
    let service = create_test_service(Duration::minutes(10));
    let subject = SubjectId::new(8);

    let first = service.issue(subject, None).await.unwrap();
    let second = service.issue(subject, None).await.unwrap();

    assert_ne!(first.token, second.token);
    assert!(service.validate(&first.token).await.is_ok());
    assert!(service.validate(&second.token).await.is_ok());
}

#[tokio::test]
async fn test_token_is_reusable_within_ttl() {
    let service = create_test_service(Duration::minutes(10));
    let issued = service.issue(SubjectId::new(8), None).await.unwrap();

    for _ in 0..3 {
        assert!(service.validate(&issued.token).await.is_ok());
    }
}

#[tokio::test]
async fn test_expired_token_is_rejected_and_evicted() {
    let service = create_test_service(Duration::zero());
    let issued = service.issue(SubjectId::new(1), None).await.unwrap();
    assert_eq!(service.store().len().await.unwrap(), 1);

    assert_eq!(token_error(service.validate(&issued.token).await), TokenError::Expired);
    assert!(service.store().is_empty().await.unwrap());

    // Evicted, so the next attempt no longer finds it
    assert_eq!(token_error(service.validate(&issued.token).await), TokenError::Unknown);
}

#[tokio::test]
async fn test_token_expires_after_ttl_elapses() {
    let service = create_test_service(Duration::milliseconds(200));
    let issued = service.issue(SubjectId::new(1), None).await.unwrap();
    assert!(service.validate(&issued.token).await.is_ok());

    tokio::time::sleep(std::time::Duration::from_millis(300)).await;

    assert_eq!(token_error(service.validate(&issued.token).await), TokenError::Expired);
}

#[tokio::test]
async fn test_well_signed_but_unregistered_token_is_unknown() {
    let service = create_test_service(Duration::minutes(10));
    let signer = TokenSigner::new(SECRET).unwrap();
    let token = signer.encode(&TokenPayload::new(SubjectId::new(3), None));

    assert_eq!(token_error(service.validate(&token).await), TokenError::Unknown);
}

#[tokio::test]
async fn test_invalidated_token_is_unknown() {
    let service = create_test_service(Duration::minutes(10));
    let issued = service.issue(SubjectId::new(3), None).await.unwrap();

    assert!(service.invalidate(&issued.token).await.unwrap());
    assert!(!service.invalidate(&issued.token).await.unwrap());
    assert_eq!(token_error(service.validate(&issued.token).await), TokenError::Unknown);
}

#[tokio::test]
async fn test_subject_mismatch_between_store_and_payload() {
    let store = Arc::new(InMemoryTokenStore::new());
    let config = TokenServiceConfig {
        secret_key: SECRET.to_string(),
        ttl: Duration::minutes(10),
    };
    let service = TokenService::new(store.clone(), config).unwrap();

    let signer = TokenSigner::new(SECRET).unwrap();
    let payload = TokenPayload::new(SubjectId::new(10), None);
    let token = signer.encode(&payload);
    store
        .insert(
            token.clone(),
            TokenRecord {
                subject: SubjectId::new(11),
                expires_at: Utc::now() + Duration::minutes(5),
                cap: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(token_error(service.validate(&token).await), TokenError::SubjectMismatch);
}

#[tokio::test]
async fn test_tampered_and_malformed_tokens() {
    let service = create_test_service(Duration::minutes(10));
    let issued = service.issue(SubjectId::new(9), None).await.unwrap();

    let other_key = TokenSigner::new("attacker-secret").unwrap();
    let forged = other_key.encode(&TokenPayload::new(SubjectId::new(9), None));
    assert_eq!(token_error(service.validate(&forged).await), TokenError::SignatureMismatch);

    let truncated = &issued.token[..issued.token.len() / 2];
    assert!(matches!(
        token_error(service.validate(truncated).await),
        TokenError::MalformedToken | TokenError::SignatureMismatch
    ));
    assert_eq!(token_error(service.validate("garbage").await), TokenError::MalformedToken);
}

#[tokio::test]
async fn test_rejects_empty_secret() {
    let config = TokenServiceConfig {
        secret_key: String::new(),
        ttl: Duration::minutes(10),
    };
    let result = TokenService::new(Arc::new(InMemoryTokenStore::new()), config);
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}
