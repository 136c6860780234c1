//! Unit tests for token encoding and signing

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::domain::entities::account::SubjectId;
use crate::domain::entities::token::TokenPayload;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{TokenSigner, TOKEN_SEPARATOR};

fn signer() -> TokenSigner {
    TokenSigner::new("unit-test-secret").unwrap()
}

#[test]
fn test_encode_decode() {
    let signer = signer();
    let payload = TokenPayload::new(SubjectId::new(100), Some(250));

    let token = signer.encode(&payload);
    assert_eq!(token.matches(TOKEN_SEPARATOR).count(), 1);
    assert!(!token.contains('='));
    assert!(!token.contains('+') && !token.contains('/'));

    assert_eq!(signer.decode(&token).unwrap(), payload);
}

#[test]
fn test_empty_secret_is_rejected() {
    assert!(matches!(
        TokenSigner::new(""),
        Err(DomainError::Internal { .. })
    ));
}

#[test]
fn test_other_key_fails_signature() {
    let payload = TokenPayload::new(SubjectId::new(1), None);
    let token = signer().encode(&payload);

    let other = TokenSigner::new("another-secret").unwrap();
    assert_eq!(other.decode(&token), Err(TokenError::SignatureMismatch));
}

#[test]
fn test_every_signature_bit_flip_is_detected() {
    let signer = signer();
    let token = signer.encode(&TokenPayload::new(SubjectId::new(77), None));
    let (payload_segment, signature_segment) = token.split_once(TOKEN_SEPARATOR).unwrap();
    let signature = URL_SAFE_NO_PAD.decode(signature_segment).unwrap();

    for byte in 0..signature.len() {
        for bit in 0..8 {
            let mut tampered = signature.clone();
            tampered[byte] ^= 1 << bit;
            let forged = format!(
                "{}{}{}",
                payload_segment,
                TOKEN_SEPARATOR,
                URL_SAFE_NO_PAD.encode(&tampered)
            );
            assert_eq!(signer.decode(&forged), Err(TokenError::SignatureMismatch));
        }
    }
}

#[test]
fn test_payload_substitution_is_detected() {
    let signer = signer();
    let original = signer.encode(&TokenPayload::new(SubjectId::new(1), None));
    let victim = signer.encode(&TokenPayload::new(SubjectId::new(2), None));

    let (_, signature) = original.split_once(TOKEN_SEPARATOR).unwrap();
    let (victim_payload, _) = victim.split_once(TOKEN_SEPARATOR).unwrap();
    let spliced = format!("{}{}{}", victim_payload, TOKEN_SEPARATOR, signature);

    assert_eq!(signer.decode(&spliced), Err(TokenError::SignatureMismatch));
}

#[test]
fn test_malformed_encodings() {
    let signer = signer();
    for token in ["", "no-separator", "a.b", "!!!.???", "bm9wZQ"] {
        assert_eq!(signer.decode(token), Err(TokenError::MalformedToken), "{token}");
    }
}

#[test]
fn test_signed_garbage_payload_is_malformed() {
    use hmac::{Hmac, Mac};

    let payload = b"not|a|payload";
    let mut mac = Hmac::<sha2::Sha256>::new_from_slice(b"unit-test-secret").unwrap();
    mac.update(payload);
    let signature = mac.finalize().into_bytes();

    let token = format!(
        "{}{}{}",
        URL_SAFE_NO_PAD.encode(payload),
        TOKEN_SEPARATOR,
        URL_SAFE_NO_PAD.encode(signature)
    );

    assert_eq!(signer().decode(&token), Err(TokenError::MalformedToken));
}
