//! Token string encoding and keyed-hash signing
//!
//! Wire format: `base64url(payload) "." base64url(HMAC-SHA256(secret, payload))`,
//! both segments without padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::entities::token::TokenPayload;
use crate::errors::{DomainError, DomainResult, TokenError};

type HmacSha256 = Hmac<Sha256>;

/// Separator between the payload and signature segments
pub const TOKEN_SEPARATOR: char = '.';

/// Signs payloads into token strings and verifies them back
#[derive(Clone)]
pub struct TokenSigner {
    mac: HmacSha256,
}

impl TokenSigner {
    /// Creates a signer keyed with `secret`
    ///
    /// # Returns
    /// * `Err(DomainError::Internal)` - The secret is empty
    pub fn new(secret: &str) -> DomainResult<Self> {
        if secret.is_empty() {
            return Err(DomainError::Internal {
                message: "token signing secret is empty".to_string(),
            });
        }

        let mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| DomainError::Internal {
            message: format!("invalid token signing key: {}", e),
        })?;

        Ok(Self { mac })
    }

    fn signature(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }

    /// Encodes and signs a payload into an opaque token string
    pub fn encode(&self, payload: &TokenPayload) -> String {
        let canonical = payload.to_canonical();
        let signature = self.signature(canonical.as_bytes());

        format!(
            "{}{}{}",
            URL_SAFE_NO_PAD.encode(canonical.as_bytes()),
            TOKEN_SEPARATOR,
            URL_SAFE_NO_PAD.encode(signature)
        )
    }

    /// Decodes a token string and verifies its signature
    ///
    /// # Returns
    /// * `Ok(TokenPayload)` - Signature valid, payload well-formed
    /// * `Err(TokenError::MalformedToken)` - Encoding or payload is broken
    /// * `Err(TokenError::SignatureMismatch)` - Signature does not match
    pub fn decode(&self, token: &str) -> Result<TokenPayload, TokenError> {
        let (payload_segment, signature_segment) = token
            .split_once(TOKEN_SEPARATOR)
            .ok_or(TokenError::MalformedToken)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_segment)
            .map_err(|_| TokenError::MalformedToken)?;
        let supplied = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|_| TokenError::MalformedToken)?;

        let expected = self.signature(&payload);
        if !constant_time_eq(&expected, &supplied) {
            return Err(TokenError::SignatureMismatch);
        }

        let canonical = String::from_utf8(payload).map_err(|_| TokenError::MalformedToken)?;
        TokenPayload::parse(&canonical)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}
