//! Payment token entities.
//!
//! A token asserts a subject, and optionally a spending cap, for a short
//! window. Its payload is signed; the matching [`TokenRecord`] lives only in
//! the token store and is what makes the token valid.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::account::SubjectId;
use crate::errors::TokenError;

/// Token lifetime (10 minutes)
pub const TOKEN_LIFETIME_MINUTES: i64 = 10;

/// Random bytes in a token nonce
pub const NONCE_LENGTH: usize = 16;

/// Field separator inside the canonical payload
const FIELD_SEPARATOR: char = '|';

/// Signed content of a payment token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Account holder the token is bound to
    pub subject: SubjectId,

    /// Maximum bonus the holder allows to be spent, if any
    pub cap: Option<u64>,

    /// Issuance time, millisecond precision
    pub issued_at: DateTime<Utc>,

    /// Hex-encoded random nonce making every token unique
    pub nonce: String,
}

impl TokenPayload {
    /// Creates a payload issued now with a fresh nonce
    pub fn new(subject: SubjectId, cap: Option<u64>) -> Self {
        let mut nonce = [0u8; NONCE_LENGTH];
        rand::thread_rng().fill_bytes(&mut nonce);

        let now = Utc::now();
        let issued_at = Utc
            .timestamp_millis_opt(now.timestamp_millis())
            .single()
            .unwrap_or(now);

        Self {
            subject,
            cap,
            issued_at,
            nonce: hex::encode(nonce),
        }
    }

    /// Canonical text form: `subject|cap|issued_at_ms|nonce`, empty cap when absent
    pub fn to_canonical(&self) -> String {
        format!(
            "{subject}{sep}{cap}{sep}{issued}{sep}{nonce}",
            subject = self.subject,
            cap = self.cap.map(|c| c.to_string()).unwrap_or_default(),
            issued = self.issued_at.timestamp_millis(),
            nonce = self.nonce,
            sep = FIELD_SEPARATOR,
        )
    }

    /// Parses the canonical text form
    pub fn parse(canonical: &str) -> Result<Self, TokenError> {
        let mut fields = canonical.split(FIELD_SEPARATOR);
        let (Some(subject), Some(cap), Some(issued), Some(nonce), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(TokenError::MalformedToken);
        };

        let subject = subject
            .parse::<SubjectId>()
            .map_err(|_| TokenError::MalformedToken)?;
        let cap = match cap {
            "" => None,
            value => Some(value.parse::<u64>().map_err(|_| TokenError::MalformedToken)?),
        };
        let issued_at = issued
            .parse::<i64>()
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .ok_or(TokenError::MalformedToken)?;

        if nonce.len() != NONCE_LENGTH * 2 || !nonce.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TokenError::MalformedToken);
        }

        Ok(Self {
            subject,
            cap,
            issued_at,
            nonce: nonce.to_string(),
        })
    }
}

/// Server-side metadata registered for an issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Must equal the subject inside the token's payload
    pub subject: SubjectId,

    /// Instant after which the token is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Spending cap carried by the token
    pub cap: Option<u64>,
}

impl TokenRecord {
    /// Creates a record for `payload` valid for `ttl` from its issuance
    pub fn for_payload(payload: &TokenPayload, ttl: Duration) -> Self {
        Self {
            subject: payload.subject,
            expires_at: payload.issued_at + ttl,
            cap: payload.cap,
        }
    }

    /// Checks whether the record has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks whether the record has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Result of issuing a token, handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Opaque token string
    pub token: String,

    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// What a successfully validated token asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedToken {
    pub subject: SubjectId,
    pub cap: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_canonical_round_trip() {
        let payload = TokenPayload::new(SubjectId::new(555), Some(300));
        let parsed = TokenPayload::parse(&payload.to_canonical()).unwrap();
        assert_eq!(parsed, payload);

        let identity_only = TokenPayload::new(SubjectId::new(-12), None);
        let canonical = identity_only.to_canonical();
        assert!(canonical.starts_with("-12||"));
        assert_eq!(TokenPayload::parse(&canonical).unwrap(), identity_only);
    }

    #[test]
    fn test_nonces_differ() {
        let a = TokenPayload::new(SubjectId::new(1), None);
        let b = TokenPayload::new(SubjectId::new(1), None);
        assert_ne!(a.nonce, b.nonce);
        assert_eq!(a.nonce.len(), NONCE_LENGTH * 2);
    }

    #[test]
    fn test_parse_rejects_malformed_payloads() {
        let nonce = "0".repeat(NONCE_LENGTH * 2);
        let cases = [
            String::new(),
            "1|2|3".to_string(),
            format!("x||1700000000000|{}", nonce),
            format!("1|-5|1700000000000|{}", nonce),
            format!("1||soon|{}", nonce),
            "1||1700000000000|zz".to_string(),
            format!("1||1700000000000|{}|extra", nonce),
        ];

        for case in cases {
            assert_eq!(TokenPayload::parse(&case), Err(TokenError::MalformedToken), "{case}");
        }
    }

    #[test]
    fn test_record_expiry() {
        let payload = TokenPayload::new(SubjectId::new(9), None);
        let record = TokenRecord::for_payload(&payload, Duration::minutes(TOKEN_LIFETIME_MINUTES));

        assert_eq!(record.subject, payload.subject);
        assert!(!record.is_expired());
        assert!(record.is_expired_at(payload.issued_at + Duration::minutes(10)));
        assert!(!record.is_expired_at(payload.issued_at + Duration::minutes(9)));
    }
}
