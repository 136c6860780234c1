//! Shared error response structure and error codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard error response structure used across all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a detail field to the error response
    pub fn add_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        let details = self.details.get_or_insert_with(HashMap::new);
        if let Ok(json_value) = serde_json::to_value(value) {
            details.insert(key.into(), json_value);
        }
        self
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const MALFORMED_INPUT: &str = "MALFORMED_INPUT";
    pub const TOKEN_MALFORMED: &str = "TOKEN_MALFORMED";
    pub const TOKEN_SIGNATURE_MISMATCH: &str = "TOKEN_SIGNATURE_MISMATCH";
    pub const TOKEN_UNKNOWN: &str = "TOKEN_UNKNOWN";
    pub const TOKEN_EXPIRED: &str = "TOKEN_EXPIRED";
    pub const TOKEN_SUBJECT_MISMATCH: &str = "TOKEN_SUBJECT_MISMATCH";
    pub const TOKEN_GENERATION_FAILED: &str = "TOKEN_GENERATION_FAILED";
    pub const SUBJECT_NOT_FOUND: &str = "SUBJECT_NOT_FOUND";
    pub const ALREADY_REGISTERED: &str = "ALREADY_REGISTERED";
    pub const INSUFFICIENT_BONUS: &str = "INSUFFICIENT_BONUS";
    pub const CONCURRENCY_CONFLICT: &str = "CONCURRENCY_CONFLICT";
    pub const STORAGE_FAILURE: &str = "STORAGE_FAILURE";
    pub const CANCELLED: &str = "CANCELLED";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_with_details() {
        let response = ErrorResponse::new(error_codes::INSUFFICIENT_BONUS, "Insufficient bonus")
            .add_detail("min_qualifying_purchase", 201u64);

        assert_eq!(response.error, "INSUFFICIENT_BONUS");
        let details = response.details.unwrap();
        assert_eq!(details["min_qualifying_purchase"], 201);
    }

    #[test]
    fn test_details_omitted_when_empty() {
        let response = ErrorResponse::new(error_codes::NOT_FOUND, "missing");
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
    }
}
