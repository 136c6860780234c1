use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use bp_core::errors::{DomainError, LedgerError, TokenError};
use bp_shared::{error_codes, ErrorResponse};

/// Message returned in place of operator-facing failure details
pub const UNAVAILABLE_MESSAGE: &str = "The service could not complete the request, please retry";

/// HTTP status for a domain failure
pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::MalformedInput { .. } => StatusCode::BAD_REQUEST,
        DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(TokenError::GenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::Token(_) => StatusCode::UNAUTHORIZED,
        DomainError::Ledger(err) => match err {
            LedgerError::SubjectNotFound { .. } => StatusCode::NOT_FOUND,
            LedgerError::AlreadyRegistered { .. } => StatusCode::CONFLICT,
            LedgerError::InsufficientBonus { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::ConcurrencyConflict => StatusCode::CONFLICT,
            LedgerError::StorageFailure { .. } | LedgerError::Cancelled => {
                StatusCode::SERVICE_UNAVAILABLE
            }
        },
    }
}

/// Converts a domain failure into a JSON error response
///
/// Operator-facing failures are logged with full detail and answered with a
/// generic message.
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    let status = status_for(error);

    let mut body = if error.is_user_facing() {
        log::warn!("Request rejected: {}", error);
        ErrorResponse::new(error.error_code(), error.to_string())
    } else {
        log::error!("Request failed: {:?}", error);
        ErrorResponse::new(error.error_code(), UNAVAILABLE_MESSAGE)
    };

    if let DomainError::Ledger(LedgerError::InsufficientBonus {
        min_qualifying_purchase,
    }) = error
    {
        body = body.add_detail("min_qualifying_purchase", min_qualifying_purchase);
    }
    if error.is_retryable() {
        body = body.add_detail("retryable", true);
    }

    HttpResponse::build(status).json(body)
}

/// Converts request validation failures into a 400 response listing the fields
pub fn validation_error_response(errors: ValidationErrors) -> HttpResponse {
    let fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();

    log::warn!("Validation failed for fields: {:?}", fields);

    HttpResponse::BadRequest().json(
        ErrorResponse::new(error_codes::MALFORMED_INPUT, "Invalid request data")
            .add_detail("fields", fields),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bp_core::domain::entities::account::SubjectId;

    #[test]
    fn test_token_failures_are_unauthorized() {
        for err in [
            TokenError::MalformedToken,
            TokenError::SignatureMismatch,
            TokenError::Unknown,
            TokenError::Expired,
            TokenError::SubjectMismatch,
        ] {
            assert_eq!(status_for(&err.into()), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_ledger_status_mapping() {
        let cases = [
            (
                LedgerError::SubjectNotFound {
                    subject: SubjectId::new(1),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                LedgerError::AlreadyRegistered {
                    subject: SubjectId::new(1),
                },
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::InsufficientBonus {
                    min_qualifying_purchase: 1,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (LedgerError::ConcurrencyConflict, StatusCode::CONFLICT),
            (LedgerError::storage("disk full"), StatusCode::SERVICE_UNAVAILABLE),
        ];

        for (err, status) in cases {
            assert_eq!(status_for(&err.into()), status);
        }
    }

    #[test]
    fn test_malformed_input_is_bad_request() {
        let response = domain_error_response(&DomainError::malformed("purchase amount must be positive"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
