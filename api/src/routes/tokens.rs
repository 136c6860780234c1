use actix_web::{web, HttpResponse};
use validator::Validate;

use bp_core::domain::entities::account::SubjectId;
use bp_core::repositories::{LedgerRepository, TokenStore};

use crate::app::AppState;
use crate::dto::{IssueTokenRequest, IssueTokenResponse, ValidateTokenRequest, ValidateTokenResponse};
use crate::handlers::{domain_error_response, validation_error_response};

use super::token_prefix;

/// Handler for POST /api/v1/tokens
///
/// Issues a token for a registered holder. The caller turns it into a
/// scannable code; earlier tokens of the holder stay valid.
///
/// ```json
/// { "subject": 123456789, "cap": 500 }
/// ```
pub async fn issue<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<IssueTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let subject = SubjectId::new(request.subject);
    if let Err(error) = state.ledger_service.account(subject).await {
        return domain_error_response(&error);
    }

    match state.token_service.issue(subject, request.cap).await {
        Ok(issued) => {
            log::info!(
                "Issued token {}.. for subject {}",
                token_prefix(&issued.token),
                subject
            );
            HttpResponse::Created().json(IssueTokenResponse {
                token: issued.token,
                expires_at: issued.expires_at,
            })
        }
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for POST /api/v1/tokens/validate
///
/// Responds 200 with the bound subject and cap, or 401 with the token error code.
pub async fn validate<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<ValidateTokenRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    match state.token_service.validate(&request.token).await {
        Ok(validated) => HttpResponse::Ok().json(ValidateTokenResponse {
            subject: validated.subject.value(),
            cap: validated.cap,
        }),
        Err(error) => {
            log::warn!("Token {}.. rejected", token_prefix(&request.token));
            domain_error_response(&error)
        }
    }
}
