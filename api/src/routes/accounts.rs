use actix_web::{web, HttpResponse};
use validator::Validate;

use bp_core::domain::entities::account::SubjectId;
use bp_core::repositories::{LedgerRepository, TokenStore};

use crate::app::AppState;
use crate::dto::{AccountResponse, BalanceResponse, RegisterAccountRequest};
use crate::handlers::{domain_error_response, validation_error_response};

/// Handler for POST /api/v1/accounts
///
/// Registers the holder with the welcome balance.
///
/// ```json
/// { "subject": 123456789, "phone": "+79161234567" }
/// ```
///
/// Responds 201 with the account, 400 for a bad phone, 409 if already registered.
pub async fn register<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<RegisterAccountRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(errors);
    }

    let subject = SubjectId::new(request.subject);
    match state.ledger_service.register(subject, &request.phone).await {
        Ok(account) => HttpResponse::Created().json(AccountResponse::from(account)),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for GET /api/v1/accounts/{subject}/balance
pub async fn balance<S, R>(
    state: web::Data<AppState<S, R>>,
    path: web::Path<i64>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    let subject = SubjectId::new(path.into_inner());
    match state.ledger_service.balance(subject).await {
        Ok(balance) => HttpResponse::Ok().json(BalanceResponse {
            subject: subject.value(),
            balance,
        }),
        Err(error) => domain_error_response(&error),
    }
}
