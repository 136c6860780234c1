//! Point-of-sale endpoints
//!
//! Each request carries the holder's token. The token is validated first;
//! the ledger is only touched for the subject the token is bound to, and a
//! spending cap on the token bounds the settlement.

use actix_web::{web, HttpResponse};
use validator::Validate;

use bp_core::domain::entities::token::ValidatedToken;
use bp_core::repositories::{LedgerRepository, TokenStore};

use crate::app::AppState;
use crate::dto::{AccrueResponse, BonusRequest, QuoteResponse, SettleResponse};
use crate::handlers::{domain_error_response, validation_error_response};

use super::token_prefix;

async fn authorize<S, R>(
    state: &AppState<S, R>,
    request: &BonusRequest,
) -> Result<ValidatedToken, HttpResponse>
where
    S: TokenStore,
    R: LedgerRepository,
{
    if let Err(errors) = request.validate() {
        return Err(validation_error_response(errors));
    }

    state
        .token_service
        .validate(&request.token)
        .await
        .map_err(|error| {
            log::warn!("Token {}.. rejected at point of sale", token_prefix(&request.token));
            domain_error_response(&error)
        })
}

/// Handler for POST /api/v1/bonus/quote
pub async fn quote<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<BonusRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    let token = match authorize(&state, &request).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match state
        .ledger_service
        .quote(token.subject, request.purchase_amount, token.cap)
        .await
    {
        Ok(quote) => HttpResponse::Ok().json(QuoteResponse::from(quote)),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for POST /api/v1/bonus/settle
///
/// ```json
/// { "token": "...", "purchase_amount": 2500 }
/// ```
///
/// Responds 200 with the settlement, or 422 with `min_qualifying_purchase`
/// in `details` when no bonus applies.
pub async fn settle<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<BonusRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    let token = match authorize(&state, &request).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match state
        .ledger_service
        .settle_capped(token.subject, request.purchase_amount, token.cap)
        .await
    {
        Ok(settlement) => HttpResponse::Ok().json(SettleResponse::from(settlement)),
        Err(error) => domain_error_response(&error),
    }
}

/// Handler for POST /api/v1/bonus/accrue
///
/// Credits the configured percentage of the purchase.
pub async fn accrue<S, R>(
    state: web::Data<AppState<S, R>>,
    request: web::Json<BonusRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    let token = match authorize(&state, &request).await {
        Ok(token) => token,
        Err(response) => return response,
    };

    match state
        .ledger_service
        .accrue_default(token.subject, request.purchase_amount)
        .await
    {
        Ok(receipt) => HttpResponse::Ok().json(AccrueResponse::from(receipt)),
        Err(error) => domain_error_response(&error),
    }
}
