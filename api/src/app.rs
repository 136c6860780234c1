//! Application state and factory
//!
//! This module holds the shared services and provides the factory for
//! creating the Actix-web application.

use actix_web::{body::MessageBody, middleware::Logger, web, App, HttpResponse};
use std::sync::Arc;

use bp_core::repositories::{LedgerRepository, TokenStore};
use bp_core::services::ledger::LedgerService;
use bp_core::services::token::TokenService;
use bp_shared::{error_codes, ErrorResponse};

use crate::middleware::cors::create_cors;
use crate::routes::{accounts, bonus, tokens};

/// Application state that holds shared services
pub struct AppState<S, R>
where
    S: TokenStore,
    R: LedgerRepository,
{
    pub token_service: Arc<TokenService<S>>,
    pub ledger_service: Arc<LedgerService<R>>,
}

impl<S: TokenStore, R: LedgerRepository> AppState<S, R> {
    pub fn new(token_service: Arc<TokenService<S>>, ledger_service: Arc<LedgerService<R>>) -> Self {
        Self {
            token_service,
            ledger_service,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<S, R>(
    app_state: web::Data<AppState<S, R>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    S: TokenStore + 'static,
    R: LedgerRepository + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest()
                .json(ErrorResponse::new(error_codes::BAD_REQUEST, err.to_string()));
            actix_web::error::InternalError::from_response(err, response).into()
        }))
        .wrap(Logger::default())
        .wrap(create_cors())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/accounts")
                        .route("", web::post().to(accounts::register::<S, R>))
                        .route("/{subject}/balance", web::get().to(accounts::balance::<S, R>)),
                )
                .service(
                    web::scope("/tokens")
                        .route("", web::post().to(tokens::issue::<S, R>))
                        .route("/validate", web::post().to(tokens::validate::<S, R>)),
                )
                .service(
                    web::scope("/bonus")
                        .route("/quote", web::post().to(bonus::quote::<S, R>))
                        .route("/settle", web::post().to(bonus::settle::<S, R>))
                        .route("/accrue", web::post().to(bonus::accrue::<S, R>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "bonuspay-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
