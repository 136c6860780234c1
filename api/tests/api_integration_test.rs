// Integration tests for the HTTP surface

use actix_web::{http::StatusCode, test, web};
use serde_json::{json, Value};
use std::sync::Arc;

use bp_api::{create_app, AppState};
use bp_core::repositories::{InMemoryLedgerRepository, InMemoryTokenStore};
use bp_core::services::ledger::{LedgerService, LedgerServiceConfig};
use bp_core::services::token::{TokenService, TokenServiceConfig};

type TestState = web::Data<AppState<InMemoryTokenStore, InMemoryLedgerRepository>>;

fn state_with_balance(initial_balance: u64) -> TestState {
    let token_service = TokenService::new(
        Arc::new(InMemoryTokenStore::new()),
        TokenServiceConfig::default(),
    )
    .unwrap();
    let ledger_service = LedgerService::new(
        Arc::new(InMemoryLedgerRepository::new()),
        LedgerServiceConfig {
            initial_balance,
            ..Default::default()
        },
    );
    web::Data::new(AppState::new(Arc::new(token_service), Arc::new(ledger_service)))
}

macro_rules! post {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post().uri($uri).set_json($body).to_request();
        let resp = test::call_service(&$app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        (status, body)
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;

    let req = test::TestRequest::get().uri("/api/v1/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_register_account() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;

    let (status, body) = post!(app, "/api/v1/accounts", json!({"subject": 77, "phone": "+79161234567"}));
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["balance"], 1000);

    let (status, body) = post!(app, "/api/v1/accounts", json!({"subject": 77, "phone": "89161234567"}));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "ALREADY_REGISTERED");

    let (status, body) = post!(app, "/api/v1/accounts", json!({"subject": 78, "phone": "+19161234567"}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MALFORMED_INPUT");

    let req = test::TestRequest::get().uri("/api/v1/accounts/77/balance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["balance"], 1000);

    let req = test::TestRequest::get().uri("/api/v1/accounts/78/balance").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_issue_requires_registered_subject() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;

    let (status, body) = post!(app, "/api/v1/tokens", json!({"subject": 5}));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "SUBJECT_NOT_FOUND");
}

#[actix_web::test]
async fn test_issue_and_validate_token() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 5, "phone": "+79161234567"}));

    let (status, issued) = post!(app, "/api/v1/tokens", json!({"subject": 5, "cap": 300}));
    assert_eq!(status, StatusCode::CREATED);
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, body) = post!(app, "/api/v1/tokens/validate", json!({"token": token}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], 5);
    assert_eq!(body["cap"], 300);

    let (status, body) = post!(app, "/api/v1/tokens/validate", json!({"token": "garbage"}));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_MALFORMED");
}

#[actix_web::test]
async fn test_zero_cap_is_rejected() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 5, "phone": "+79161234567"}));

    let (status, _) = post!(app, "/api/v1/tokens", json!({"subject": 5, "cap": 0}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_settle_then_insufficient_bonus() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 9, "phone": "89161234567"}));
    let (_, issued) = post!(app, "/api/v1/tokens", json!({"subject": 9}));
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, quote) = post!(app, "/api/v1/bonus/quote", json!({"token": token, "purchase_amount": 2500}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["bonus_applicable"], 1000);
    assert_eq!(quote["balance"], 1000);

    let (status, body) = post!(app, "/api/v1/bonus/settle", json!({"token": token, "purchase_amount": 2500}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bonus_applied"], 1000);
    assert_eq!(body["remainder_due"], 1500);
    assert_eq!(body["new_balance"], 0);

    // Tokens stay valid for their whole lifetime
    let (status, body) = post!(app, "/api/v1/bonus/settle", json!({"token": token, "purchase_amount": 200}));
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "INSUFFICIENT_BONUS");
    assert_eq!(body["details"]["min_qualifying_purchase"], 1);
}

#[actix_web::test]
async fn test_settle_respects_token_cap() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 9, "phone": "89161234567"}));
    let (_, issued) = post!(app, "/api/v1/tokens", json!({"subject": 9, "cap": 300}));
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, body) = post!(app, "/api/v1/bonus/settle", json!({"token": token, "purchase_amount": 2500}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bonus_applied"], 300);
    assert_eq!(body["remainder_due"], 2200);
    assert_eq!(body["new_balance"], 700);
}

#[actix_web::test]
async fn test_accrue_at_configured_rate() {
    let app = test::init_service(create_app(state_with_balance(0))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 3, "phone": "+79161234567"}));
    let (_, issued) = post!(app, "/api/v1/tokens", json!({"subject": 3}));
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, body) = post!(app, "/api/v1/bonus/accrue", json!({"token": token, "purchase_amount": 1000}));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bonus_added"], 120);
    assert_eq!(body["new_balance"], 120);
}

#[actix_web::test]
async fn test_bonus_endpoints_reject_bad_input() {
    let app = test::init_service(create_app(state_with_balance(1000))).await;
    post!(app, "/api/v1/accounts", json!({"subject": 3, "phone": "+79161234567"}));
    let (_, issued) = post!(app, "/api/v1/tokens", json!({"subject": 3}));
    let token = issued["token"].as_str().unwrap().to_string();

    let (status, _) = post!(app, "/api/v1/bonus/settle", json!({"token": token, "purchase_amount": 0}));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post!(app, "/api/v1/bonus/settle", json!({"token": "AAAA.BBBB", "purchase_amount": 10}));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "TOKEN_SIGNATURE_MISMATCH");

    let (status, _) = post!(app, "/api/v1/bonus/settle", json!({"purchase_amount": 10}));
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
