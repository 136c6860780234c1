//! # BonusPay API
//!
//! HTTP surface for the delivery collaborator (token issuance) and the
//! point-of-sale collaborator (token validation, settlement and accrual).

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
