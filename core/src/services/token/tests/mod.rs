//! Tests for payment token services

mod service_tests;
mod signer_tests;
