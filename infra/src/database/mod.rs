//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Schema bootstrap for the ledger tables
//! - The transactional ledger repository

pub mod connection;
pub mod mysql;
pub mod schema;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlLedgerRepository;
