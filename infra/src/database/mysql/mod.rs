//! MySQL repository implementations

pub mod ledger_repository_impl;

pub use ledger_repository_impl::MySqlLedgerRepository;
