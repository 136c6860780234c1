//! Value objects representing immutable domain concepts.

pub mod receipts;

// Re-export commonly used types
pub use receipts::{AccrualReceipt, Settlement, SettlementQuote};
