//! Domain models for the billing engine

pub mod bill;

// Re-exports
pub use bill::{BillResult, TierLineItem};
