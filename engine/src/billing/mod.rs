//! Billing operations - forward calculation and inverse search
//!
//! `calculator.rs` owns the validated schedule and the forward pass;
//! `inverse.rs` adds consumption estimation on top of it.

pub mod calculator;
pub mod inverse;

// Re-exports
pub use calculator::{BillCalculator, BillingError, MAX_BILLABLE_UNITS};
