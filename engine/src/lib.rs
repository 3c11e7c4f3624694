//! Tariff Billing Core - Rust Engine
//!
//! Deterministic progressive-tariff billing for electricity consumption:
//! a forward calculator from meter reading to itemized bill, and a bounded
//! binary search inverting it from a target amount back to consumption.
//!
//! # Architecture
//!
//! - **tariff**: The progressive rate table and its load-time validation
//! - **billing**: Forward calculation and the inverse consumption search
//! - **models**: Itemized result types (BillResult, TierLineItem)
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (smallest currency unit)
//! 2. Rates are scaled integers: per-unit rates in tenths, tax rates in
//!    basis points
//! 3. Every charge is floored to a whole currency unit as it accumulates
//! 4. A schedule is validated once, when the calculator is built; the
//!    per-reading API assumes a well-formed table

// Module declarations
pub mod billing;
pub mod models;
pub mod tariff;

// Re-exports for convenience
pub use billing::{BillCalculator, BillingError, MAX_BILLABLE_UNITS};
pub use models::{BillResult, TierLineItem};
pub use tariff::{RateTier, ScheduleError, TariffSchedule};
