//! Tariff configuration - the progressive rate table
//!
//! See `schedule.rs` for the table model and its validation rules.

pub mod schedule;

// Re-exports
pub use schedule::{RateTier, ScheduleError, TariffSchedule};
