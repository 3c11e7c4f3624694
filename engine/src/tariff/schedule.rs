//! Tariff schedule model
//!
//! The progressive rate table every calculation reads from:
//! - Ordered tiers, each with an inclusive upper bound, a fixed base charge
//!   and a marginal unit rate
//! - Flat per-unit surcharges (climate, fuel)
//! - Proportional tax rates (VAT, industry fund levy) and their rounding unit
//! - The consumption ceiling for inverse estimation
//!
//! Rates are stored as scaled integers: per-unit rates in tenths of a
//! currency unit (214.6/unit -> 2146), proportional rates in basis points
//! (3.7% -> 370). Each charge is floored to i64 at the one float product
//! where a rate meets the f64 reading; accumulation past that point is
//! integer arithmetic.
//!
//! A schedule is validated once, when a calculator is built from it. All
//! violations are load-time configuration errors; the per-reading API never
//! re-checks the table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a tariff schedule
#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Schedule must define at least one tier")]
    EmptySchedule,

    #[error("Tier {tier} has no upper bound but is not the final tier")]
    UnboundedInnerTier { tier: usize },

    #[error("Final tier must be open-ended (no upper bound)")]
    BoundedFinalTier,

    #[error("Tier {tier} bound {bound} does not exceed the previous bound {previous}")]
    NonAscendingBounds { tier: usize, bound: u32, previous: u32 },

    #[error("Tier {tier} has negative base charge {charge}")]
    NegativeBaseCharge { tier: usize, charge: i64 },

    #[error("Tier {tier} has negative unit rate {rate_tenths} (tenths)")]
    NegativeUnitRate { tier: usize, rate_tenths: i64 },

    #[error("Surcharge rates must be non-negative: climate {climate_rate_tenths}, fuel {fuel_rate_tenths} (tenths)")]
    NegativeSurchargeRate {
        climate_rate_tenths: i64,
        fuel_rate_tenths: i64,
    },

    #[error("Tax rates must be non-negative: VAT {vat_bps} bps, fund levy {fund_levy_bps} bps")]
    NegativeTaxRate { vat_bps: i64, fund_levy_bps: i64 },

    #[error("Tax rounding unit must be positive, got {unit}")]
    InvalidRoundingUnit { unit: i64 },

    #[error("Maximum search quantity must be positive")]
    InvalidSearchRange,

    #[error("Total bill decreases across tier bound {bound}: {at_bound} at the bound, {above_bound} one unit above")]
    NonMonotonicBoundary {
        bound: u32,
        at_bound: i64,
        above_bound: i64,
    },

    #[error("Schedule serialization failed: {0}")]
    Serialization(String),
}

/// A single progressive tier
///
/// The base charge is a step function: the tier the whole consumption falls
/// into supplies the bill's single base charge. The unit rate is marginal:
/// it prices only the units inside this tier's span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    /// Inclusive upper bound in units; `None` marks the open-ended final tier
    pub upper_bound: Option<u32>,

    /// Fixed charge when the whole bill lands in this tier (currency units)
    pub base_charge: i64,

    /// Marginal price per unit, in tenths of a currency unit
    pub unit_rate_tenths: i64,
}

/// Complete progressive tariff configuration
///
/// Owned by the calculator after validation and never mutated. Serializable
/// so alternative schedules can be injected from JSON instead of code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffSchedule {
    /// Progressive tiers, ordered by ascending upper bound
    pub tiers: Vec<RateTier>,

    /// Climate surcharge per unit, tenths of a currency unit
    pub climate_rate_tenths: i64,

    /// Fuel-cost adjustment per unit, tenths of a currency unit
    pub fuel_rate_tenths: i64,

    /// Value-added tax on the subtotal, basis points
    pub vat_bps: i64,

    /// Industry fund levy on the subtotal, basis points
    pub fund_levy_bps: i64,

    /// Taxes round down to a multiple of this (currency units)
    pub tax_rounding_unit: i64,

    /// Upper bound of the consumption space for inverse estimation (units)
    pub max_search_quantity: u32,
}

impl Default for TariffSchedule {
    fn default() -> Self {
        Self::residential_low_voltage()
    }
}

impl TariffSchedule {
    /// The residential low-voltage schedule shipped with the engine
    ///
    /// # Example
    ///
    /// ```
    /// use tariff_billing_core::TariffSchedule;
    ///
    /// let schedule = TariffSchedule::residential_low_voltage();
    /// assert_eq!(schedule.tier_count(), 3);
    /// assert!(schedule.validate().is_ok());
    /// ```
    pub fn residential_low_voltage() -> Self {
        Self {
            tiers: vec![
                RateTier {
                    upper_bound: Some(200),
                    base_charge: 910,
                    unit_rate_tenths: 1200, // 120.0/unit
                },
                RateTier {
                    upper_bound: Some(400),
                    base_charge: 1600,
                    unit_rate_tenths: 2146, // 214.6/unit
                },
                RateTier {
                    upper_bound: None,
                    base_charge: 7300,
                    unit_rate_tenths: 3073, // 307.3/unit
                },
            ],
            climate_rate_tenths: 90, // 9.0/unit
            fuel_rate_tenths: 50,    // 5.0/unit
            vat_bps: 1000,           // 10%
            fund_levy_bps: 370,      // 3.7%
            tax_rounding_unit: 10,
            max_search_quantity: 5000,
        }
    }

    /// Number of tiers in the table
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Validate the structural invariants of the table
    ///
    /// Checks tier ordering and bounds, sign constraints on every rate and
    /// charge, the rounding unit and the search range. Monotonicity across
    /// tier bounds needs the forward calculation and is probed when a
    /// calculator is built.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.tiers.is_empty() {
            return Err(ScheduleError::EmptySchedule);
        }

        let last = self.tiers.len() - 1;
        let mut previous: u32 = 0; // lower edge of the table
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.base_charge < 0 {
                return Err(ScheduleError::NegativeBaseCharge {
                    tier: index + 1,
                    charge: tier.base_charge,
                });
            }
            if tier.unit_rate_tenths < 0 {
                return Err(ScheduleError::NegativeUnitRate {
                    tier: index + 1,
                    rate_tenths: tier.unit_rate_tenths,
                });
            }
            match tier.upper_bound {
                Some(bound) => {
                    if index == last {
                        return Err(ScheduleError::BoundedFinalTier);
                    }
                    if bound <= previous {
                        return Err(ScheduleError::NonAscendingBounds {
                            tier: index + 1,
                            bound,
                            previous,
                        });
                    }
                    previous = bound;
                }
                None => {
                    if index != last {
                        return Err(ScheduleError::UnboundedInnerTier { tier: index + 1 });
                    }
                }
            }
        }

        if self.climate_rate_tenths < 0 || self.fuel_rate_tenths < 0 {
            return Err(ScheduleError::NegativeSurchargeRate {
                climate_rate_tenths: self.climate_rate_tenths,
                fuel_rate_tenths: self.fuel_rate_tenths,
            });
        }

        if self.vat_bps < 0 || self.fund_levy_bps < 0 {
            return Err(ScheduleError::NegativeTaxRate {
                vat_bps: self.vat_bps,
                fund_levy_bps: self.fund_levy_bps,
            });
        }

        if self.tax_rounding_unit <= 0 {
            return Err(ScheduleError::InvalidRoundingUnit {
                unit: self.tax_rounding_unit,
            });
        }

        if self.max_search_quantity == 0 {
            return Err(ScheduleError::InvalidSearchRange);
        }

        Ok(())
    }

    /// Parse a schedule from JSON and validate it
    ///
    /// The injection path for alternative rate tables: a file holding the
    /// serialized form of this struct is accepted wherever the built-in
    /// schedule would be.
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        let schedule: Self =
            serde_json::from_str(json).map_err(|e| ScheduleError::Serialization(e.to_string()))?;
        schedule.validate()?;
        Ok(schedule)
    }

    /// Serialize the schedule to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ScheduleError> {
        serde_json::to_string_pretty(self).map_err(|e| ScheduleError::Serialization(e.to_string()))
    }
}
