//! Forward billing calculator
//!
//! Turns a consumption reading into an itemized bill by walking the
//! progressive rate table:
//!
//! ```text
//! For a reading q:
//! 1. Applied tier = first tier whose inclusive bound covers q
//!    (its base charge applies to the whole bill)
//! 2. Usage charge = sum over tiers of floor(units-in-tier x marginal rate)
//! 3. Climate and fuel surcharges = floor(q x flat rate) each
//! 4. Subtotal = base + usage + surcharges
//! 5. VAT and fund levy = floor(subtotal x rate), each rounded down to the
//!    schedule's unit independently of the other
//! 6. Total = subtotal + VAT + levy
//! ```
//!
//! Every step floors to whole currency units as it accumulates, so two
//! readings that differ by less than a billable fraction produce identical
//! bills and the whole pipeline stays in i64.
//!
//! # Example
//!
//! ```
//! use tariff_billing_core::{BillCalculator, TariffSchedule};
//!
//! let calculator = BillCalculator::new(TariffSchedule::residential_low_voltage()).unwrap();
//!
//! let bill = calculator.compute_bill(100.0).unwrap();
//! assert_eq!(bill.applied_tier, 1);
//! assert_eq!(bill.subtotal, 14_310);
//! assert_eq!(bill.total, 16_260);
//! ```

use crate::models::bill::{BillResult, TierLineItem};
use crate::tariff::schedule::{ScheduleError, TariffSchedule};
use thiserror::Error;

/// Largest reading `compute_bill` accepts (units)
///
/// Charges scale linearly with the reading; the cap keeps every floored
/// charge and their sums inside i64.
pub const MAX_BILLABLE_UNITS: f64 = 1.0e12;

/// Errors for the per-reading API
///
/// Invalid inputs fail fast instead of being clamped; a reading outside
/// the billable range is a caller bug the engine refuses to paper over.
#[derive(Debug, Error, PartialEq)]
pub enum BillingError {
    #[error(
        "Consumption must be a finite quantity between 0 and {ceiling}, got {value}",
        ceiling = MAX_BILLABLE_UNITS
    )]
    InvalidConsumption { value: f64 },

    #[error("Target amount must be non-negative, got {amount}")]
    InvalidTargetAmount { amount: i64 },
}

/// Progressive-tariff billing calculator
///
/// Owns an immutable, validated schedule. All methods are pure functions of
/// the schedule and their arguments, so a calculator can be shared freely
/// across threads.
#[derive(Debug, Clone)]
pub struct BillCalculator {
    schedule: TariffSchedule,
}

impl BillCalculator {
    /// Build a calculator from a schedule
    ///
    /// Validates the table once up front: structural checks first, then a
    /// probe that the total bill never decreases across any tier bound.
    /// A schedule whose base-charge step outruns its marginal rates would
    /// break the ordering the inverse search relies on, so it is rejected
    /// here rather than detected mid-search.
    ///
    /// # Arguments
    ///
    /// * `schedule` - The rate table to bill against
    ///
    /// # Returns
    ///
    /// * `Ok(BillCalculator)` - Schedule validated and ready
    /// * `Err(ScheduleError)` - The table is malformed or non-monotonic
    pub fn new(schedule: TariffSchedule) -> Result<Self, ScheduleError> {
        schedule.validate()?;
        let calculator = Self { schedule };
        calculator.probe_boundary_monotonicity()?;
        Ok(calculator)
    }

    /// The validated schedule this calculator bills against
    pub fn schedule(&self) -> &TariffSchedule {
        &self.schedule
    }

    /// Compute the itemized bill for a consumption reading
    ///
    /// # Arguments
    ///
    /// * `consumption` - Units consumed; fractional readings are accepted,
    ///   up to [`MAX_BILLABLE_UNITS`]
    ///
    /// # Returns
    ///
    /// * `Ok(BillResult)` - The itemized bill
    /// * `Err(BillingError::InvalidConsumption)` - Negative, NaN, infinite
    ///   or above [`MAX_BILLABLE_UNITS`]
    ///
    /// # Example
    ///
    /// ```
    /// use tariff_billing_core::{BillCalculator, TariffSchedule};
    ///
    /// let calculator = BillCalculator::new(TariffSchedule::residential_low_voltage()).unwrap();
    ///
    /// // 350 units reach the second tier: its base charge applies once,
    /// // while usage is priced marginally per tier.
    /// let bill = calculator.compute_bill(350.0).unwrap();
    /// assert_eq!(bill.applied_tier, 2);
    /// assert_eq!(bill.base_charge, 1_600);
    /// assert_eq!(bill.line_items.len(), 2);
    /// assert_eq!(bill.total, 71_260);
    /// ```
    pub fn compute_bill(&self, consumption: f64) -> Result<BillResult, BillingError> {
        if !consumption.is_finite() || consumption < 0.0 || consumption > MAX_BILLABLE_UNITS {
            return Err(BillingError::InvalidConsumption { value: consumption });
        }
        Ok(self.bill_for(consumption))
    }

    /// Forward pass over a pre-validated reading
    ///
    /// Shared by `compute_bill`, the inverse search and the load-time
    /// monotonicity probe. Input must be finite, non-negative and within
    /// the billing ceiling.
    pub(crate) fn bill_for(&self, consumption: f64) -> BillResult {
        let applied_tier = self.applied_tier(consumption);
        let base_charge = self.schedule.tiers[applied_tier - 1].base_charge;

        let mut line_items = Vec::new();
        let mut usage_charge: i64 = 0;
        let mut remaining = consumption;
        let mut previous_bound: f64 = 0.0;
        for (index, tier) in self.schedule.tiers.iter().enumerate() {
            if remaining <= 0.0 {
                break;
            }
            let span = match tier.upper_bound {
                Some(bound) => f64::from(bound) - previous_bound,
                None => remaining,
            };
            let quantity = remaining.min(span);
            let charge = unit_charge(quantity, tier.unit_rate_tenths);
            usage_charge += charge;
            line_items.push(TierLineItem {
                tier: index + 1,
                quantity,
                unit_rate_tenths: tier.unit_rate_tenths,
                charge,
            });
            remaining -= quantity;
            if let Some(bound) = tier.upper_bound {
                previous_bound = f64::from(bound);
            }
        }

        let climate_surcharge = unit_charge(consumption, self.schedule.climate_rate_tenths);
        let fuel_surcharge = unit_charge(consumption, self.schedule.fuel_rate_tenths);
        let subtotal = base_charge + usage_charge + climate_surcharge + fuel_surcharge;
        let vat = rounded_levy(subtotal, self.schedule.vat_bps, self.schedule.tax_rounding_unit);
        let fund_levy = rounded_levy(
            subtotal,
            self.schedule.fund_levy_bps,
            self.schedule.tax_rounding_unit,
        );

        BillResult {
            consumption,
            base_charge,
            usage_charge,
            climate_surcharge,
            fuel_surcharge,
            subtotal,
            vat,
            fund_levy,
            total: subtotal + vat + fund_levy,
            applied_tier,
            line_items,
        }
    }

    /// 1-based ordinal of the tier whose inclusive bound covers `consumption`
    fn applied_tier(&self, consumption: f64) -> usize {
        let last = self.schedule.tiers.len();
        for (index, tier) in self.schedule.tiers.iter().enumerate() {
            if let Some(bound) = tier.upper_bound {
                if consumption <= f64::from(bound) {
                    return index + 1;
                }
            }
        }
        // Validated schedules end in an open tier, which takes the rest
        last
    }

    /// Check the total bill is non-decreasing across every finite tier bound
    ///
    /// The inverse search bisects on totals at integer readings, so the
    /// step from each bound to the next unit above it must not go down.
    fn probe_boundary_monotonicity(&self) -> Result<(), ScheduleError> {
        for tier in &self.schedule.tiers {
            if let Some(bound) = tier.upper_bound {
                let at_bound = self.bill_for(f64::from(bound)).total;
                let above_bound = self.bill_for(f64::from(bound) + 1.0).total;
                if above_bound < at_bound {
                    return Err(ScheduleError::NonMonotonicBoundary {
                        bound,
                        at_bound,
                        above_bound,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Charge for `quantity` units priced in tenths, floored to whole units
fn unit_charge(quantity: f64, rate_tenths: i64) -> i64 {
    ((quantity * rate_tenths as f64) / 10.0).floor() as i64
}

/// Proportional charge on `subtotal` at `rate_bps`, rounded down to `rounding_unit`
///
/// The i128 widening keeps the bps product exact for any subtotal an i64
/// can hold; `subtotal` is non-negative here, so truncating division is a
/// floor.
fn rounded_levy(subtotal: i64, rate_bps: i64, rounding_unit: i64) -> i64 {
    let raw = ((subtotal as i128 * rate_bps as i128) / 10_000) as i64;
    (raw / rounding_unit) * rounding_unit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> BillCalculator {
        BillCalculator::new(TariffSchedule::residential_low_voltage()).unwrap()
    }

    #[test]
    fn test_unit_charge_floors_fractional_amounts() {
        // 1 unit at 214.6 -> 214, never 215
        assert_eq!(unit_charge(1.0, 2146), 214);
        assert_eq!(unit_charge(200.0, 1200), 24_000);
        assert_eq!(unit_charge(0.0, 3073), 0);
    }

    #[test]
    fn test_rounded_levy_drops_to_the_nearest_unit() {
        // 3.7% of 27,710 = 1,025.27 -> 1,025 -> 1,020
        assert_eq!(rounded_levy(27_710, 370, 10), 1_020);
        // 10% of 14,310 = 1,431 -> 1,430
        assert_eq!(rounded_levy(14_310, 1000, 10), 1_430);
        assert_eq!(rounded_levy(0, 1000, 10), 0);
    }

    #[test]
    fn test_vat_and_levy_round_independently() {
        // Rounding the flat sum of both raw values would give a different
        // figure than rounding each on its own.
        let subtotal = 21_076;
        let vat = rounded_levy(subtotal, 1000, 10);
        let levy = rounded_levy(subtotal, 370, 10);
        assert_eq!(vat, 2_100);
        assert_eq!(levy, 770);
        let joint = rounded_levy(subtotal, 1370, 10);
        assert_eq!(joint, 2_880);
        assert_ne!(vat + levy, joint);
    }

    #[test]
    fn test_applied_tier_bound_is_inclusive() {
        let calc = calculator();
        assert_eq!(calc.bill_for(200.0).applied_tier, 1);
        assert_eq!(calc.bill_for(200.5).applied_tier, 2);
        assert_eq!(calc.bill_for(400.0).applied_tier, 2);
        assert_eq!(calc.bill_for(400.5).applied_tier, 3);
        assert_eq!(calc.bill_for(0.0).applied_tier, 1);
    }

    #[test]
    fn test_zero_consumption_touches_no_tier() {
        let bill = calculator().compute_bill(0.0).unwrap();
        assert!(bill.line_items.is_empty());
        assert_eq!(bill.usage_charge, 0);
        assert_eq!(bill.base_charge, 910);
        assert_eq!(bill.total, 1_030);
    }

    #[test]
    fn test_rejects_negative_consumption() {
        assert_eq!(
            calculator().compute_bill(-1.0).unwrap_err(),
            BillingError::InvalidConsumption { value: -1.0 }
        );
    }

    #[test]
    fn test_rejects_non_finite_consumption() {
        let calc = calculator();
        assert!(matches!(
            calc.compute_bill(f64::NAN),
            Err(BillingError::InvalidConsumption { .. })
        ));
        assert!(matches!(
            calc.compute_bill(f64::INFINITY),
            Err(BillingError::InvalidConsumption { .. })
        ));
    }

    #[test]
    fn test_rejects_readings_beyond_the_billing_ceiling() {
        // A reading past the cap would push the tier products outside i64
        let calc = calculator();
        assert!(calc.compute_bill(MAX_BILLABLE_UNITS).is_ok());
        assert!(matches!(
            calc.compute_bill(MAX_BILLABLE_UNITS + 1.0),
            Err(BillingError::InvalidConsumption { .. })
        ));
        assert!(matches!(
            calc.compute_bill(1.0e17),
            Err(BillingError::InvalidConsumption { .. })
        ));
    }

    #[test]
    fn test_rejects_schedule_with_decreasing_boundary_total() {
        // A base-charge drop at the second bound large enough that the
        // total falls from 400 to 401 units.
        let mut schedule = TariffSchedule::residential_low_voltage();
        schedule.tiers[2].base_charge = 0;
        schedule.tiers[2].unit_rate_tenths = 0;
        let err = BillCalculator::new(schedule).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::NonMonotonicBoundary { bound: 400, .. }
        ));
    }
}
