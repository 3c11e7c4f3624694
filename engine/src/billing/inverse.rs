//! Inverse consumption search
//!
//! Answers "how many units can this amount buy": given a target bill total,
//! find the largest whole-unit consumption whose forward-calculated bill
//! still fits inside it.
//!
//! The forward total is non-decreasing in consumption for a validated
//! schedule (marginal rates are non-negative and every tier bound passed the
//! load-time probe), so the search bisects the integer readings in
//! `[0, max_search_quantity]` with the forward calculator as its oracle:
//! a reading within budget becomes the new best candidate and the search
//! moves up; one over budget moves it down. The interval emptying ends the
//! walk; a fixed iteration ceiling backstops it regardless of range size.

use crate::billing::calculator::{BillCalculator, BillingError};
use crate::models::bill::BillResult;

/// Hard ceiling on bisection steps
///
/// 13 probes resolve the shipped 5,000-unit range; the ceiling only matters
/// if a schedule ever carries a vastly larger search space.
const MAX_SEARCH_ITERATIONS: usize = 50;

impl BillCalculator {
    /// Estimate the consumption a target amount pays for
    ///
    /// Finds the largest whole-unit reading whose total does not exceed
    /// `target_amount` and returns its full itemized bill. A target below
    /// the minimum possible bill yields the zero-consumption bill; a target
    /// above the bill at the search ceiling yields the bill at the ceiling.
    ///
    /// # Arguments
    ///
    /// * `target_amount` - Budget in currency units
    ///
    /// # Returns
    ///
    /// * `Ok(BillResult)` - Bill of the best-fitting consumption
    /// * `Err(BillingError::InvalidTargetAmount)` - Negative target
    ///
    /// # Example
    ///
    /// ```
    /// use tariff_billing_core::{BillCalculator, TariffSchedule};
    ///
    /// let calculator = BillCalculator::new(TariffSchedule::residential_low_voltage()).unwrap();
    ///
    /// // 16,260 buys exactly 100 units; one more unit would overshoot.
    /// let bill = calculator.estimate_consumption(16_260).unwrap();
    /// assert_eq!(bill.consumption, 100.0);
    /// assert_eq!(bill.total, 16_260);
    /// ```
    pub fn estimate_consumption(&self, target_amount: i64) -> Result<BillResult, BillingError> {
        if target_amount < 0 {
            return Err(BillingError::InvalidTargetAmount {
                amount: target_amount,
            });
        }

        // Closed interval over whole-unit readings. i64 keeps the
        // empty-interval step below zero well-defined.
        let mut low: i64 = 0;
        let mut high: i64 = i64::from(self.schedule().max_search_quantity);
        let mut best: Option<i64> = None;

        for _ in 0..MAX_SEARCH_ITERATIONS {
            if low > high {
                break;
            }
            let mid = low + (high - low) / 2;
            if self.bill_for(mid as f64).total <= target_amount {
                best = Some(mid);
                low = mid + 1;
            } else {
                high = mid - 1;
            }
        }

        // Nothing fits: the floor answer is the zero-consumption bill
        let quantity = best.unwrap_or(0);
        Ok(self.bill_for(quantity as f64))
    }
}
