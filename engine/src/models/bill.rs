//! Bill result model
//!
//! The itemized outcome of one billing calculation:
//! - Fixed base charge for the applied tier
//! - Usage charge assembled from per-tier line items
//! - Flat per-unit surcharges (climate, fuel)
//! - Proportional taxes (VAT, industry fund levy)
//!
//! Results are plain values: built fresh per calculation, never mutated,
//! equal when their fields are equal.
//!
//! CRITICAL: All money values are i64 (smallest currency unit)

use serde::{Deserialize, Serialize};

/// One tier's portion of the usage charge
///
/// Emitted only for tiers the consumption actually reaches. A bill for
/// consumption inside the first tier carries a single line item; zero
/// consumption carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLineItem {
    /// 1-based tier ordinal
    pub tier: usize,

    /// Units billed in this tier
    pub quantity: f64,

    /// Marginal price applied, in tenths of a currency unit per unit
    pub unit_rate_tenths: i64,

    /// Charge for this portion, floored to a whole currency unit
    pub charge: i64,
}

/// Complete itemized bill for one consumption reading
///
/// Field identities, guaranteed by construction:
/// - `subtotal = base_charge + usage_charge + climate_surcharge + fuel_surcharge`
/// - `total = subtotal + vat + fund_levy`
/// - `usage_charge` equals the sum of `line_items` charges
/// - line-item quantities sum to `consumption`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillResult {
    /// Consumption the bill was computed for (units)
    pub consumption: f64,

    /// Fixed charge of the applied tier
    pub base_charge: i64,

    /// Marginal usage charge across all touched tiers
    pub usage_charge: i64,

    /// Climate surcharge, flat per unit
    pub climate_surcharge: i64,

    /// Fuel-cost adjustment, flat per unit
    pub fuel_surcharge: i64,

    /// Sum of base, usage and surcharges, before taxes
    pub subtotal: i64,

    /// Value-added tax on the subtotal, rounded down to the schedule's unit
    pub vat: i64,

    /// Industry fund levy on the subtotal, rounded down independently of VAT
    pub fund_levy: i64,

    /// Amount payable
    pub total: i64,

    /// 1-based ordinal of the tier whose base charge applies
    pub applied_tier: usize,

    /// Per-tier breakdown of the usage charge
    pub line_items: Vec<TierLineItem>,
}

impl BillResult {
    /// VAT and fund levy combined
    pub fn taxes(&self) -> i64 {
        self.vat + self.fund_levy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BillResult {
        BillResult {
            consumption: 100.0,
            base_charge: 910,
            usage_charge: 12_000,
            climate_surcharge: 900,
            fuel_surcharge: 500,
            subtotal: 14_310,
            vat: 1_430,
            fund_levy: 520,
            total: 16_260,
            applied_tier: 1,
            line_items: vec![TierLineItem {
                tier: 1,
                quantity: 100.0,
                unit_rate_tenths: 1200,
                charge: 12_000,
            }],
        }
    }

    #[test]
    fn test_taxes_combines_vat_and_levy() {
        assert_eq!(sample().taxes(), 1_950);
    }

    #[test]
    fn test_equality_is_field_wise() {
        assert_eq!(sample(), sample());

        let mut other = sample();
        other.total += 10;
        assert_ne!(sample(), other);
    }

    #[test]
    fn test_serde_round_trip() {
        let bill = sample();
        let json = serde_json::to_string(&bill).unwrap();
        let restored: BillResult = serde_json::from_str(&json).unwrap();
        assert_eq!(bill, restored);
    }
}
