use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tolerances applied by reconciliation. Both thresholds are configurable
/// per host; the defaults match the long-standing purchasing rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPolicy {
    /// Absolute tolerance on `|distributed - total_quantity|`, absorbing
    /// entry rounding. Not a percentage.
    pub quantity_tolerance: Decimal,
    /// Maximum relative deviation of the weighted average cost from the
    /// reference unit cost. Exceeding it blocks the commit.
    pub cost_variance_limit: Decimal,
}

impl Default for ReconciliationPolicy {
    fn default() -> Self {
        Self {
            quantity_tolerance: Decimal::new(1, 2),  // 0.01
            cost_variance_limit: Decimal::new(1, 2), // 1.00%
        }
    }
}
