use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed parameters of one allocation session. Immutable once the session
/// is open; only the batch lines change after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationContext {
    pub item_label: String,
    pub total_quantity: Decimal,
    pub unit_label: String,
    /// Expected average cost of the allocation. Zero disables the
    /// cost-variance check.
    pub reference_unit_cost: Decimal,
    pub requires_expiry: bool,
}

/// One physical lot within an allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchLine {
    pub batch_number: String,
    pub expiry_date: Option<NaiveDate>,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
}

impl BatchLine {
    /// A freshly added line: quantity and cost pre-filled, identifying
    /// details left for the user.
    pub fn seeded(quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            batch_number: String::new(),
            expiry_date: None,
            quantity,
            unit_cost,
        }
    }
}

/// Derived totals over the current lines. Always produced by a full re-sum,
/// never updated incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub distributed: Decimal,
    pub balance: Decimal,
    /// `None` while nothing is distributed.
    pub weighted_average_cost: Option<Decimal>,
}

impl AllocationSummary {
    pub fn compute(total_quantity: Decimal, lines: &[BatchLine]) -> Self {
        let mut distributed = Decimal::ZERO;
        let mut value = Decimal::ZERO;

        for line in lines {
            distributed += line.quantity;
            value += line.quantity * line.unit_cost;
        }

        let weighted_average_cost = if distributed > Decimal::ZERO {
            Some(value / distributed)
        } else {
            None
        };

        Self {
            distributed,
            balance: total_quantity - distributed,
            weighted_average_cost,
        }
    }
}
