use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::BatchLine;

/// Open-session input supplied by the surrounding document (a purchase or
/// sales line item). `lines` is non-empty when re-opening a previous
/// allocation for editing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub item_label: String,
    pub total_quantity: Decimal,
    pub unit_label: String,
    pub reference_unit_cost: Decimal,
    #[serde(default)]
    pub requires_expiry: bool,
    #[serde(default)]
    pub lines: Vec<BatchLine>,
}

/// Result handed to the caller on a successful commit. Carries only the
/// public line fields; session bookkeeping never leaves the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedAllocation {
    /// Index of the originating line item in the parent document.
    pub item_index: usize,
    pub lines: Vec<BatchLine>,
}
