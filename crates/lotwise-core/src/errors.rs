use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-line fields that must be present before an allocation can commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredField {
    BatchNumber,
    ExpiryDate,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredField::BatchNumber => write!(f, "batch number"),
            RequiredField::ExpiryDate => write!(f, "expiry date"),
        }
    }
}

/// One violated validation rule. The `line` fields carry the 1-based line
/// number shown to the user.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("distributed quantity {distributed} does not reconcile to the required total {required}")]
    ReconciliationMismatch {
        distributed: Decimal,
        required: Decimal,
    },
    #[error("line {line}: {field} is required")]
    MissingRequiredField { line: usize, field: RequiredField },
    #[error("line {line}: quantity must be greater than zero (got {quantity})")]
    InvalidQuantity { line: usize, quantity: Decimal },
    #[error("line {line}: unit cost must not be negative (got {unit_cost})")]
    InvalidCost { line: usize, unit_cost: Decimal },
    #[error("weighted average cost {weighted_average} deviates from reference cost {reference} beyond the allowed variance")]
    CostVarianceExceeded {
        weighted_average: Decimal,
        reference: Decimal,
    },
}

/// Rejected line operations. These leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("the last remaining line cannot be removed")]
    CannotRemoveLastLine,
    #[error("line index {index} is out of range for {len} line(s)")]
    LineOutOfRange { index: usize, len: usize },
}

/// Verdict of one validation run: valid iff no rule fired. Errors keep the
/// order they were produced in so the UI can list them stably.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}
