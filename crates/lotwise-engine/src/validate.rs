use lotwise_core::{
    AllocationContext, AllocationSummary, BatchLine, ReconciliationPolicy, RequiredField,
    ValidationError, ValidationReport,
};
use rust_decimal::Decimal;

/// Full validity verdict over the current lines. Runs after every mutation
/// for live feedback and again, authoritatively, at commit time.
///
/// Rule order is fixed: quantity reconciliation, then per-line required
/// fields in line order, then cost variance.
pub fn validate(
    context: &AllocationContext,
    lines: &[BatchLine],
    summary: &AllocationSummary,
    policy: &ReconciliationPolicy,
) -> ValidationReport {
    let mut errors = Vec::new();

    if (summary.distributed - context.total_quantity).abs() > policy.quantity_tolerance {
        errors.push(ValidationError::ReconciliationMismatch {
            distributed: summary.distributed,
            required: context.total_quantity,
        });
    }

    for (index, line) in lines.iter().enumerate() {
        let line_no = index + 1;

        if line.batch_number.trim().is_empty() {
            errors.push(ValidationError::MissingRequiredField {
                line: line_no,
                field: RequiredField::BatchNumber,
            });
        }
        if context.requires_expiry && line.expiry_date.is_none() {
            errors.push(ValidationError::MissingRequiredField {
                line: line_no,
                field: RequiredField::ExpiryDate,
            });
        }
        if line.quantity <= Decimal::ZERO {
            errors.push(ValidationError::InvalidQuantity {
                line: line_no,
                quantity: line.quantity,
            });
        }
        if line.unit_cost < Decimal::ZERO {
            errors.push(ValidationError::InvalidCost {
                line: line_no,
                unit_cost: line.unit_cost,
            });
        }
    }

    // Variance only applies with a reference cost and a positive
    // distribution. Strict comparison: exactly at the limit passes.
    if context.reference_unit_cost > Decimal::ZERO {
        if let Some(weighted_average) = summary.weighted_average_cost {
            let deviation = (weighted_average - context.reference_unit_cost).abs();
            if deviation > context.reference_unit_cost * policy.cost_variance_limit {
                errors.push(ValidationError::CostVarianceExceeded {
                    weighted_average,
                    reference: context.reference_unit_cost,
                });
            }
        }
    }

    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn context(
        total_quantity: Decimal,
        reference_unit_cost: Decimal,
        requires_expiry: bool,
    ) -> AllocationContext {
        AllocationContext {
            item_label: "Amoxicillin 500mg".to_string(),
            total_quantity,
            unit_label: "box".to_string(),
            reference_unit_cost,
            requires_expiry,
        }
    }

    fn line(batch_number: &str, quantity: Decimal, unit_cost: Decimal) -> BatchLine {
        BatchLine {
            batch_number: batch_number.to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 6, 30),
            quantity,
            unit_cost,
        }
    }

    fn run(
        context: &AllocationContext,
        lines: &[BatchLine],
        policy: &ReconciliationPolicy,
    ) -> ValidationReport {
        let summary = AllocationSummary::compute(context.total_quantity, lines);
        validate(context, lines, &summary, policy)
    }

    #[test]
    fn fully_distributed_lines_are_valid() {
        let context = context(Decimal::from(100), Decimal::from(10), false);
        let lines = vec![
            line("AMX-2401", Decimal::from(60), Decimal::from(10)),
            line("AMX-2402", Decimal::from(40), Decimal::from(10)),
        ];

        let report = run(&context, &lines, &ReconciliationPolicy::default());

        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn under_distribution_reports_reconciliation_mismatch() {
        let context = context(Decimal::from(100), Decimal::from(10), false);
        let lines = vec![
            line("AMX-2401", Decimal::from(40), Decimal::from(10)),
            line("AMX-2402", Decimal::from(40), Decimal::from(10)),
        ];

        let report = run(&context, &lines, &ReconciliationPolicy::default());

        assert_eq!(
            report.errors,
            vec![ValidationError::ReconciliationMismatch {
                distributed: Decimal::from(80),
                required: Decimal::from(100),
            }]
        );
    }

    #[test]
    fn quantity_tolerance_is_absolute() {
        let context = context(Decimal::from(100), Decimal::ZERO, false);

        // 100.01 distributed: inside the 0.01 absolute tolerance.
        let inside = vec![line("B-1", Decimal::new(10001, 2), Decimal::ZERO)];
        assert!(run(&context, &inside, &ReconciliationPolicy::default()).is_valid());

        // 100.011 distributed: just outside.
        let outside = vec![line("B-1", Decimal::new(100011, 3), Decimal::ZERO)];
        let report = run(&context, &outside, &ReconciliationPolicy::default());
        assert!(matches!(
            report.errors.as_slice(),
            [ValidationError::ReconciliationMismatch { .. }]
        ));
    }

    #[test]
    fn missing_expiry_reports_exactly_one_error_for_that_line() {
        let context = context(Decimal::from(100), Decimal::from(10), true);
        let mut only = line("AMX-2401", Decimal::from(100), Decimal::from(10));
        only.expiry_date = None;

        let report = run(&context, &[only], &ReconciliationPolicy::default());

        assert_eq!(
            report.errors,
            vec![ValidationError::MissingRequiredField {
                line: 1,
                field: RequiredField::ExpiryDate,
            }]
        );
    }

    #[test]
    fn each_offending_line_reports_its_own_errors() {
        let context = context(Decimal::from(100), Decimal::ZERO, false);
        let lines = vec![
            line("", Decimal::from(100), Decimal::from(10)),
            line("B-2", Decimal::ZERO, Decimal::from(-1)),
        ];

        let report = run(&context, &lines, &ReconciliationPolicy::default());

        assert_eq!(
            report.errors,
            vec![
                ValidationError::MissingRequiredField {
                    line: 1,
                    field: RequiredField::BatchNumber,
                },
                ValidationError::InvalidQuantity {
                    line: 2,
                    quantity: Decimal::ZERO,
                },
                ValidationError::InvalidCost {
                    line: 2,
                    unit_cost: Decimal::from(-1),
                },
            ]
        );
    }

    #[test]
    fn cost_variance_at_exactly_the_limit_passes() {
        // Weighted average 10.1 against reference 10 is a deviation of
        // exactly 1%, which the strict comparison lets through.
        let context = context(Decimal::from(100), Decimal::from(10), false);
        let lines = vec![
            line("AMX-2401", Decimal::from(50), Decimal::from(10)),
            line("AMX-2402", Decimal::from(50), Decimal::new(102, 1)),
        ];

        let summary = AllocationSummary::compute(context.total_quantity, &lines);
        assert_eq!(summary.weighted_average_cost, Some(Decimal::new(101, 1)));

        let report = validate(&context, &lines, &summary, &ReconciliationPolicy::default());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn cost_variance_beyond_the_limit_fails() {
        let context = context(Decimal::from(100), Decimal::from(10), false);
        let lines = vec![
            line("AMX-2401", Decimal::from(50), Decimal::from(10)),
            line("AMX-2402", Decimal::from(50), Decimal::new(1021, 2)), // 10.21
        ];

        let report = run(&context, &lines, &ReconciliationPolicy::default());

        assert_eq!(
            report.errors,
            vec![ValidationError::CostVarianceExceeded {
                weighted_average: Decimal::new(10105, 3), // 10.105
                reference: Decimal::from(10),
            }]
        );
    }

    #[test]
    fn zero_reference_cost_skips_the_variance_check() {
        let context = context(Decimal::from(100), Decimal::ZERO, false);
        let lines = vec![line("AMX-2401", Decimal::from(100), Decimal::from(999))];

        let report = run(&context, &lines, &ReconciliationPolicy::default());

        assert!(report.is_valid());
    }

    #[test]
    fn custom_tolerances_are_honored() {
        let context = context(Decimal::from(100), Decimal::from(10), false);
        let lines = vec![
            line("AMX-2401", Decimal::from(50), Decimal::from(10)),
            // 49.6 distributed of the remaining 50, average cost 10.3.
            line("AMX-2402", Decimal::new(496, 1), Decimal::new(103, 1)),
        ];
        let policy = ReconciliationPolicy {
            quantity_tolerance: Decimal::new(5, 1),  // 0.5
            cost_variance_limit: Decimal::new(5, 2), // 5%
        };

        let report = run(&context, &lines, &policy);

        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn validation_is_idempotent() {
        let context = context(Decimal::from(100), Decimal::from(10), true);
        let lines = vec![line("", Decimal::from(80), Decimal::from(12))];
        let summary = AllocationSummary::compute(context.total_quantity, &lines);
        let policy = ReconciliationPolicy::default();

        let first = validate(&context, &lines, &summary, &policy);
        let second = validate(&context, &lines, &summary, &policy);

        assert_eq!(first, second);
        assert!(!first.is_valid());
    }
}
