use chrono::NaiveDate;
use lotwise_core::{
    AllocationContext, AllocationRequest, AllocationSummary, BatchLine, CommittedAllocation,
    OperationError, ReconciliationPolicy, ValidationReport,
};
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::validate::validate;

/// A single field write against one batch line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineEdit {
    BatchNumber(String),
    ExpiryDate(Option<NaiveDate>),
    Quantity(Decimal),
    UnitCost(Decimal),
}

impl LineEdit {
    /// Quantity edit from raw user input. Missing or unparseable input
    /// coerces to zero; validation reports it instead of the write failing.
    pub fn quantity_input(raw: &str) -> Self {
        Self::Quantity(parse_decimal_or_zero(raw))
    }

    /// Unit-cost edit from raw user input, with the same coercion rule.
    pub fn unit_cost_input(raw: &str) -> Self {
        Self::UnitCost(parse_decimal_or_zero(raw))
    }
}

fn parse_decimal_or_zero(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or(Decimal::ZERO)
}

/// One open "distribute this quantity across batches" interaction.
///
/// The session owns its state exclusively and every operation is a plain
/// synchronous call; the summary is recomputed by a full re-sum after each
/// mutation. Dropping the session is the cancel path.
#[derive(Debug, Clone)]
pub struct AllocationSession {
    session_id: Uuid,
    item_index: usize,
    context: AllocationContext,
    policy: ReconciliationPolicy,
    lines: Vec<BatchLine>,
    summary: AllocationSummary,
}

/// Result of the commit gate. A rejected commit hands the session back so
/// the user can keep editing; a successful one consumes it.
#[derive(Debug)]
pub enum CommitOutcome {
    Committed(CommittedAllocation),
    Rejected {
        session: AllocationSession,
        report: ValidationReport,
    },
}

impl AllocationSession {
    /// Opens a session for the line item at `item_index` in the parent
    /// document. Without prior lines the allocation is seeded with a single
    /// line covering the full total at the reference cost; prior lines are
    /// taken verbatim so a previous distribution can be re-edited.
    pub fn open(
        request: AllocationRequest,
        item_index: usize,
        policy: ReconciliationPolicy,
    ) -> Self {
        let context = AllocationContext {
            item_label: request.item_label,
            total_quantity: request.total_quantity,
            unit_label: request.unit_label,
            reference_unit_cost: request.reference_unit_cost,
            requires_expiry: request.requires_expiry,
        };

        let lines = if request.lines.is_empty() {
            vec![BatchLine::seeded(
                context.total_quantity,
                context.reference_unit_cost,
            )]
        } else {
            request.lines
        };

        let summary = AllocationSummary::compute(context.total_quantity, &lines);
        let session_id = Uuid::new_v4();

        info!(
            "allocation session {} opened for {} ({} {} across {} line(s))",
            session_id,
            context.item_label,
            context.total_quantity,
            context.unit_label,
            lines.len()
        );

        Self {
            session_id,
            item_index,
            context,
            policy,
            lines,
            summary,
        }
    }

    pub fn context(&self) -> &AllocationContext {
        &self.context
    }

    pub fn lines(&self) -> &[BatchLine] {
        &self.lines
    }

    pub fn summary(&self) -> &AllocationSummary {
        &self.summary
    }

    pub fn item_index(&self) -> usize {
        self.item_index
    }

    /// Writes one field of one line. The write itself never fails for a
    /// valid index; problems surface through the next validation run.
    pub fn apply_edit(
        &mut self,
        index: usize,
        edit: LineEdit,
    ) -> Result<&AllocationSummary, OperationError> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(OperationError::LineOutOfRange { index, len })?;

        match edit {
            LineEdit::BatchNumber(value) => line.batch_number = value,
            LineEdit::ExpiryDate(value) => line.expiry_date = value,
            LineEdit::Quantity(value) => line.quantity = value,
            LineEdit::UnitCost(value) => line.unit_cost = value,
        }

        self.recompute();
        Ok(&self.summary)
    }

    /// Appends a line pre-filled with the undistributed balance (zero when
    /// the total is already covered) and the reference cost.
    pub fn add_line(&mut self) -> &AllocationSummary {
        let quantity = self.summary.balance.max(Decimal::ZERO);
        self.lines.push(BatchLine::seeded(
            quantity,
            self.context.reference_unit_cost,
        ));
        self.recompute();
        &self.summary
    }

    /// Removes the line at `index`. Rejected without any state change when
    /// it is the last remaining line.
    pub fn remove_line(&mut self, index: usize) -> Result<&AllocationSummary, OperationError> {
        if self.lines.len() == 1 {
            return Err(OperationError::CannotRemoveLastLine);
        }
        if index >= self.lines.len() {
            return Err(OperationError::LineOutOfRange {
                index,
                len: self.lines.len(),
            });
        }

        self.lines.remove(index);
        self.recompute();
        Ok(&self.summary)
    }

    /// Current verdict over the lines. Safe to call any number of times;
    /// the report only changes when the state does.
    pub fn validate(&self) -> ValidationReport {
        validate(&self.context, &self.lines, &self.summary, &self.policy)
    }

    /// The only way to finish a session. Validation is re-run here
    /// unconditionally; a verdict from an earlier edit is never trusted.
    pub fn commit(self) -> CommitOutcome {
        let report = self.validate();

        if report.is_valid() {
            info!(
                "allocation session {} committed with {} line(s)",
                self.session_id,
                self.lines.len()
            );
            CommitOutcome::Committed(CommittedAllocation {
                item_index: self.item_index,
                lines: self.lines,
            })
        } else {
            warn!(
                "allocation session {} rejected at commit: {} error(s)",
                self.session_id,
                report.errors.len()
            );
            CommitOutcome::Rejected {
                session: self,
                report,
            }
        }
    }

    fn recompute(&mut self) {
        self.summary = AllocationSummary::compute(self.context.total_quantity, &self.lines);
    }
}
