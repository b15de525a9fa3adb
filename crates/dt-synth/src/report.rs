use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use dt_core::EditOperation;

/// Reason why a documentable node was left alone during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Code precedes the node on its first line.
    SharedLine,
    /// A documentation block exists and overwriting is off.
    AlreadyDocumented,
    /// The node starts outside the requested range.
    OutsideBounds,
}

/// Report generated after a sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Distinct documentable targets seen.
    pub visited: usize,
    /// Targets that received an edit.
    pub documented: usize,
    /// Targets whose block was already current.
    pub up_to_date: usize,
    pub skipped: HashMap<SkipReason, usize>,
    pub duration: Duration,
}

impl SweepReport {
    pub fn total_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    pub(crate) fn skip(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }
}

/// One atomic batch plus the report describing it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepOutcome {
    /// Document order; apply all or nothing.
    pub edits: Vec<EditOperation>,
    pub report: SweepReport,
}
