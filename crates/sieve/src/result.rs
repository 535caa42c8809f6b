//! Result of an engine call: the new dataset plus what changed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// A single change made to one column during a transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnChange {
    /// Column affected (source column for derived outputs).
    pub column: String,

    /// Human-readable description of the change.
    pub description: String,

    /// Number of cells changed, added, or rows removed because of this column.
    pub values_changed: usize,
}

/// Output of every engine call.
///
/// Created fresh per call and owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResult<S> {
    /// The transformed dataset. The input dataset is never modified.
    pub dataset: Dataset,

    /// Original row ids of rows that were changed or removed.
    pub affected_rows: BTreeSet<usize>,

    /// Names of columns that were changed, added, or removed.
    pub affected_columns: Vec<String>,

    /// Per-column changes, in processing order.
    pub changes: Vec<ColumnChange>,

    /// Engine-specific summary.
    pub summary: S,
}

impl<S> TransformResult<S> {
    /// Create a result with no recorded changes.
    pub fn new(dataset: Dataset, summary: S) -> Self {
        Self {
            dataset,
            affected_rows: BTreeSet::new(),
            affected_columns: Vec::new(),
            changes: Vec::new(),
            summary,
        }
    }

    /// Record a change to a column.
    pub fn add_change(&mut self, change: ColumnChange) {
        if !self.affected_columns.contains(&change.column) {
            self.affected_columns.push(change.column.clone());
        }
        self.changes.push(change);
    }

    /// Record an affected original row id.
    pub fn mark_row(&mut self, row_id: usize) {
        self.affected_rows.insert(row_id);
    }

    /// Total number of values changed across all columns.
    pub fn values_changed(&self) -> usize {
        self.changes.iter().map(|c| c.values_changed).sum()
    }
}
