//! Missing-value imputation.
//!
//! Provides:
//! - Univariate fills (mean, median, mode)
//! - Nearest-neighbor imputation over numeric columns
//! - Iterative chained-equation imputation with ridge regressions
//!
//! Every imputer returns a new dataset; the input is never modified.

mod iterative;
mod knn;
mod simple;

pub use iterative::IterativeImputer;
pub use knn::KnnImputer;
pub use simple::SimpleImputer;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dataset::{Cell, Dataset};
use crate::error::Result;
use crate::result::TransformResult;

/// What an imputer did to one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFill {
    /// Number of cells filled.
    pub filled: usize,
    /// The single fill value, for univariate strategies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<Cell>,
}

/// Summary of one imputation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImputationSummary {
    /// Strategy name.
    pub strategy: String,
    /// Per-column fills, in selection order.
    pub columns: IndexMap<String, ColumnFill>,
}

impl ImputationSummary {
    pub(crate) fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            columns: IndexMap::new(),
        }
    }

    /// Total cells filled across all columns.
    pub fn total_filled(&self) -> usize {
        self.columns.values().map(|c| c.filled).sum()
    }
}

/// Result of an imputation call.
pub type ImputationResult = TransformResult<ImputationSummary>;

/// Common interface of the imputers.
pub trait Imputer: Send + Sync {
    /// Short name used in reports and logs.
    fn strategy(&self) -> &'static str;

    /// Fill missing cells in the selected columns.
    fn impute(&self, dataset: &Dataset, columns: &[&str]) -> Result<ImputationResult>;
}
