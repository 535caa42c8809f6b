//! Report records produced by the diagnostics reporter.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dataset::ColumnKind;

/// Missing-value count for one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissingSummary {
    /// Number of missing cells.
    pub count: usize,
    /// Missing cells as a percentage of all rows (0-100).
    pub percentage: f64,
}

/// Central tendency and spread of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Number of non-missing values.
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample variance; undefined for a single observation.
    pub variance: Option<f64>,
}

/// Square column × column matrix over numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row and column labels.
    pub columns: Vec<String>,
    /// Row-major values. `None` where the statistic is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl Matrix {
    /// Look up the entry for a pair of columns.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        self.values[i][j]
    }

    /// Number of labels on each side.
    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

/// Paired before/after samples of one column, for density or box plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionComparison {
    pub column: String,
    /// Non-missing values before the transform.
    pub before: Vec<f64>,
    /// Non-missing values after the transform.
    pub after: Vec<f64>,
}

/// Variance of one column before and after a transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarianceComparison {
    pub before: Option<f64>,
    pub after: Option<f64>,
}

/// How one category's frequency moved between two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVariation {
    pub column: String,
    pub category: String,
    pub before_count: usize,
    pub after_count: usize,
    /// Share of non-missing values before, 0-100.
    pub before_percentage: f64,
    /// Share of non-missing values after, 0-100.
    pub after_percentage: f64,
}

/// Read-only statistics of a column at one point in time.
///
/// Snapshots are computed on demand and describe exactly the dataset they
/// were taken from; take a new one after every transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSnapshot {
    pub name: String,
    pub kind: ColumnKind,
    /// Number of non-missing values.
    pub count: usize,
    /// Number of missing values.
    pub missing: usize,
    pub missing_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    /// Most frequent values in their text form, first-encountered first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Correlation against every other numeric column.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub correlations: IndexMap<String, Option<f64>>,
    /// Sample covariance against every other numeric column.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub covariances: IndexMap<String, Option<f64>>,
}

/// Snapshot of every column plus dataset shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSnapshot>,
}
