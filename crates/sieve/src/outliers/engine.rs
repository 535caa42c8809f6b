//! Outlier treatment: trimming and capping.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{OutlierBoundary, OutlierDetector};
use crate::config::Treatment;
use crate::dataset::{Column, Dataset};
use crate::error::Result;
use crate::result::{ColumnChange, TransformResult};
use crate::stats::{Denominator, RunningStats};

/// Boundaries and flagged cells for a set of columns, without treatment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detection method name.
    pub method: String,
    /// Boundary per column.
    pub boundaries: IndexMap<String, OutlierBoundary>,
    /// Outlier cells per column.
    pub outlier_counts: IndexMap<String, usize>,
    /// Original row ids with an outlier in any column.
    pub flagged_rows: BTreeSet<usize>,
}

impl Detection {
    /// Total outlier cells across columns.
    pub fn total_outliers(&self) -> usize {
        self.outlier_counts.values().sum()
    }
}

/// Summary of a treated dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub method: String,
    pub treatment: Treatment,
    pub boundaries: IndexMap<String, OutlierBoundary>,
    pub outlier_counts: IndexMap<String, usize>,
    /// Rows dropped (trim) or containing a clamped cell (cap).
    pub rows_affected: usize,
}

/// Result of an outlier treatment call.
pub type OutlierResult = TransformResult<OutlierSummary>;

/// Both treatments computed from one set of boundaries.
#[derive(Debug, Clone)]
pub struct TrimAndCap {
    pub trimmed: OutlierResult,
    pub capped: OutlierResult,
}

/// Applies detectors and treatments to numeric columns.
pub struct OutlierEngine;

impl OutlierEngine {
    /// Create a new outlier engine.
    pub fn new() -> Self {
        Self
    }

    /// Compute boundaries from the input dataset and flag outlier cells.
    ///
    /// Missing cells are never outliers.
    pub fn detect(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        detector: &dyn OutlierDetector,
    ) -> Result<Detection> {
        let mut detection = Detection {
            method: detector.method().to_string(),
            boundaries: IndexMap::new(),
            outlier_counts: IndexMap::new(),
            flagged_rows: BTreeSet::new(),
        };

        for column in dataset.require_numeric(columns)? {
            let boundary = detector.boundary(&column.name, &column.observed_numeric()?)?;
            let mut count = 0;
            for (row, value) in column.as_numeric()?.iter().enumerate() {
                if value.is_some_and(|v| boundary.is_outlier(v)) {
                    count += 1;
                    detection.flagged_rows.insert(dataset.row_ids()[row]);
                }
            }
            debug!(
                column = %column.name,
                method = detector.method(),
                lower = boundary.lower,
                upper = boundary.upper,
                outliers = count,
                "Outlier boundary"
            );
            detection.boundaries.insert(column.name.clone(), boundary);
            detection.outlier_counts.insert(column.name.clone(), count);
        }

        Ok(detection)
    }

    /// Detect and apply one treatment.
    pub fn treat(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        detector: &dyn OutlierDetector,
        treatment: Treatment,
    ) -> Result<OutlierResult> {
        let detection = self.detect(dataset, columns, detector)?;
        let result = match treatment {
            Treatment::Trim => self.trim(dataset, &detection),
            Treatment::Cap => self.cap(dataset, &detection)?,
        };
        info!(
            method = detector.method(),
            treatment = %treatment,
            outliers = detection.total_outliers(),
            rows = result.summary.rows_affected,
            "Outlier treatment complete"
        );
        Ok(result)
    }

    /// Drop every row with an outlier in any selected column.
    pub fn trim_outliers(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        detector: &dyn OutlierDetector,
    ) -> Result<OutlierResult> {
        self.treat(dataset, columns, detector, Treatment::Trim)
    }

    /// Clamp outlier cells to their column's boundary.
    pub fn cap_outliers(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        detector: &dyn OutlierDetector,
    ) -> Result<OutlierResult> {
        self.treat(dataset, columns, detector, Treatment::Cap)
    }

    /// Produce both the trimmed and the capped dataset from one set of boundaries.
    pub fn trim_and_cap(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        detector: &dyn OutlierDetector,
    ) -> Result<TrimAndCap> {
        let detection = self.detect(dataset, columns, detector)?;
        Ok(TrimAndCap {
            trimmed: self.trim(dataset, &detection),
            capped: self.cap(dataset, &detection)?,
        })
    }

    /// Per-cell z-scores (sample standard deviation) of the selected columns.
    ///
    /// A zero-spread column scores 0 everywhere; missing cells stay missing.
    pub fn z_scores(&self, dataset: &Dataset, columns: &[&str]) -> Result<Dataset> {
        let mut scores = Vec::with_capacity(columns.len());
        for column in dataset.require_numeric(columns)? {
            let running = RunningStats::from_values(&column.observed_numeric()?);
            let mean = running.mean().unwrap_or(0.0);
            let std = running.std_dev(Denominator::Sample).unwrap_or(0.0);
            let values = column.as_numeric()?.iter().map(|v| {
                v.map(|x| if std > 0.0 { (x - mean) / std } else { 0.0 })
            });
            scores.push(Column::numeric(column.name.clone(), values));
        }
        Dataset::with_row_ids(scores, dataset.row_ids().to_vec())
    }

    fn summary(&self, detection: &Detection, treatment: Treatment, rows: usize) -> OutlierSummary {
        OutlierSummary {
            method: detection.method.clone(),
            treatment,
            boundaries: detection.boundaries.clone(),
            outlier_counts: detection.outlier_counts.clone(),
            rows_affected: rows,
        }
    }

    fn trim(&self, dataset: &Dataset, detection: &Detection) -> OutlierResult {
        let keep: Vec<bool> = dataset
            .row_ids()
            .iter()
            .map(|id| !detection.flagged_rows.contains(id))
            .collect();
        let trimmed = dataset.filter_rows(&keep);

        let summary = self.summary(detection, Treatment::Trim, detection.flagged_rows.len());
        let mut result = OutlierResult::new(trimmed, summary);
        for (column, &count) in &detection.outlier_counts {
            if count > 0 {
                result.add_change(ColumnChange {
                    column: column.clone(),
                    description: format!("{} outlier(s) triggered row removal", count),
                    values_changed: count,
                });
            }
        }
        for &row in &detection.flagged_rows {
            result.mark_row(row);
        }
        result
    }

    fn cap(&self, dataset: &Dataset, detection: &Detection) -> Result<OutlierResult> {
        let mut capped = dataset.clone();
        let mut rows = BTreeSet::new();
        let mut changes = Vec::new();

        for (name, boundary) in &detection.boundaries {
            let values = capped.column_mut(name)?.as_numeric_mut()?;
            let mut clamped = 0;
            for (row, value) in values.iter_mut().enumerate() {
                if let Some(v) = value {
                    if boundary.is_outlier(*v) {
                        *v = boundary.clamp(*v);
                        clamped += 1;
                        rows.insert(dataset.row_ids()[row]);
                    }
                }
            }
            if clamped > 0 {
                changes.push(ColumnChange {
                    column: name.clone(),
                    description: format!(
                        "Capped {} value(s) to [{}, {}]",
                        clamped, boundary.lower, boundary.upper
                    ),
                    values_changed: clamped,
                });
            }
        }

        let summary = self.summary(detection, Treatment::Cap, rows.len());
        let mut result = OutlierResult::new(capped, summary);
        for change in changes {
            result.add_change(change);
        }
        for row in rows {
            result.mark_row(row);
        }
        Ok(result)
    }
}

impl Default for OutlierEngine {
    fn default() -> Self {
        Self::new()
    }
}
