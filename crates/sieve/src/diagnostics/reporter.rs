//! Diagnostics over a dataset: missingness, descriptive statistics,
//! correlation and before/after comparisons.
//!
//! Every function reads its input and returns a fresh report; nothing is
//! cached, so a report always describes the dataset it was given.

use indexmap::IndexMap;
use tracing::debug;

use super::report::{
    CategoryVariation, ColumnSnapshot, DatasetProfile, DistributionComparison, Matrix,
    MissingSummary, NumericSummary, VarianceComparison,
};
use crate::dataset::{Column, ColumnData, ColumnKind, Dataset};
use crate::error::{Result, SieveError};
use crate::stats::{self, Denominator};

/// Computes diagnostics reports. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticsReporter;

impl DiagnosticsReporter {
    /// Create a reporter.
    pub fn new() -> Self {
        Self
    }

    /// Missing count and percentage for every column, in column order.
    pub fn missingness(&self, dataset: &Dataset) -> IndexMap<String, MissingSummary> {
        let rows = dataset.row_count();
        dataset
            .columns()
            .iter()
            .map(|column| {
                let count = column.missing_count();
                (
                    column.name.clone(),
                    MissingSummary {
                        count,
                        percentage: percentage(count, rows),
                    },
                )
            })
            .collect()
    }

    /// Mean, median and sample variance for the named numeric columns.
    ///
    /// A column without any non-missing value fails with `UndefinedStatistic`.
    pub fn describe_numeric<S: AsRef<str>>(
        &self,
        dataset: &Dataset,
        columns: &[S],
    ) -> Result<IndexMap<String, NumericSummary>> {
        let mut summaries = IndexMap::new();
        for column in dataset.require_numeric(columns)? {
            let values = column.observed_numeric()?;
            let undefined = |statistic: &str| SieveError::UndefinedStatistic {
                column: column.name.clone(),
                statistic: statistic.to_string(),
            };
            let mean = stats::mean(&values).ok_or_else(|| undefined("mean"))?;
            let median = stats::median(&values).ok_or_else(|| undefined("median"))?;
            summaries.insert(
                column.name.clone(),
                NumericSummary {
                    count: values.len(),
                    mean,
                    median,
                    variance: stats::variance(&values, Denominator::Sample),
                },
            );
        }
        Ok(summaries)
    }

    /// Pearson correlation matrix over every numeric column.
    ///
    /// Non-numeric columns are left out of the matrix.
    pub fn correlation(&self, dataset: &Dataset) -> Matrix {
        pairwise_matrix(dataset, stats::correlation)
    }

    /// Sample covariance matrix over every numeric column.
    pub fn covariance(&self, dataset: &Dataset) -> Matrix {
        pairwise_matrix(dataset, stats::covariance)
    }

    /// Paired non-missing samples of each column before and after a transform.
    pub fn compare_distributions<S: AsRef<str>>(
        &self,
        before: &Dataset,
        after: &Dataset,
        columns: &[S],
    ) -> Result<Vec<DistributionComparison>> {
        let old = before.require_numeric(columns)?;
        let new = after.require_numeric(columns)?;
        old.into_iter()
            .zip(new)
            .map(|(b, a)| {
                Ok(DistributionComparison {
                    column: b.name.clone(),
                    before: b.observed_numeric()?,
                    after: a.observed_numeric()?,
                })
            })
            .collect()
    }

    /// Sample variance of each column before and after a transform.
    pub fn variance_comparison<S: AsRef<str>>(
        &self,
        before: &Dataset,
        after: &Dataset,
        columns: &[S],
    ) -> Result<IndexMap<String, VarianceComparison>> {
        let old = before.require_numeric(columns)?;
        let new = after.require_numeric(columns)?;
        old.into_iter()
            .zip(new)
            .map(|(b, a)| {
                Ok((
                    b.name.clone(),
                    VarianceComparison {
                        before: stats::variance(&b.observed_numeric()?, Denominator::Sample),
                        after: stats::variance(&a.observed_numeric()?, Denominator::Sample),
                    },
                ))
            })
            .collect()
    }

    /// Per-category counts and shares before and after a transform.
    ///
    /// Categories appear in first-encountered order, those only present
    /// afterwards (e.g. a fill value) last.
    pub fn category_variation<S: AsRef<str>>(
        &self,
        before: &Dataset,
        after: &Dataset,
        columns: &[S],
    ) -> Result<Vec<CategoryVariation>> {
        let mut variations = Vec::new();
        for name in columns {
            let name = name.as_ref();
            let old = before.column(name)?.text_values();
            let new = after.column(name)?.text_values();
            let old_counts = stats::value_counts(old.iter().flatten().map(String::as_str));
            let new_counts = stats::value_counts(new.iter().flatten().map(String::as_str));
            let old_total: usize = old_counts.values().sum();
            let new_total: usize = new_counts.values().sum();

            let mut categories: Vec<&String> = old_counts.keys().collect();
            categories.extend(new_counts.keys().filter(|k| !old_counts.contains_key(*k)));

            for category in categories {
                let before_count = old_counts.get(category).copied().unwrap_or(0);
                let after_count = new_counts.get(category).copied().unwrap_or(0);
                variations.push(CategoryVariation {
                    column: name.to_string(),
                    category: category.clone(),
                    before_count,
                    after_count,
                    before_percentage: percentage(before_count, old_total),
                    after_percentage: percentage(after_count, new_total),
                });
            }
        }
        Ok(variations)
    }

    /// Columns whose missing share is above zero but below `max_pct`.
    ///
    /// These are the columns where dropping incomplete rows loses little data.
    pub fn complete_case_candidates(&self, dataset: &Dataset, max_pct: f64) -> Vec<String> {
        self.missingness(dataset)
            .into_iter()
            .filter(|(_, m)| m.percentage > 0.0 && m.percentage < max_pct)
            .map(|(name, _)| name)
            .collect()
    }

    /// Statistics snapshot of one column.
    pub fn snapshot(&self, dataset: &Dataset, column: &str) -> Result<ColumnSnapshot> {
        let col = dataset.column(column)?;
        let missing = col.missing_count();
        let count = col.len() - missing;

        let mut snapshot = ColumnSnapshot {
            name: col.name.clone(),
            kind: col.kind(),
            count,
            missing,
            missing_percentage: percentage(missing, col.len()),
            mean: None,
            median: None,
            modes: Vec::new(),
            variance: None,
            correlations: IndexMap::new(),
            covariances: IndexMap::new(),
        };

        match &col.data {
            ColumnData::Numeric(values) => {
                let observed = col.observed_numeric()?;
                snapshot.mean = stats::mean(&observed);
                snapshot.median = stats::median(&observed);
                snapshot.variance = stats::variance(&observed, Denominator::Sample);
                snapshot.modes = stats::numeric_modes(&observed)
                    .into_iter()
                    .map(|v| v.to_string())
                    .collect();
                for other in numeric_columns(dataset) {
                    if other.name == col.name {
                        continue;
                    }
                    let other_values = other.as_numeric()?;
                    snapshot.correlations.insert(
                        other.name.clone(),
                        stats::correlation(values, other_values),
                    );
                    snapshot
                        .covariances
                        .insert(other.name.clone(), stats::covariance(values, other_values));
                }
            }
            ColumnData::Categorical(_) | ColumnData::Boolean(_) => {
                let text = col.text_values();
                snapshot.modes = stats::modes(text.iter().flatten().map(String::as_str));
            }
        }

        debug!(column = %col.name, count, missing, "Column snapshot");
        Ok(snapshot)
    }

    /// Snapshot of every column.
    pub fn profile(&self, dataset: &Dataset) -> Result<DatasetProfile> {
        let columns = dataset
            .column_names()
            .into_iter()
            .map(|name| self.snapshot(dataset, name))
            .collect::<Result<Vec<_>>>()?;
        Ok(DatasetProfile {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            columns,
        })
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn numeric_columns(dataset: &Dataset) -> impl Iterator<Item = &Column> {
    dataset
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
}

fn pairwise_matrix(
    dataset: &Dataset,
    statistic: fn(&[Option<f64>], &[Option<f64>]) -> Option<f64>,
) -> Matrix {
    let columns: Vec<(&str, &[Option<f64>])> = numeric_columns(dataset)
        .filter_map(|c| Some((c.name.as_str(), c.as_numeric().ok()?)))
        .collect();

    let values = columns
        .iter()
        .map(|(_, x)| columns.iter().map(|(_, y)| statistic(x, y)).collect::<Vec<_>>())
        .collect();

    Matrix {
        columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
    }
}
