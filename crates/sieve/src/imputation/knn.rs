//! Nearest-neighbor imputation.
//!
//! Distances use only the dimensions both rows have values for, scaled up
//! by the share of dimensions that were usable:
//!
//! ```text
//! d(a, b) = sqrt(total / shared * Σ_shared (a_i - b_i)²)
//! ```
//!
//! Feature rows live in an `Array2<f64>` with NaN marking a missing cell.
//! Neighbors are always taken from the original (unfilled) values, and ties
//! in distance are broken by the donors' values rather than their row
//! position, so the result does not depend on row order.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1};
use tracing::{debug, info, warn};

use super::{ColumnFill, ImputationResult, ImputationSummary, Imputer};
use crate::config::{self, Weighting};
use crate::dataset::{Column, ColumnData, Dataset};
use crate::error::{Result, SieveError};
use crate::result::ColumnChange;
use crate::stats;

/// Fills missing numeric cells from the `k` most similar rows.
#[derive(Debug, Clone)]
pub struct KnnImputer {
    neighbors: usize,
    weighting: Weighting,
    encode_categorical: bool,
}

impl Default for KnnImputer {
    fn default() -> Self {
        Self {
            neighbors: 5,
            weighting: Weighting::Uniform,
            encode_categorical: false,
        }
    }
}

/// A donor row for one missing cell.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    distance: f64,
    value: f64,
    features: ArrayView1<'a, f64>,
}

impl KnnImputer {
    /// Create an imputer using `k` neighbors.
    pub fn new(neighbors: usize) -> Result<Self> {
        config::validate_neighbor_count(neighbors)?;
        Ok(Self {
            neighbors,
            ..Self::default()
        })
    }

    /// Set how neighbor values are averaged.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Let every categorical column take part in distances as 0/1 indicators.
    pub fn with_categorical_features(mut self, enabled: bool) -> Self {
        self.encode_categorical = enabled;
        self
    }

    /// Number of neighbors.
    pub fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Build the per-row feature vectors used for distances.
    fn feature_rows(&self, dataset: &Dataset, targets: &[&Column]) -> Result<Array2<f64>> {
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(targets.len());
        for column in targets {
            columns.push(
                column
                    .as_numeric()?
                    .iter()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect(),
            );
        }

        if self.encode_categorical {
            for column in dataset.columns() {
                let ColumnData::Categorical(values) = &column.data else {
                    continue;
                };
                let mut categories: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
                categories.sort_unstable();
                categories.dedup();
                for category in categories {
                    columns.push(
                        values
                            .iter()
                            .map(|value| match value.as_deref() {
                                Some(v) if v == category => 1.0,
                                Some(_) => 0.0,
                                None => f64::NAN,
                            })
                            .collect(),
                    );
                }
            }
        }

        let rows = dataset.row_count();
        Ok(Array2::from_shape_fn((rows, columns.len()), |(row, j)| {
            columns[j][row]
        }))
    }

    fn average(&self, donors: &[Candidate<'_>]) -> f64 {
        match self.weighting {
            Weighting::Uniform => donors.iter().map(|d| d.value).sum::<f64>() / donors.len() as f64,
            Weighting::Distance => {
                // Exact matches take all the weight, as do distances so small
                // their inverse overflows.
                let exact: Vec<f64> = donors
                    .iter()
                    .filter(|d| d.distance == 0.0 || !(1.0 / d.distance).is_finite())
                    .map(|d| d.value)
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }
                let (sum, weights) = donors.iter().fold((0.0, 0.0), |(s, w), d| {
                    let weight = 1.0 / d.distance;
                    (s + weight * d.value, w + weight)
                });
                sum / weights
            }
        }
    }
}

impl Imputer for KnnImputer {
    fn strategy(&self) -> &'static str {
        "knn"
    }

    fn impute(&self, dataset: &Dataset, columns: &[&str]) -> Result<ImputationResult> {
        let targets = dataset.require_numeric(columns)?;
        let features = self.feature_rows(dataset, &targets)?;

        let mut output = dataset.clone();
        let mut summary = ImputationSummary::new(self.strategy());
        let mut result_rows = Vec::new();
        let mut changes = Vec::new();

        for column in &targets {
            let values = column.as_numeric()?;
            let missing = column.missing_rows();
            if missing.is_empty() {
                summary.columns.insert(
                    column.name.clone(),
                    ColumnFill {
                        filled: 0,
                        fill_value: None,
                    },
                );
                continue;
            }

            let observed = column.observed_numeric()?;
            let fallback = stats::mean(&observed).ok_or_else(|| SieveError::UndefinedStatistic {
                column: column.name.clone(),
                statistic: "mean".to_string(),
            })?;

            let mut filled = values.to_vec();
            let mut fallbacks = 0usize;

            for &row in &missing {
                let mut candidates: Vec<Candidate<'_>> = values
                    .iter()
                    .enumerate()
                    .filter(|(donor, _)| *donor != row)
                    .filter_map(|(donor, value)| {
                        let value = (*value)?;
                        let distance = nan_euclidean(features.row(row), features.row(donor))?;
                        Some(Candidate {
                            distance,
                            value,
                            features: features.row(donor),
                        })
                    })
                    .collect();

                if candidates.is_empty() {
                    fallbacks += 1;
                    filled[row] = Some(fallback);
                    continue;
                }

                candidates.sort_by(compare_candidates);
                candidates.truncate(self.neighbors);
                filled[row] = Some(self.average(&candidates));
            }

            if fallbacks > 0 {
                warn!(
                    column = %column.name,
                    rows = fallbacks,
                    "No neighbor shares a value with these rows; filled with the column mean"
                );
            }
            debug!(
                column = %column.name,
                filled = missing.len(),
                "Nearest-neighbor fill"
            );

            result_rows.extend(missing.iter().map(|&p| dataset.row_ids()[p]));
            changes.push(ColumnChange {
                column: column.name.clone(),
                description: format!(
                    "Filled {} missing value(s) from {} nearest neighbor(s)",
                    missing.len(),
                    self.neighbors
                ),
                values_changed: missing.len(),
            });
            summary.columns.insert(
                column.name.clone(),
                ColumnFill {
                    filled: missing.len(),
                    fill_value: None,
                },
            );
            output.replace_column(&column.name, Column::numeric(column.name.clone(), filled))?;
        }

        info!(
            k = self.neighbors,
            weighting = %self.weighting,
            filled = summary.total_filled(),
            "Nearest-neighbor imputation complete"
        );

        let mut result = ImputationResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        for row in result_rows {
            result.mark_row(row);
        }
        Ok(result)
    }
}

/// Missing-aware Euclidean distance; `None` when no dimension is shared.
fn nan_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<f64> {
    let mut shared = 0usize;
    let mut sum = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        if !x.is_nan() && !y.is_nan() {
            shared += 1;
            sum += (x - y).powi(2);
        }
    }
    if shared == 0 {
        return None;
    }
    Some((a.len() as f64 / shared as f64 * sum).sqrt())
}

/// Order by distance, then by donor value, then by the donor's full feature row.
fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.value.total_cmp(&b.value))
        .then_with(|| compare_features(a.features, b.features))
}

/// Missing (NaN) sorts before any value.
fn compare_features(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ordering = match (x.is_nan(), y.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => x.total_cmp(y),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;
    use ndarray::array;

    fn grid() -> Dataset {
        Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(2.0), Some(3.0), Some(10.0), Some(2.1)]),
            Column::numeric("y", vec![Some(10.0), Some(20.0), Some(30.0), Some(100.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_nan_euclidean_scales_by_shared_dims() {
        let a = array![0.0, f64::NAN, 3.0];
        let b = array![4.0, 1.0, f64::NAN];
        // One shared dim of three: sqrt(3 / 1 * 16)
        assert!((nan_euclidean(a.view(), b.view()).unwrap() - 48f64.sqrt()).abs() < 1e-12);
        let missing = array![f64::NAN];
        let present = array![1.0];
        assert_eq!(nan_euclidean(missing.view(), present.view()), None);
    }

    #[test]
    fn test_tiny_distance_takes_all_weight() {
        let near = array![0.0];
        let far = array![1.0];
        let donors = [
            Candidate {
                distance: 1e-310,
                value: 7.0,
                features: near.view(),
            },
            Candidate {
                distance: 2.0,
                value: 100.0,
                features: far.view(),
            },
        ];
        let imputer = KnnImputer::new(2).unwrap().with_weighting(Weighting::Distance);
        assert_eq!(imputer.average(&donors), 7.0);
    }

    #[test]
    fn test_uniform_average_of_nearest() {
        let imputer = KnnImputer::new(2).unwrap();
        let result = imputer.impute(&grid(), &["x", "y"]).unwrap();
        // Nearest by x to 2.1 are 2.0 (y=20) and 3.0 (y=30)
        assert_eq!(result.dataset.cell(4, "y").unwrap(), Cell::Number(25.0));
        assert_eq!(result.summary.columns["y"].filled, 1);
        assert_eq!(result.summary.columns["x"].filled, 0);
        assert!(result.affected_rows.contains(&4));
    }

    #[test]
    fn test_distance_weighting_prefers_closer() {
        let imputer = KnnImputer::new(2).unwrap().with_weighting(Weighting::Distance);
        let result = imputer.impute(&grid(), &["x", "y"]).unwrap();
        let value = result.dataset.cell(4, "y").unwrap().as_f64().unwrap();
        assert!(value > 20.0 && value < 25.0);
    }

    #[test]
    fn test_permutation_insensitive() {
        let data = grid();
        let reversed = data.select_rows(&[4, 3, 2, 1, 0]);
        let imputer = KnnImputer::new(3).unwrap();
        let a = imputer.impute(&data, &["x", "y"]).unwrap();
        let b = imputer.impute(&reversed, &["x", "y"]).unwrap();
        assert_eq!(a.dataset.cell(4, "y").unwrap(), b.dataset.cell(0, "y").unwrap());
    }

    #[test]
    fn test_falls_back_to_mean_without_shared_dims() {
        let data = Dataset::new(vec![
            Column::numeric("x", vec![None, Some(1.0), Some(3.0)]),
            Column::numeric("y", vec![None, Some(2.0), Some(4.0)]),
        ])
        .unwrap();
        let result = KnnImputer::new(1).unwrap().impute(&data, &["x", "y"]).unwrap();
        assert_eq!(result.dataset.cell(0, "x").unwrap(), Cell::Number(2.0));
        assert_eq!(result.dataset.cell(0, "y").unwrap(), Cell::Number(3.0));
    }

    #[test]
    fn test_categorical_features_change_neighbors() {
        let data = Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0), Some(1.0), Some(1.0)]),
            Column::numeric("y", vec![None, Some(10.0), Some(50.0)]),
            Column::categorical("group", vec![Some("b"), Some("a"), Some("b")]),
        ])
        .unwrap();
        let plain = KnnImputer::new(1).unwrap().impute(&data, &["x", "y"]).unwrap();
        // Equal distance: tie broken by the smaller donor value.
        assert_eq!(plain.dataset.cell(0, "y").unwrap(), Cell::Number(10.0));

        let encoded = KnnImputer::new(1)
            .unwrap()
            .with_categorical_features(true)
            .impute(&data, &["x", "y"])
            .unwrap();
        assert_eq!(encoded.dataset.cell(0, "y").unwrap(), Cell::Number(50.0));
    }

    #[test]
    fn test_rejects_zero_neighbors_and_categorical_targets() {
        assert!(matches!(KnnImputer::new(0), Err(SieveError::InvalidParameter(_))));
        let data = Dataset::new(vec![Column::categorical("c", vec![Some("a"), None])]).unwrap();
        let err = KnnImputer::default().impute(&data, &["c"]).unwrap_err();
        assert!(matches!(err, SieveError::InvalidColumnKind { .. }));
    }
}
