//! Iterative chained-equation imputation.
//!
//! Every numeric column with missing values is regressed on the other
//! selected numeric columns. Missing cells start at the column mean; each
//! iteration visits the targets in column order and replaces their missing
//! cells with ridge-regression predictions computed from the current fills.
//! The engine always runs the configured number of iterations.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use tracing::{debug, info};

use super::simple::fill_column;
use super::{ColumnFill, ImputationResult, ImputationSummary, Imputer};
use crate::config::{self, FillMethod};
use crate::dataset::{Column, ColumnKind, Dataset};
use crate::error::{Result, SieveError};
use crate::result::ColumnChange;
use crate::stats;

/// Chained-equation imputer over numeric columns, with mode fill for the rest.
#[derive(Debug, Clone)]
pub struct IterativeImputer {
    iterations: usize,
    alpha: f64,
}

impl Default for IterativeImputer {
    fn default() -> Self {
        Self {
            iterations: 10,
            alpha: 1e-6,
        }
    }
}

impl IterativeImputer {
    /// Create an imputer running `iterations` rounds.
    pub fn new(iterations: usize) -> Result<Self> {
        config::validate_iteration_count(iterations)?;
        Ok(Self {
            iterations,
            ..Self::default()
        })
    }

    /// Set the ridge penalty applied to standardized predictors.
    pub fn with_alpha(mut self, alpha: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha < 0.0 {
            return Err(SieveError::InvalidParameter(format!(
                "ridge alpha must be a non-negative number, got {}",
                alpha
            )));
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Number of iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Imputer for IterativeImputer {
    fn strategy(&self) -> &'static str {
        "iterative"
    }

    fn impute(&self, dataset: &Dataset, columns: &[&str]) -> Result<ImputationResult> {
        let selected = dataset.require_columns(columns)?;
        let (numeric, other): (Vec<&Column>, Vec<&Column>) = selected
            .into_iter()
            .partition(|c| c.kind() == ColumnKind::Numeric);

        let mut output = dataset.clone();
        let mut summary = ImputationSummary::new(self.strategy());
        let mut changes = Vec::new();
        let mut rows = Vec::new();

        // Iteration 0: mean fill, remembering which cells were originally missing.
        // Rows are dataset rows, columns are the numeric columns in order.
        let row_count = dataset.row_count();
        let mut matrix = Array2::<f64>::zeros((row_count, numeric.len()));
        let mut mask = Array2::<bool>::from_elem((row_count, numeric.len()), false);
        for (j, column) in numeric.iter().enumerate() {
            let values = column.as_numeric()?;
            let mean = stats::mean(&column.observed_numeric()?).ok_or_else(|| {
                SieveError::UndefinedStatistic {
                    column: column.name.clone(),
                    statistic: "mean".to_string(),
                }
            })?;
            for (row, value) in values.iter().enumerate() {
                mask[[row, j]] = value.is_none();
                matrix[[row, j]] = value.unwrap_or(mean);
            }
        }

        let targets: Vec<usize> = (0..numeric.len())
            .filter(|&j| mask.column(j).iter().any(|&m| m))
            .collect();

        if numeric.len() > 1 {
            for iteration in 0..self.iterations {
                for &target in &targets {
                    let predictions = self.predict_missing(&matrix, mask.column(target), target);
                    let mut delta = 0.0f64;
                    for (row, prediction) in predictions {
                        delta = delta.max((matrix[[row, target]] - prediction).abs());
                        matrix[[row, target]] = prediction;
                    }
                    debug!(
                        iteration,
                        column = %numeric[target].name,
                        max_change = delta,
                        "Chained-equation update"
                    );
                }
            }
        }

        for (j, column) in numeric.iter().enumerate() {
            let filled: Vec<usize> = (0..row_count).filter(|&r| mask[[r, j]]).collect();
            summary.columns.insert(
                column.name.clone(),
                ColumnFill {
                    filled: filled.len(),
                    fill_value: None,
                },
            );
            if filled.is_empty() {
                continue;
            }
            rows.extend(filled.iter().map(|&p| dataset.row_ids()[p]));
            changes.push(ColumnChange {
                column: column.name.clone(),
                description: format!(
                    "Filled {} missing value(s) by chained-equation regression ({} iterations)",
                    filled.len(),
                    self.iterations
                ),
                values_changed: filled.len(),
            });
            output.replace_column(
                &column.name,
                Column::numeric(column.name.clone(), matrix.column(j).iter().copied().map(Some)),
            )?;
        }

        // Non-numeric columns are not modeled; they fall back to the mode.
        for column in other {
            let (filled, fill_value, positions) = fill_column(column, FillMethod::Mode)?;
            if !positions.is_empty() {
                rows.extend(positions.iter().map(|&p| dataset.row_ids()[p]));
                changes.push(ColumnChange {
                    column: column.name.clone(),
                    description: format!("Filled {} missing value(s) with the mode", positions.len()),
                    values_changed: positions.len(),
                });
                output.replace_column(&column.name, filled)?;
            }
            summary.columns.insert(
                column.name.clone(),
                ColumnFill {
                    filled: positions.len(),
                    fill_value,
                },
            );
        }

        info!(
            iterations = self.iterations,
            columns = numeric.len(),
            filled = summary.total_filled(),
            "Iterative imputation complete"
        );

        let mut result = ImputationResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        for row in rows {
            result.mark_row(row);
        }
        Ok(result)
    }
}

impl IterativeImputer {
    /// Fit `target` on the other columns over its observed rows and predict
    /// its originally-missing rows.
    fn predict_missing(
        &self,
        matrix: &Array2<f64>,
        mask: ArrayView1<'_, bool>,
        target: usize,
    ) -> Vec<(usize, f64)> {
        let train: Vec<usize> = (0..mask.len()).filter(|&r| !mask[r]).collect();
        let missing: Vec<usize> = (0..mask.len()).filter(|&r| mask[r]).collect();

        let y = matrix.column(target).select(Axis(0), &train);
        let y_mean = y.mean().unwrap_or(0.0);

        // Standardize predictors on the training rows; constant ones drop out.
        let predictors: Vec<usize> = (0..matrix.ncols())
            .filter(|&j| j != target)
            .filter(|&j| {
                let column = matrix.column(j).select(Axis(0), &train);
                column.std(0.0) > 0.0
            })
            .collect();
        let design = matrix.select(Axis(1), &predictors);
        let training = design.select(Axis(0), &train);
        let Some(means) = training.mean_axis(Axis(0)) else {
            return missing.into_iter().map(|row| (row, y_mean)).collect();
        };
        let std = training.std_axis(Axis(0), 0.0);
        let standardize = |x: Array2<f64>| (x - &means) / &std;

        let coefficients = if predictors.is_empty() || train.len() < 2 {
            None
        } else {
            ridge(&standardize(training), &y, y_mean, self.alpha)
        };

        let Some(beta) = coefficients else {
            return missing.into_iter().map(|row| (row, y_mean)).collect();
        };
        let predictions = standardize(design.select(Axis(0), &missing)).dot(&beta) + y_mean;
        missing.into_iter().zip(predictions.iter().copied()).collect()
    }
}

/// Solve `(XᵀX + αI) β = Xᵀ(y - ȳ)` for centered predictors.
fn ridge(x: &Array2<f64>, y: &Array1<f64>, y_mean: f64, alpha: f64) -> Option<Array1<f64>> {
    let p = x.ncols();
    if p == 0 {
        return None;
    }
    let gram = x.t().dot(x) + Array2::<f64>::eye(p) * alpha;
    let rhs = x.t().dot(&(y - y_mean));
    solve(gram, rhs)
}

/// Gaussian elimination with partial pivoting. `None` for a singular system.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }
        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut solution = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[[row, k]] * solution[k]).sum();
        solution[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(solution)
}
