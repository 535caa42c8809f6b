//! Univariate imputation: one fill value per column.

use tracing::{debug, info};

use super::{ColumnFill, ImputationResult, ImputationSummary, Imputer};
use crate::config::FillMethod;
use crate::dataset::{Cell, Column, ColumnKind, Dataset};
use crate::error::{Result, SieveError};
use crate::result::ColumnChange;
use crate::stats;

/// Fills each selected column independently with its mean, median or mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleImputer {
    method: FillMethod,
}

impl SimpleImputer {
    /// Create an imputer with the given fill statistic.
    pub fn new(method: FillMethod) -> Self {
        Self { method }
    }

    /// Fill statistic in use.
    pub fn method(&self) -> FillMethod {
        self.method
    }
}

impl Imputer for SimpleImputer {
    fn strategy(&self) -> &'static str {
        match self.method {
            FillMethod::Mean => "mean",
            FillMethod::Median => "median",
            FillMethod::Mode => "mode",
        }
    }

    fn impute(&self, dataset: &Dataset, columns: &[&str]) -> Result<ImputationResult> {
        let mut output = dataset.clone();
        let mut summary = ImputationSummary::new(self.strategy());
        let mut changes = Vec::new();
        let mut rows = Vec::new();

        // Compute every fill before writing any, so a failure leaves nothing half done.
        let mut filled_columns = Vec::with_capacity(columns.len());
        for &name in columns {
            let column = dataset.column(name)?;
            let (filled, fill_value, positions) = fill_column(column, self.method)?;
            filled_columns.push((name, filled, fill_value, positions));
        }

        for (name, filled, fill_value, positions) in filled_columns {
            if !positions.is_empty() {
                debug!(
                    column = name,
                    fill = %fill_value.clone().unwrap_or(Cell::Missing),
                    count = positions.len(),
                    "Filled missing values"
                );
                changes.push(ColumnChange {
                    column: name.to_string(),
                    description: format!(
                        "Filled {} missing value(s) with {} {}",
                        positions.len(),
                        self.strategy(),
                        fill_value.clone().unwrap_or(Cell::Missing)
                    ),
                    values_changed: positions.len(),
                });
                rows.extend(positions.iter().map(|&p| dataset.row_ids()[p]));
                output.replace_column(name, filled)?;
            }
            summary.columns.insert(
                name.to_string(),
                ColumnFill {
                    filled: positions.len(),
                    fill_value,
                },
            );
        }

        info!(
            strategy = self.strategy(),
            columns = columns.len(),
            filled = summary.total_filled(),
            "Univariate imputation complete"
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

/// Fill the missing cells of one column.
///
/// Returns the filled column, the fill value (`None` when nothing was
/// missing) and the positions that were filled.
pub(super) fn fill_column(
    column: &Column,
    method: FillMethod,
) -> Result<(Column, Option<Cell>, Vec<usize>)> {
    if matches!(method, FillMethod::Mean | FillMethod::Median) {
        column.as_numeric()?;
    }

    let positions = column.missing_rows();
    if positions.is_empty() {
        return Ok((column.clone(), None, positions));
    }

    let undefined = |statistic: &str| SieveError::UndefinedStatistic {
        column: column.name.clone(),
        statistic: statistic.to_string(),
    };

    let fill = match method {
        FillMethod::Mean => {
            Cell::Number(stats::mean(&column.observed_numeric()?).ok_or_else(|| undefined("mean"))?)
        }
        FillMethod::Median => Cell::Number(
            stats::median(&column.observed_numeric()?).ok_or_else(|| undefined("median"))?,
        ),
        FillMethod::Mode => mode_cell(column).ok_or_else(|| undefined("mode"))?,
    };

    let mut filled = column.clone();
    for &row in &positions {
        filled.set_cell(row, fill.clone())?;
    }
    Ok((filled, Some(fill), positions))
}

/// Most frequent value of a column of any kind; ties go to the first encountered.
pub(super) fn mode_cell(column: &Column) -> Option<Cell> {
    if column.kind() == ColumnKind::Numeric {
        let observed = column.observed_numeric().ok()?;
        return stats::numeric_modes(&observed).first().copied().map(Cell::Number);
    }
    let text = column.text_values();
    let mode = stats::mode(text.iter().flatten().map(String::as_str))?;
    let row = text.iter().position(|t| t.as_deref() == Some(mode.as_str()))?;
    column.cell(row)
}
