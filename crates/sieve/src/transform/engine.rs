//! Engine that derives transformed columns from numeric source columns.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::operations::DistributionTransform;
use super::power;
use crate::dataset::{Column, Dataset};
use crate::error::{Result, SieveError};
use crate::result::{ColumnChange, TransformResult};

/// Summary of one transform call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformSummary {
    pub transform: DistributionTransform,
    /// Source column → derived column.
    pub outputs: IndexMap<String, String>,
    /// Fitted λ per source column (power transforms only).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub lambdas: IndexMap<String, f64>,
    /// Shift added before a power transform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<f64>,
}

/// Result of a distribution transform call.
pub type DistributionResult = TransformResult<TransformSummary>;

/// Appends `<column>_<suffix>` columns; source columns are never modified.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    shift: f64,
}

impl TransformEngine {
    /// Create an engine with the default power-transform shift of +1.
    pub fn new() -> Self {
        Self { shift: 1.0 }
    }

    /// Set the shift added before Box-Cox and Yeo-Johnson.
    pub fn with_shift(mut self, shift: f64) -> Result<Self> {
        if !shift.is_finite() {
            return Err(SieveError::InvalidParameter(format!(
                "power transform shift must be finite, got {}",
                shift
            )));
        }
        self.shift = shift;
        Ok(self)
    }

    /// Apply one transform to every selected column.
    ///
    /// All derived columns are computed before any is added, so a domain
    /// error leaves no partial output.
    pub fn apply(
        &self,
        dataset: &Dataset,
        columns: &[&str],
        transform: DistributionTransform,
    ) -> Result<DistributionResult> {
        let mut derived = Vec::with_capacity(columns.len());
        let mut summary = TransformSummary {
            transform,
            outputs: IndexMap::new(),
            lambdas: IndexMap::new(),
            shift: transform.is_power().then_some(self.shift),
        };

        for column in dataset.require_numeric(columns)? {
            let values = column.as_numeric()?;
            let output = if transform.is_power() {
                let (output, lambda) = self.power_column(dataset, column, values, transform)?;
                summary.lambdas.insert(column.name.clone(), lambda);
                output
            } else {
                closed_form_column(dataset, column, values, transform)?
            };
            let name = transform.output_name(&column.name);
            summary.outputs.insert(column.name.clone(), name.clone());
            derived.push((column.name.clone(), Column::numeric(name, output)));
        }

        let mut output = dataset.clone();
        let mut changes = Vec::with_capacity(derived.len());
        for (source, column) in derived {
            let written = column.len() - column.missing_count();
            changes.push(ColumnChange {
                column: column.name.clone(),
                description: format!("Derived from '{}' by {}", source, transform),
                values_changed: written,
            });
            output.add_column(column)?;
        }

        info!(
            transform = %transform,
            columns = columns.len(),
            "Distribution transform complete"
        );

        let mut result = DistributionResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        Ok(result)
    }

    fn power_column(
        &self,
        dataset: &Dataset,
        column: &Column,
        values: &[Option<f64>],
        transform: DistributionTransform,
    ) -> Result<(Vec<Option<f64>>, f64)> {
        let mut shifted = Vec::with_capacity(values.len());
        for (row, value) in values.iter().enumerate() {
            let Some(x) = *value else { continue };
            let s = x + self.shift;
            if transform == DistributionTransform::BoxCox && s <= 0.0 {
                return Err(domain_error(dataset, column, row, x, transform));
            }
            shifted.push(s);
        }
        if shifted.is_empty() {
            return Err(SieveError::UndefinedStatistic {
                column: column.name.clone(),
                statistic: "lambda".to_string(),
            });
        }

        let fitted = match transform {
            DistributionTransform::BoxCox => power::fit_lambda(&shifted, power::box_cox_log_likelihood),
            _ => power::fit_lambda(&shifted, power::yeo_johnson_log_likelihood),
        };
        let lambda = fitted.unwrap_or_else(|| {
            warn!(
                column = %column.name,
                transform = %transform,
                "Column has no spread to fit; using lambda = 1"
            );
            1.0
        });
        debug!(column = %column.name, transform = %transform, lambda, "Fitted lambda");

        let output = values
            .iter()
            .map(|v| {
                v.map(|x| match transform {
                    DistributionTransform::BoxCox => power::box_cox(x + self.shift, lambda),
                    _ => power::yeo_johnson(x + self.shift, lambda),
                })
            })
            .collect();
        Ok((output, lambda))
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn closed_form_column(
    dataset: &Dataset,
    column: &Column,
    values: &[Option<f64>],
    transform: DistributionTransform,
) -> Result<Vec<Option<f64>>> {
    values
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(x) => transform
                .apply_closed_form(*x)
                .map(Some)
                .ok_or_else(|| domain_error(dataset, column, row, *x, transform)),
        })
        .collect()
}

fn domain_error(
    dataset: &Dataset,
    column: &Column,
    row: usize,
    value: f64,
    transform: DistributionTransform,
) -> SieveError {
    SieveError::DomainError {
        column: column.name.clone(),
        row: dataset.row_ids()[row],
        value,
        transform: transform.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;
    use crate::stats;

    fn skewed() -> Dataset {
        let values: Vec<Option<f64>> = (0..30).map(|i| Some((i as f64 * 0.15).exp() - 1.0)).collect();
        Dataset::new(vec![Column::numeric("income", values)]).unwrap()
    }

    #[test]
    fn test_appends_derived_column() {
        let data = Dataset::new(vec![Column::numeric("x", vec![Some(0.0), None, Some(3.0)])]).unwrap();
        let result = TransformEngine::new()
            .apply(&data, &["x"], DistributionTransform::Log1p)
            .unwrap();
        assert_eq!(result.dataset.column_names(), vec!["x", "x_log"]);
        assert_eq!(result.dataset.cell(0, "x_log").unwrap(), Cell::Number(0.0));
        assert_eq!(result.dataset.cell(1, "x_log").unwrap(), Cell::Missing);
        assert_eq!(result.dataset.cell(2, "x").unwrap(), Cell::Number(3.0));
        assert_eq!(result.summary.outputs["x"], "x_log");
    }

    #[test]
    fn test_sqrt_of_negative_is_domain_error() {
        let data = Dataset::new(vec![Column::numeric("x", vec![Some(4.0), Some(-2.0)])]).unwrap();
        let err = TransformEngine::new()
            .apply(&data, &["x"], DistributionTransform::Sqrt)
            .unwrap_err();
        match err {
            SieveError::DomainError { column, row, value, .. } => {
                assert_eq!(column, "x");
                assert_eq!(row, 1);
                assert_eq!(value, -2.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_box_cox_rejects_non_positive_after_shift() {
        let data = Dataset::new(vec![Column::numeric("x", vec![Some(1.0), Some(-1.0)])]).unwrap();
        let err = TransformEngine::new()
            .apply(&data, &["x"], DistributionTransform::BoxCox)
            .unwrap_err();
        assert!(matches!(err, SieveError::DomainError { row: 1, .. }));
    }

    #[test]
    fn test_yeo_johnson_accepts_negative() {
        let data = Dataset::new(vec![Column::numeric(
            "x",
            vec![Some(-5.0), Some(-1.0), Some(0.0), Some(2.0), Some(9.0)],
        )])
        .unwrap();
        let result = TransformEngine::new()
            .apply(&data, &["x"], DistributionTransform::YeoJohnson)
            .unwrap();
        assert!(result.summary.lambdas.contains_key("x"));
        assert_eq!(result.summary.shift, Some(1.0));
        assert_eq!(result.dataset.column("x_yeojohnson").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_power_transforms_reduce_skew() {
        let data = skewed();
        let before = data.column("income").unwrap().observed_numeric().unwrap();
        for transform in [DistributionTransform::BoxCox, DistributionTransform::YeoJohnson] {
            let result = TransformEngine::new().apply(&data, &["income"], transform).unwrap();
            let after = result
                .dataset
                .column(&transform.output_name("income"))
                .unwrap()
                .observed_numeric()
                .unwrap();
            assert!(skewness(&after).abs() < skewness(&before).abs(), "{transform}");
        }
    }

    #[test]
    fn test_constant_column_uses_unit_lambda() {
        let data = Dataset::new(vec![Column::numeric("c", vec![Some(3.0); 4])]).unwrap();
        let result = TransformEngine::new()
            .apply(&data, &["c"], DistributionTransform::BoxCox)
            .unwrap();
        assert_eq!(result.summary.lambdas["c"], 1.0);
        assert_eq!(result.dataset.cell(0, "c_boxcox").unwrap(), Cell::Number(3.0));
    }

    #[test]
    fn test_all_missing_column_has_no_lambda() {
        let data = Dataset::new(vec![
            Column::numeric("x", vec![None, None, None]),
            Column::numeric("y", vec![Some(1.0), Some(2.0), Some(3.0)]),
        ])
        .unwrap();
        for transform in [DistributionTransform::BoxCox, DistributionTransform::YeoJohnson] {
            let err = TransformEngine::new().apply(&data, &["x"], transform).unwrap_err();
            match err {
                SieveError::UndefinedStatistic { column, statistic } => {
                    assert_eq!(column, "x");
                    assert_eq!(statistic, "lambda");
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_existing_output_name_is_duplicate() {
        let data = Dataset::new(vec![
            Column::numeric("x", vec![Some(1.0)]),
            Column::numeric("x_square", vec![Some(1.0)]),
        ])
        .unwrap();
        let err = TransformEngine::new()
            .apply(&data, &["x"], DistributionTransform::Square)
            .unwrap_err();
        assert!(matches!(err, SieveError::DuplicateColumn(_)));
    }

    fn skewness(values: &[f64]) -> f64 {
        let mean = stats::mean(values).unwrap();
        let sd = stats::std_dev(values, stats::Denominator::Population).unwrap();
        values.iter().map(|v| ((v - mean) / sd).powi(3)).sum::<f64>() / values.len() as f64
    }
}
