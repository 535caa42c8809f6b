//! Feature scaling: standardization, min-max and robust scaling.
//!
//! Statistics for every selected column are computed before any column is
//! rewritten. A column with zero spread is divided by 1 instead, so a
//! constant column scales to all zeros.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::Dataset;
use crate::error::{Result, SieveError};
use crate::result::{ColumnChange, TransformResult};
use crate::stats::{self, Denominator, RunningStats};

/// Linear rescaling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMethod {
    /// `(x - mean) / std` with the population standard deviation.
    #[default]
    Standard,
    /// `(x - min) / (max - min)`.
    MinMax,
    /// `(x - median) / IQR`.
    Robust,
}

impl fmt::Display for ScalingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalingMethod::Standard => write!(f, "standard"),
            ScalingMethod::MinMax => write!(f, "minmax"),
            ScalingMethod::Robust => write!(f, "robust"),
        }
    }
}

impl FromStr for ScalingMethod {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "standard" | "zscore" | "standardize" => Ok(ScalingMethod::Standard),
            "minmax" | "normalize" => Ok(ScalingMethod::MinMax),
            "robust" => Ok(ScalingMethod::Robust),
            _ => Err(SieveError::InvalidParameter(format!(
                "Unknown scaling method '{}'. Use standard, minmax or robust.",
                s
            ))),
        }
    }
}

/// Center and scale applied to one column: `(x - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleParameters {
    pub center: f64,
    pub scale: f64,
    /// True when the column had zero spread and `scale` fell back to 1.
    pub degenerate: bool,
}

impl ScaleParameters {
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }
}

/// Summary of a scaling call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingSummary {
    pub method: ScalingMethod,
    pub parameters: IndexMap<String, ScaleParameters>,
}

/// Result of a scaling call.
pub type ScalingResult = TransformResult<ScalingSummary>;

/// Rescales numeric columns in place (on a copy of the dataset).
pub struct ScalingEngine;

impl ScalingEngine {
    /// Create a new scaling engine.
    pub fn new() -> Self {
        Self
    }

    /// Compute the parameters one method would use for one column.
    pub fn fit(&self, column: &str, values: &[f64], method: ScalingMethod) -> Result<ScaleParameters> {
        let undefined = |statistic: &str| SieveError::UndefinedStatistic {
            column: column.to_string(),
            statistic: statistic.to_string(),
        };
        let (center, spread) = match method {
            ScalingMethod::Standard => {
                let running = RunningStats::from_values(values);
                let mean = running.mean().ok_or_else(|| undefined("mean"))?;
                (mean, running.std_dev(Denominator::Population).unwrap_or(0.0))
            }
            ScalingMethod::MinMax => {
                let running = RunningStats::from_values(values);
                let min = running.min().ok_or_else(|| undefined("min"))?;
                let max = running.max().ok_or_else(|| undefined("max"))?;
                (min, max - min)
            }
            ScalingMethod::Robust => {
                let sorted = stats::sorted(values);
                let median = stats::quantile_sorted(&sorted, 0.5).ok_or_else(|| undefined("median"))?;
                let q1 = stats::quantile_sorted(&sorted, 0.25).ok_or_else(|| undefined("quartiles"))?;
                let q3 = stats::quantile_sorted(&sorted, 0.75).ok_or_else(|| undefined("quartiles"))?;
                (median, q3 - q1)
            }
        };

        let degenerate = spread <= 0.0 || !spread.is_finite();
        Ok(ScaleParameters {
            center,
            scale: if degenerate { 1.0 } else { spread },
            degenerate,
        })
    }

    /// Scale every selected column. Missing cells stay missing.
    pub fn scale(&self, dataset: &Dataset, columns: &[&str], method: ScalingMethod) -> Result<ScalingResult> {
        let mut parameters = IndexMap::new();
        for column in dataset.require_numeric(columns)? {
            let fitted = self.fit(&column.name, &column.observed_numeric()?, method)?;
            if fitted.degenerate {
                warn!(column = %column.name, method = %method, "Zero spread; column scales to zero");
            }
            parameters.insert(column.name.clone(), fitted);
        }

        let mut output = dataset.clone();
        let mut changes = Vec::with_capacity(parameters.len());
        for (name, params) in &parameters {
            let values = output.column_mut(name)?.as_numeric_mut()?;
            let mut changed = 0;
            for value in values.iter_mut().flatten() {
                *value = params.apply(*value);
                changed += 1;
            }
            changes.push(ColumnChange {
                column: name.clone(),
                description: format!(
                    "{} scaling with center {} and scale {}",
                    method, params.center, params.scale
                ),
                values_changed: changed,
            });
        }

        info!(method = %method, columns = parameters.len(), "Scaling complete");

        let mut result = ScalingResult::new(output, ScalingSummary { method, parameters });
        for change in changes {
            result.add_change(change);
        }
        Ok(result)
    }
}

impl Default for ScalingEngine {
    fn default() -> Self {
        Self::new()
    }
}
