//! Boundary strategies: z-score, interquartile range and percentile.

use super::OutlierBoundary;
use crate::config;
use crate::error::{Result, SieveError};
use crate::stats::{self, Denominator, RunningStats};

/// Turns a column's non-missing values into an outlier boundary.
pub trait OutlierDetector: Send + Sync {
    /// Short name used in reports and logs.
    fn method(&self) -> &'static str;

    /// Compute the boundary for one column from its observed values.
    fn boundary(&self, column: &str, values: &[f64]) -> Result<OutlierBoundary>;
}

fn undefined(column: &str, statistic: &str) -> SieveError {
    SieveError::UndefinedStatistic {
        column: column.to_string(),
        statistic: statistic.to_string(),
    }
}

/// `mean ± threshold · std`, using the sample standard deviation.
///
/// A value is an outlier when its z-score magnitude exceeds the threshold.
#[derive(Debug, Clone, Copy)]
pub struct ZScoreDetector {
    threshold: f64,
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

impl ZScoreDetector {
    pub fn new(threshold: f64) -> Result<Self> {
        config::validate_positive("z_threshold", threshold)?;
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl OutlierDetector for ZScoreDetector {
    fn method(&self) -> &'static str {
        "z_score"
    }

    fn boundary(&self, column: &str, values: &[f64]) -> Result<OutlierBoundary> {
        let running = RunningStats::from_values(values);
        let mean = running.mean().ok_or_else(|| undefined(column, "mean"))?;
        // A single observation has no spread.
        let std = running.std_dev(Denominator::Sample).unwrap_or(0.0);
        Ok(OutlierBoundary::new(
            mean - self.threshold * std,
            mean + self.threshold * std,
        ))
    }
}

/// `[Q1 − k·IQR, Q3 + k·IQR]` with linearly interpolated quartiles.
#[derive(Debug, Clone, Copy)]
pub struct IqrDetector {
    multiplier: f64,
}

impl Default for IqrDetector {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl IqrDetector {
    pub fn new(multiplier: f64) -> Result<Self> {
        config::validate_positive("iqr_multiplier", multiplier)?;
        Ok(Self { multiplier })
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

impl OutlierDetector for IqrDetector {
    fn method(&self) -> &'static str {
        "iqr"
    }

    fn boundary(&self, column: &str, values: &[f64]) -> Result<OutlierBoundary> {
        let (q1, q3) = stats::quartiles(values).ok_or_else(|| undefined(column, "quartiles"))?;
        let iqr = q3 - q1;
        Ok(OutlierBoundary::new(
            q1 - self.multiplier * iqr,
            q3 + self.multiplier * iqr,
        ))
    }
}

/// `[P_lower, P_upper]`, independent of mean and variance.
///
/// Percentiles are given on the 0-100 scale.
#[derive(Debug, Clone, Copy)]
pub struct PercentileDetector {
    lower: f64,
    upper: f64,
}

impl Default for PercentileDetector {
    fn default() -> Self {
        Self {
            lower: 1.0,
            upper: 99.0,
        }
    }
}

impl PercentileDetector {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        config::validate_percentiles(lower, upper)?;
        Ok(Self { lower, upper })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl OutlierDetector for PercentileDetector {
    fn method(&self) -> &'static str {
        "percentile"
    }

    fn boundary(&self, column: &str, values: &[f64]) -> Result<OutlierBoundary> {
        let sorted = stats::sorted(values);
        let lower = stats::quantile_sorted(&sorted, self.lower / 100.0)
            .ok_or_else(|| undefined(column, "percentile"))?;
        let upper = stats::quantile_sorted(&sorted, self.upper / 100.0)
            .ok_or_else(|| undefined(column, "percentile"))?;
        Ok(OutlierBoundary::new(lower, upper))
    }
}
