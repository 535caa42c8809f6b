//! Engine parameters and their validation.
//!
//! Every engine receives its parameters as an explicit value; nothing is
//! read from ambient state. `SieveConfig` collects all recognized options so
//! a caller (or the CLI) can load them from one JSON document.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SieveError};

/// Univariate fill statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMethod {
    #[default]
    Mean,
    Median,
    Mode,
}

/// How nearest-neighbor donors are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Plain average of the neighbors.
    #[default]
    Uniform,
    /// Weights proportional to inverse distance.
    Distance,
}

/// What to do with an outlier once detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Treatment {
    /// Drop every row with an outlier in any selected column.
    #[default]
    Trim,
    /// Clamp the offending cell to the nearest boundary.
    Cap,
}

/// Which imputer family to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationStrategy {
    /// Per-column mean, median or mode.
    #[default]
    Simple,
    /// Nearest-neighbor donors.
    Knn,
    /// Chained ridge regressions.
    Iterative,
}

/// Which outlier boundary to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    #[default]
    ZScore,
    Iqr,
    Percentile,
}

macro_rules! impl_text_enum {
    ($ty:ty, $($variant:ident => $text:literal),+ $(,)?) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $text),)+
                }
            }
        }

        impl FromStr for $ty {
            type Err = SieveError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().replace('-', "_").as_str() {
                    $($text => Ok(Self::$variant),)+
                    other => Err(SieveError::InvalidParameter(format!(
                        "unknown {} '{}'",
                        stringify!($ty),
                        other
                    ))),
                }
            }
        }
    };
}

impl_text_enum!(FillMethod, Mean => "mean", Median => "median", Mode => "mode");
impl_text_enum!(Weighting, Uniform => "uniform", Distance => "distance");
impl_text_enum!(Treatment, Trim => "trim", Cap => "cap");
impl_text_enum!(ImputationStrategy, Simple => "simple", Knn => "knn", Iterative => "iterative");
impl_text_enum!(OutlierMethod, ZScore => "z_score", Iqr => "iqr", Percentile => "percentile");

/// All recognized engine options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    /// Univariate imputation statistic.
    pub fill_method: FillMethod,
    /// Neighbors used by nearest-neighbor imputation.
    pub neighbor_count: usize,
    /// Donor weighting for nearest-neighbor imputation.
    pub neighbor_weighting: Weighting,
    /// Iterations of chained-equation imputation.
    pub iteration_count: usize,
    /// Ridge penalty for chained-equation regressions.
    pub ridge_alpha: f64,
    /// Expand categorical columns to indicators for neighbor distances.
    pub encode_categorical_distance: bool,
    /// Z-score magnitude above which a value is an outlier.
    pub z_threshold: f64,
    /// IQR fence multiplier.
    pub iqr_multiplier: f64,
    /// Lower percentile bound, 0-100.
    pub lower_percentile: f64,
    /// Upper percentile bound, 0-100.
    pub upper_percentile: f64,
    /// Outlier treatment.
    pub treatment: Treatment,
    /// Shift added before Box-Cox and Yeo-Johnson.
    pub box_cox_shift: f64,
    /// Missing-percentage ceiling for complete-case candidates.
    pub complete_case_max_pct: f64,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            fill_method: FillMethod::Mean,
            neighbor_count: 5,
            neighbor_weighting: Weighting::Uniform,
            iteration_count: 10,
            ridge_alpha: 1e-6,
            encode_categorical_distance: false,
            z_threshold: 3.0,
            iqr_multiplier: 1.5,
            lower_percentile: 1.0,
            upper_percentile: 99.0,
            treatment: Treatment::Trim,
            box_cox_shift: 1.0,
            complete_case_max_pct: 5.0,
        }
    }
}

impl SieveConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SieveConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SieveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check every option against its allowed range.
    pub fn validate(&self) -> Result<()> {
        validate_neighbor_count(self.neighbor_count)?;
        validate_iteration_count(self.iteration_count)?;
        validate_positive("z_threshold", self.z_threshold)?;
        validate_positive("iqr_multiplier", self.iqr_multiplier)?;
        validate_percentiles(self.lower_percentile, self.upper_percentile)?;
        if !self.ridge_alpha.is_finite() || self.ridge_alpha < 0.0 {
            return Err(SieveError::InvalidParameter(format!(
                "ridge_alpha must be a non-negative number, got {}",
                self.ridge_alpha
            )));
        }
        if !self.box_cox_shift.is_finite() {
            return Err(SieveError::InvalidParameter(format!(
                "box_cox_shift must be finite, got {}",
                self.box_cox_shift
            )));
        }
        if !(0.0..=100.0).contains(&self.complete_case_max_pct) {
            return Err(SieveError::InvalidParameter(format!(
                "complete_case_max_pct must be in [0, 100], got {}",
                self.complete_case_max_pct
            )));
        }
        Ok(())
    }

    pub fn with_fill_method(mut self, method: FillMethod) -> Self {
        self.fill_method = method;
        self
    }

    pub fn with_neighbor_count(mut self, k: usize) -> Self {
        self.neighbor_count = k;
        self
    }

    pub fn with_neighbor_weighting(mut self, weighting: Weighting) -> Self {
        self.neighbor_weighting = weighting;
        self
    }

    pub fn with_iteration_count(mut self, iterations: usize) -> Self {
        self.iteration_count = iterations;
        self
    }

    pub fn with_z_threshold(mut self, threshold: f64) -> Self {
        self.z_threshold = threshold;
        self
    }

    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    pub fn with_percentiles(mut self, lower: f64, upper: f64) -> Self {
        self.lower_percentile = lower;
        self.upper_percentile = upper;
        self
    }

    pub fn with_treatment(mut self, treatment: Treatment) -> Self {
        self.treatment = treatment;
        self
    }

    pub fn with_box_cox_shift(mut self, shift: f64) -> Self {
        self.box_cox_shift = shift;
        self
    }
}

pub(crate) fn validate_neighbor_count(k: usize) -> Result<()> {
    if k == 0 {
        return Err(SieveError::InvalidParameter(
            "neighbor_count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_iteration_count(iterations: usize) -> Result<()> {
    if iterations == 0 {
        return Err(SieveError::InvalidParameter(
            "iteration_count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SieveError::InvalidParameter(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

pub(crate) fn validate_percentiles(lower: f64, upper: f64) -> Result<()> {
    for (name, value) in [("lower_percentile", lower), ("upper_percentile", upper)] {
        if !(0.0..=100.0).contains(&value) {
            return Err(SieveError::InvalidParameter(format!(
                "{} must be in [0, 100], got {}",
                name, value
            )));
        }
    }
    if lower >= upper {
        return Err(SieveError::InvalidParameter(format!(
            "lower_percentile ({}) must be less than upper_percentile ({})",
            lower, upper
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SieveConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.neighbor_count, 5);
        assert_eq!(config.iteration_count, 10);
        assert_eq!(config.z_threshold, 3.0);
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            SieveConfig::from_json_str(r#"{"fill_method": "median", "treatment": "cap"}"#).unwrap();
        assert_eq!(config.fill_method, FillMethod::Median);
        assert_eq!(config.treatment, Treatment::Cap);
        assert_eq!(config.iqr_multiplier, 1.5);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(SieveConfig::new().with_neighbor_count(0).validate().is_err());
        assert!(SieveConfig::new().with_iteration_count(0).validate().is_err());
        assert!(SieveConfig::new().with_z_threshold(-1.0).validate().is_err());
        assert!(SieveConfig::new().with_percentiles(50.0, 10.0).validate().is_err());
        assert!(SieveConfig::new().with_percentiles(-1.0, 10.0).validate().is_err());
        assert!(SieveConfig::new().with_percentiles(0.1, 99.9).validate().is_ok());

        let err = SieveConfig::from_json_str(r#"{"neighbor_count": 0}"#).unwrap_err();
        assert!(matches!(err, SieveError::InvalidParameter(_)));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Median".parse::<FillMethod>().unwrap(), FillMethod::Median);
        assert_eq!("distance".parse::<Weighting>().unwrap(), Weighting::Distance);
        assert_eq!(Treatment::Cap.to_string(), "cap");
        assert!("bogus".parse::<Treatment>().is_err());
        assert_eq!("z-score".parse::<OutlierMethod>().unwrap(), OutlierMethod::ZScore);
        assert_eq!("KNN".parse::<ImputationStrategy>().unwrap(), ImputationStrategy::Knn);
    }
}
