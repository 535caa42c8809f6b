//! Outlier detection and treatment.
//!
//! A detector turns a column's observed values into an [`OutlierBoundary`];
//! the [`OutlierEngine`] applies a treatment (trim or cap) using boundaries
//! fixed from the input dataset before any column is changed.

mod detectors;
mod engine;

pub use detectors::{IqrDetector, OutlierDetector, PercentileDetector, ZScoreDetector};
pub use engine::{Detection, OutlierEngine, OutlierResult, OutlierSummary, TrimAndCap};

use serde::{Deserialize, Serialize};

/// Inclusive range of acceptable values for one column.
///
/// Derived per call and returned to the caller; never stored on a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBoundary {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBoundary {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Check whether a value lies outside the boundary. Endpoints are inside.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Clamp a value to the boundary.
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.lower {
            self.lower
        } else if value > self.upper {
            self.upper
        } else {
            value
        }
    }

    /// Width of the boundary.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
