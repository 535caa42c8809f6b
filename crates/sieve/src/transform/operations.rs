//! Distribution-reshaping transforms that can be applied to a column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SieveError;

/// A column-wise transform producing a derived column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionTransform {
    /// `ln(x + 1)`, defined for x > -1.
    Log1p,
    /// `1 / (x + 1)`, undefined at x = -1.
    Reciprocal,
    /// `x²`.
    Square,
    /// `√x`, defined for x ≥ 0.
    Sqrt,
    /// Box-Cox with fitted λ, on shifted input that must be positive.
    BoxCox,
    /// Yeo-Johnson with fitted λ, on shifted input.
    YeoJohnson,
}

impl DistributionTransform {
    /// All transforms, in menu order.
    pub const ALL: [DistributionTransform; 6] = [
        DistributionTransform::Log1p,
        DistributionTransform::Reciprocal,
        DistributionTransform::Square,
        DistributionTransform::Sqrt,
        DistributionTransform::BoxCox,
        DistributionTransform::YeoJohnson,
    ];

    /// Suffix of the derived column name.
    pub fn suffix(&self) -> &'static str {
        match self {
            DistributionTransform::Log1p => "log",
            DistributionTransform::Reciprocal => "reciprocal",
            DistributionTransform::Square => "square",
            DistributionTransform::Sqrt => "sqrt",
            DistributionTransform::BoxCox => "boxcox",
            DistributionTransform::YeoJohnson => "yeojohnson",
        }
    }

    /// Name of the column derived from `source`.
    pub fn output_name(&self, source: &str) -> String {
        format!("{}_{}", source, self.suffix())
    }

    /// Whether the transform fits a λ per column.
    pub fn is_power(&self) -> bool {
        matches!(
            self,
            DistributionTransform::BoxCox | DistributionTransform::YeoJohnson
        )
    }

    /// Apply a closed-form transform to one value.
    ///
    /// `None` when the value is outside the transform's domain. Power
    /// transforms are applied by the engine once λ is known.
    pub fn apply_closed_form(&self, x: f64) -> Option<f64> {
        match self {
            DistributionTransform::Log1p => (x > -1.0).then(|| x.ln_1p()),
            DistributionTransform::Reciprocal => (x != -1.0).then(|| 1.0 / (x + 1.0)),
            DistributionTransform::Square => Some(x * x),
            DistributionTransform::Sqrt => (x >= 0.0).then(|| x.sqrt()),
            DistributionTransform::BoxCox | DistributionTransform::YeoJohnson => None,
        }
    }
}

impl fmt::Display for DistributionTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistributionTransform::Log1p => "log(x+1)",
            DistributionTransform::Reciprocal => "reciprocal",
            DistributionTransform::Square => "square",
            DistributionTransform::Sqrt => "square root",
            DistributionTransform::BoxCox => "Box-Cox",
            DistributionTransform::YeoJohnson => "Yeo-Johnson",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DistributionTransform {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "log" | "log1p" => Ok(DistributionTransform::Log1p),
            "reciprocal" => Ok(DistributionTransform::Reciprocal),
            "square" => Ok(DistributionTransform::Square),
            "sqrt" | "squareroot" => Ok(DistributionTransform::Sqrt),
            "boxcox" => Ok(DistributionTransform::BoxCox),
            "yeojohnson" => Ok(DistributionTransform::YeoJohnson),
            _ => Err(SieveError::InvalidParameter(format!(
                "Unknown transform '{}'. Use log, reciprocal, square, sqrt, boxcox or yeojohnson.",
                s
            ))),
        }
    }
}
