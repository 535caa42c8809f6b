//! Diagnostics reporting for before/after comparison of transforms.

mod report;
mod reporter;

pub use report::{
    CategoryVariation, ColumnSnapshot, DatasetProfile, DistributionComparison, Matrix,
    MissingSummary, NumericSummary, VarianceComparison,
};
pub use reporter::DiagnosticsReporter;
