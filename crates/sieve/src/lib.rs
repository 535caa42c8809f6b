//! Sieve: cleaning and transformation engine for tabular datasets.
//!
//! Sieve fills missing values, detects and treats outliers, reshapes skewed
//! distributions, rescales and encodes columns, and reports how each step
//! changed the data.
//!
//! # Core Principles
//!
//! - **Non-destructive**: engines take `&Dataset` and return a new one
//! - **Typed columns**: a column's kind is fixed when it is loaded
//! - **Row provenance**: every row keeps its original id through trims and drops
//!
//! # Example
//!
//! ```no_run
//! use sieve::{ImputationStrategy, OutlierMethod, Sieve};
//!
//! let sieve = Sieve::new();
//! let (data, _source) = sieve.load("survey.csv").unwrap();
//!
//! let filled = sieve.impute(&data, &["age"], ImputationStrategy::Knn).unwrap();
//! let treated = sieve
//!     .treat_outliers(&filled.dataset, &["age"], OutlierMethod::Iqr)
//!     .unwrap();
//! println!("Rows removed: {}", treated.summary.rows_affected);
//! ```

pub mod cleaning;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod encoding;
pub mod error;
pub mod imputation;
pub mod io;
pub mod outliers;
pub mod result;
pub mod scaling;
pub mod stats;
pub mod transform;

mod sieve;

pub use crate::sieve::Sieve;
pub use cleaning::{Cleaner, CleaningResult, CleaningSummary};
pub use config::{FillMethod, ImputationStrategy, OutlierMethod, SieveConfig, Treatment, Weighting};
pub use dataset::{Cell, Column, ColumnData, ColumnKind, Dataset};
pub use diagnostics::DiagnosticsReporter;
pub use encoding::{EncodingEngine, EncodingResult, OrdinalMapping};
pub use error::{Result, SieveError};
pub use imputation::{ImputationResult, Imputer, IterativeImputer, KnnImputer, SimpleImputer};
pub use io::{CsvReader, ReaderConfig, SourceMetadata};
pub use outliers::{OutlierBoundary, OutlierDetector, OutlierEngine, OutlierResult};
pub use result::{ColumnChange, TransformResult};
pub use scaling::{ScalingEngine, ScalingMethod, ScalingResult};
pub use transform::{DistributionResult, DistributionTransform, TransformEngine};
