//! Error types for the Sieve library.

use std::path::PathBuf;
use thiserror::Error;

use crate::dataset::ColumnKind;

/// Main error type for Sieve operations.
#[derive(Debug, Error)]
pub enum SieveError {
    /// A strategy was applied to a column of the wrong semantic kind.
    #[error("Column '{column}' is {found}, but this operation requires a {expected} column")]
    InvalidColumnKind {
        column: String,
        expected: ColumnKind,
        found: ColumnKind,
    },

    /// A statistic was requested over an empty or all-missing population.
    #[error("Cannot compute {statistic} for column '{column}': no non-missing values")]
    UndefinedStatistic { column: String, statistic: String },

    /// Mathematically invalid input to a transform.
    #[error("{transform} is undefined for value {value} in column '{column}' (row {row})")]
    DomainError {
        column: String,
        row: usize,
        value: f64,
        transform: String,
    },

    /// An ordinal mapping does not cover an observed category.
    #[error("Category '{category}' in column '{column}' has no mapping")]
    UnmappedCategory { column: String, category: String },

    /// Out-of-range threshold, percentile, iteration count, etc.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Referenced column does not exist.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column with this name already exists.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// Column length does not match the dataset row count.
    #[error("Column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A data row has more fields than the header.
    #[error("Row {row} has {found} fields, expected at most {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// The same row id appears twice in one dataset.
    #[error("Row id {0} appears more than once")]
    DuplicateRowId(usize),

    /// A value could not be converted to the requested kind.
    #[error("Cannot convert '{value}' in column '{column}' (row {row}) to {target}")]
    Conversion {
        column: String,
        row: usize,
        value: String,
        target: ColumnKind,
    },

    /// Empty file or no data to work on.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Sieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
