//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use sieve::{
    ColumnKind, DistributionTransform, FillMethod, ImputationStrategy, OutlierMethod,
    ScalingMethod, Treatment, Weighting,
};

/// Sieve: clean and transform tabular data
#[derive(Parser)]
#[command(name = "sieve")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Arguments shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the data file (CSV/TSV)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Columns to operate on, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// JSON file with engine options
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Write the resulting dataset as CSV
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write a JSON report of what changed
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

impl CommonArgs {
    /// Selected column names as string slices.
    pub fn column_refs(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show missingness, summary statistics and correlations
    Profile {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Fill missing values
    Impute {
        #[command(flatten)]
        common: CommonArgs,

        /// Imputer family (simple, knn, iterative)
        #[arg(short, long, default_value = "simple")]
        strategy: ImputationStrategy,

        /// Fill statistic for the simple imputer (mean, median, mode)
        #[arg(long)]
        method: Option<FillMethod>,

        /// Neighbors for the knn imputer
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,

        /// Donor weighting for the knn imputer (uniform, distance)
        #[arg(long)]
        weighting: Option<Weighting>,

        /// Iterations for the iterative imputer
        #[arg(long)]
        iterations: Option<usize>,
    },

    /// Detect and treat outliers
    Outliers {
        #[command(flatten)]
        common: CommonArgs,

        /// Boundary method (z_score, iqr, percentile)
        #[arg(short, long, default_value = "z_score")]
        method: OutlierMethod,

        /// Treatment (trim, cap)
        #[arg(short, long)]
        treatment: Option<Treatment>,

        /// Z-score threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// IQR multiplier
        #[arg(long)]
        multiplier: Option<f64>,

        /// Lower and upper percentile, e.g. 1,99
        #[arg(long, value_delimiter = ',', num_args = 2)]
        percentiles: Option<Vec<f64>>,

        /// Report boundaries and counts without changing the data
        #[arg(long)]
        detect_only: bool,
    },

    /// Append a reshaped copy of each column
    Transform {
        #[command(flatten)]
        common: CommonArgs,

        /// Transform (log, reciprocal, square, sqrt, boxcox, yeojohnson)
        #[arg(short = 'T', long)]
        transform: DistributionTransform,

        /// Shift added before Box-Cox and Yeo-Johnson
        #[arg(long)]
        shift: Option<f64>,
    },

    /// Rescale numeric columns
    Scale {
        #[command(flatten)]
        common: CommonArgs,

        /// Scaling method (standard, minmax, robust)
        #[arg(short, long, default_value = "standard")]
        method: ScalingMethod,
    },

    /// Encode categorical columns
    Encode {
        #[command(flatten)]
        common: CommonArgs,

        /// Encoding (ordinal, one-hot, label, bool-to-int)
        #[arg(short, long)]
        method: EncodingChoice,

        /// JSON object mapping category to value (ordinal only)
        #[arg(long, value_name = "JSON")]
        mapping: Option<PathBuf>,
    },

    /// Drop rows or columns, or change a column's kind
    Clean {
        #[command(subcommand)]
        action: CleanAction,
    },
}

#[derive(Subcommand)]
pub enum CleanAction {
    /// Remove the selected columns
    DropColumns {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Remove rows by original row id (0-based, header excluded)
    DropRows {
        #[command(flatten)]
        common: CommonArgs,

        /// Row ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        rows: Vec<usize>,
    },

    /// Remove rows where the selected column has a value
    DropValue {
        #[command(flatten)]
        common: CommonArgs,

        /// Value to match, compared as text
        #[arg(long)]
        value: String,
    },

    /// Remove rows missing any selected column (all columns when none given)
    CompleteCase {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Convert the selected columns to another kind
    Cast {
        #[command(flatten)]
        common: CommonArgs,

        /// Target kind (numeric, categorical, boolean)
        #[arg(long)]
        kind: ColumnKind,
    },
}

/// Encoder to run.
#[derive(Clone, Copy, Debug)]
pub enum EncodingChoice {
    Ordinal,
    OneHot,
    Label,
    BoolToInt,
}

impl std::str::FromStr for EncodingChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ordinal" => Ok(EncodingChoice::Ordinal),
            "one-hot" | "onehot" | "dummy" => Ok(EncodingChoice::OneHot),
            "label" => Ok(EncodingChoice::Label),
            "bool-to-int" | "bool" => Ok(EncodingChoice::BoolToInt),
            _ => Err(format!(
                "Unknown encoding: {}. Use ordinal, one-hot, label, or bool-to-int.",
                s
            )),
        }
    }
}

impl std::fmt::Display for EncodingChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingChoice::Ordinal => write!(f, "ordinal"),
            EncodingChoice::OneHot => write!(f, "one-hot"),
            EncodingChoice::Label => write!(f, "label"),
            EncodingChoice::BoolToInt => write!(f, "bool-to-int"),
        }
    }
}
