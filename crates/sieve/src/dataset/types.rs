//! Core type definitions for the tabular data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of a column, fixed at ingestion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Real-valued numbers.
    Numeric,
    /// Discrete text tokens.
    Categorical,
    /// True/false values.
    Boolean,
}

impl ColumnKind {
    /// Returns true if this kind holds numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Numeric => write!(f, "numeric"),
            ColumnKind::Categorical => write!(f, "categorical"),
            ColumnKind::Boolean => write!(f, "boolean"),
        }
    }
}

impl std::str::FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "numeric" | "number" | "float" | "int" => Ok(ColumnKind::Numeric),
            "categorical" | "category" | "string" | "object" => Ok(ColumnKind::Categorical),
            "boolean" | "bool" => Ok(ColumnKind::Boolean),
            _ => Err(format!(
                "Unknown column kind: {}. Use numeric, categorical, or boolean.",
                s
            )),
        }
    }
}

/// A single cell value, with an explicit missing marker.
///
/// `Missing` is only ever compared by kind; it has no position in any
/// ordering of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Check if this cell is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if the cell holds one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    /// Delimited-text form of the cell. Missing renders as an empty field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => Ok(()),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}
