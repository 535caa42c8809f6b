//! Tabular data model: typed columns, missing markers and row provenance.

mod column;
mod table;
mod types;

pub use column::{Column, ColumnData};
pub use table::Dataset;
pub use types::{Cell, ColumnKind};
