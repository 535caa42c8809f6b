//! Typed column storage.

use serde::{Deserialize, Serialize};

use super::types::{Cell, ColumnKind};
use crate::error::{Result, SieveError};

/// Values of a column. `None` is the missing marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Boolean(Vec<Option<bool>>),
}

impl ColumnData {
    /// Number of cells, including missing ones.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    /// Check if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Semantic kind of the stored values.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::Boolean(_) => ColumnKind::Boolean,
        }
    }

    fn select(&self, positions: &[usize]) -> ColumnData {
        match self {
            ColumnData::Numeric(v) => ColumnData::Numeric(positions.iter().map(|&i| v[i]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(positions.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnData::Boolean(v) => ColumnData::Boolean(positions.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// A named column of one semantic kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Typed values.
    pub data: ColumnData,
}

impl Column {
    /// Create a column from typed data.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column.
    pub fn numeric(name: impl Into<String>, values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into_iter().collect()))
    }

    /// Create a categorical column.
    pub fn categorical<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    /// Create a boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self::new(name, ColumnData::Boolean(values.into_iter().collect()))
    }

    /// Get the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the semantic kind.
    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    /// Number of cells, including missing ones.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check whether the cell at `row` is missing.
    pub fn is_missing(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v[row].is_none(),
            ColumnData::Categorical(v) => v[row].is_none(),
            ColumnData::Boolean(v) => v[row].is_none(),
        }
    }

    /// Count missing cells.
    pub fn missing_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_missing(row)).count()
    }

    /// Get the cell at a row position.
    pub fn cell(&self, row: usize) -> Option<Cell> {
        if row >= self.len() {
            return None;
        }
        let cell = match &self.data {
            ColumnData::Numeric(v) => v[row].map(Cell::Number),
            ColumnData::Categorical(v) => v[row].clone().map(Cell::Text),
            ColumnData::Boolean(v) => v[row].map(Cell::Bool),
        };
        Some(cell.unwrap_or(Cell::Missing))
    }

    /// Overwrite one cell. The cell must match the column kind or be missing.
    pub fn set_cell(&mut self, row: usize, cell: Cell) -> Result<()> {
        if row >= self.len() {
            return Err(SieveError::InvalidParameter(format!(
                "Row {} out of range for column '{}' with {} rows",
                row,
                self.name,
                self.len()
            )));
        }
        match (&mut self.data, cell) {
            (ColumnData::Numeric(v), Cell::Number(x)) => v[row] = Some(x),
            (ColumnData::Categorical(v), Cell::Text(s)) => v[row] = Some(s),
            (ColumnData::Boolean(v), Cell::Bool(b)) => v[row] = Some(b),
            (ColumnData::Numeric(v), Cell::Missing) => v[row] = None,
            (ColumnData::Categorical(v), Cell::Missing) => v[row] = None,
            (ColumnData::Boolean(v), Cell::Missing) => v[row] = None,
            (_, other) => {
                return Err(SieveError::Conversion {
                    column: self.name.clone(),
                    row,
                    value: other.to_string(),
                    target: self.kind(),
                });
            }
        }
        Ok(())
    }

    /// Row positions of missing cells.
    pub fn missing_rows(&self) -> Vec<usize> {
        (0..self.len()).filter(|&row| self.is_missing(row)).collect()
    }

    /// Borrow numeric values, or fail with `InvalidColumnKind`.
    pub fn as_numeric(&self) -> Result<&[Option<f64>]> {
        match &self.data {
            ColumnData::Numeric(v) => Ok(v),
            _ => Err(self.kind_error(ColumnKind::Numeric)),
        }
    }

    /// Borrow categorical values, or fail with `InvalidColumnKind`.
    pub fn as_categorical(&self) -> Result<&[Option<String>]> {
        match &self.data {
            ColumnData::Categorical(v) => Ok(v),
            _ => Err(self.kind_error(ColumnKind::Categorical)),
        }
    }

    /// Borrow boolean values, or fail with `InvalidColumnKind`.
    pub fn as_boolean(&self) -> Result<&[Option<bool>]> {
        match &self.data {
            ColumnData::Boolean(v) => Ok(v),
            _ => Err(self.kind_error(ColumnKind::Boolean)),
        }
    }

    /// Mutably borrow numeric values.
    pub fn as_numeric_mut(&mut self) -> Result<&mut Vec<Option<f64>>> {
        let err = self.kind_error(ColumnKind::Numeric);
        match &mut self.data {
            ColumnData::Numeric(v) => Ok(v),
            _ => Err(err),
        }
    }

    /// Mutably borrow categorical values.
    pub fn as_categorical_mut(&mut self) -> Result<&mut Vec<Option<String>>> {
        let err = self.kind_error(ColumnKind::Categorical);
        match &mut self.data {
            ColumnData::Categorical(v) => Ok(v),
            _ => Err(err),
        }
    }

    /// Non-missing numeric values in row order.
    pub fn observed_numeric(&self) -> Result<Vec<f64>> {
        Ok(self.as_numeric()?.iter().filter_map(|v| *v).collect())
    }

    /// Text form of every cell, `None` where missing.
    pub fn text_values(&self) -> Vec<Option<String>> {
        (0..self.len())
            .map(|row| match self.cell(row) {
                Some(Cell::Missing) | None => None,
                Some(cell) => Some(cell.to_string()),
            })
            .collect()
    }

    /// Build the error reported when this column is used as the wrong kind.
    pub fn kind_error(&self, expected: ColumnKind) -> SieveError {
        SieveError::InvalidColumnKind {
            column: self.name.clone(),
            expected,
            found: self.kind(),
        }
    }

    /// Copy of this column restricted to the given row positions.
    pub fn select(&self, positions: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            data: self.data.select(positions),
        }
    }
}
