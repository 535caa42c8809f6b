//! The tabular dataset shared by every engine.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::column::Column;
use super::types::{Cell, ColumnKind};
use crate::error::{Result, SieveError};

/// An ordered sequence of named columns with a uniform row count.
///
/// Each row carries the identifier it had in the dataset it was loaded
/// from, so engines that drop rows can still report which original rows
/// were removed. Row ids only change through [`Dataset::reindex`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<Column>,
    row_ids: Vec<usize>,
}

/// Unchecked wire form; deserialization goes through [`Dataset::with_row_ids`].
#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<Column>,
    row_ids: Vec<usize>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = SieveError;

    fn try_from(raw: RawDataset) -> Result<Self> {
        Dataset::with_row_ids(raw.columns, raw.row_ids)
    }
}

impl Dataset {
    /// Create a dataset, checking row counts and name uniqueness.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        Self::with_row_ids(columns, (0..rows).collect())
    }

    /// Create a dataset with explicit original row ids. Ids must be unique.
    pub fn with_row_ids(columns: Vec<Column>, row_ids: Vec<usize>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(row_ids.len());
        if let Some(&duplicate) = row_ids.iter().find(|&&id| !seen.insert(id)) {
            return Err(SieveError::DuplicateRowId(duplicate));
        }
        let expected = row_ids.len();
        for (i, column) in columns.iter().enumerate() {
            if column.len() != expected {
                return Err(SieveError::LengthMismatch {
                    column: column.name.clone(),
                    expected,
                    found: column.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SieveError::DuplicateColumn(column.name.clone()));
            }
        }
        Ok(Self { columns, row_ids })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_ids.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Names of the columns of one kind, in order.
    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind() == kind)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Original row identifier of every row, in row order.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    /// Get the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| SieveError::ColumnNotFound(name.to_string()))
    }

    /// Get a mutable column by name.
    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| SieveError::ColumnNotFound(name.to_string()))
    }

    /// Check whether a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get a specific cell value.
    pub fn cell(&self, row: usize, column: &str) -> Result<Cell> {
        let col = self.column(column)?;
        col.cell(row).ok_or_else(|| {
            SieveError::InvalidParameter(format!(
                "Row {} out of range for {} rows",
                row,
                self.row_count()
            ))
        })
    }

    /// Resolve column names, failing on the first unknown one.
    pub fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Column>> {
        names.iter().map(|n| self.column(n.as_ref())).collect()
    }

    /// Resolve column names and require every one to be numeric.
    pub fn require_numeric<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Column>> {
        let columns = self.require_columns(names)?;
        for column in &columns {
            column.as_numeric()?;
        }
        Ok(columns)
    }

    /// Append a column.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        let index = self.columns.len();
        self.insert_column(index, column)
    }

    /// Insert a column at a position.
    pub fn insert_column(&mut self, index: usize, column: Column) -> Result<()> {
        if self.has_column(&column.name) {
            return Err(SieveError::DuplicateColumn(column.name));
        }
        // A dataset without columns takes its row count from the first column.
        if self.columns.is_empty() && self.row_ids.is_empty() {
            self.row_ids = (0..column.len()).collect();
        }
        self.check_length(&column)?;
        self.columns.insert(index.min(self.columns.len()), column);
        Ok(())
    }

    /// Remove a column by name and return it.
    pub fn remove_column(&mut self, name: &str) -> Result<Column> {
        let index = self
            .column_index(name)
            .ok_or_else(|| SieveError::ColumnNotFound(name.to_string()))?;
        Ok(self.columns.remove(index))
    }

    /// Replace a column in place, keeping its position.
    pub fn replace_column(&mut self, name: &str, column: Column) -> Result<()> {
        let index = self
            .column_index(name)
            .ok_or_else(|| SieveError::ColumnNotFound(name.to_string()))?;
        if column.name != name && self.has_column(&column.name) {
            return Err(SieveError::DuplicateColumn(column.name));
        }
        self.check_length(&column)?;
        self.columns[index] = column;
        Ok(())
    }

    /// Copy of the dataset restricted to the given row positions.
    ///
    /// Row ids travel with their rows. A repeated position is kept once.
    pub fn select_rows(&self, positions: &[usize]) -> Dataset {
        let mut seen = HashSet::with_capacity(positions.len());
        let positions: Vec<usize> = positions.iter().copied().filter(|&p| seen.insert(p)).collect();
        Dataset {
            columns: self.columns.iter().map(|c| c.select(&positions)).collect(),
            row_ids: positions.iter().map(|&i| self.row_ids[i]).collect(),
        }
    }

    /// Copy of the dataset keeping rows where `keep` is true.
    pub fn filter_rows(&self, keep: &[bool]) -> Dataset {
        let positions: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter(|(_, k)| **k)
            .map(|(i, _)| i)
            .collect();
        self.select_rows(&positions)
    }

    /// Copy of the dataset restricted to the named columns, in the given order.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<Dataset> {
        let columns = self
            .require_columns(names)?
            .into_iter()
            .cloned()
            .collect();
        Dataset::with_row_ids(columns, self.row_ids.clone())
    }

    /// Renumber rows 0..n, discarding the link to the original row ids.
    pub fn reindex(mut self) -> Dataset {
        self.row_ids = (0..self.row_ids.len()).collect();
        self
    }

    fn check_length(&self, column: &Column) -> Result<()> {
        if column.len() != self.row_count() {
            return Err(SieveError::LengthMismatch {
                column: column.name.clone(),
                expected: self.row_count(),
                found: column.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::numeric("age", vec![Some(25.0), Some(30.0), None, Some(40.0)]),
            Column::categorical("color", vec![Some("red"), Some("blue"), Some("red"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("b", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, SieveError::LengthMismatch { .. }));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::numeric("a", vec![Some(1.0)]),
            Column::numeric("a", vec![Some(2.0)]),
        ])
        .unwrap_err();
        assert!(matches!(err, SieveError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn test_rejects_duplicate_row_ids() {
        let columns = vec![Column::numeric("a", vec![Some(1.0), Some(2.0)])];
        let err = Dataset::with_row_ids(columns, vec![7, 7]).unwrap_err();
        assert!(matches!(err, SieveError::DuplicateRowId(7)));
    }

    #[test]
    fn test_deserialize_validates() {
        let data = sample();
        let json = serde_json::to_value(&data).unwrap();
        let back: Dataset = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, data);

        let mut duplicated = json.clone();
        duplicated["row_ids"] = serde_json::json!([0, 1, 1, 3]);
        assert!(serde_json::from_value::<Dataset>(duplicated).is_err());

        let mut short = json;
        short["row_ids"] = serde_json::json!([0]);
        assert!(serde_json::from_value::<Dataset>(short).is_err());
    }

    #[test]
    fn test_select_rows_ignores_repeated_positions() {
        let subset = sample().select_rows(&[2, 2, 0]);
        assert_eq!(subset.row_ids(), &[2, 0]);
        assert_eq!(subset.row_count(), 2);
    }

    #[test]
    fn test_select_rows_keeps_original_ids() {
        let data = sample();
        let subset = data.select_rows(&[1, 3]);
        assert_eq!(subset.row_count(), 2);
        assert_eq!(subset.row_ids(), &[1, 3]);
        assert_eq!(subset.cell(1, "age").unwrap(), Cell::Number(40.0));

        let nested = subset.select_rows(&[1]);
        assert_eq!(nested.row_ids(), &[3]);
        assert_eq!(nested.reindex().row_ids(), &[0]);
    }

    #[test]
    fn test_columns_of_kind() {
        let data = sample();
        assert_eq!(data.columns_of_kind(ColumnKind::Numeric), vec!["age"]);
        assert_eq!(data.columns_of_kind(ColumnKind::Categorical), vec!["color"]);
    }

    #[test]
    fn test_require_numeric() {
        let data = sample();
        assert!(data.require_numeric(&["age"]).is_ok());
        assert!(matches!(
            data.require_numeric(&["color"]),
            Err(SieveError::InvalidColumnKind { .. })
        ));
        assert!(matches!(
            data.require_numeric(&["missing"]),
            Err(SieveError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_add_and_replace_column() {
        let mut data = sample();
        data.add_column(Column::boolean("flag", vec![Some(true); 4])).unwrap();
        assert_eq!(data.column_names(), vec!["age", "color", "flag"]);

        let err = data
            .add_column(Column::boolean("short", vec![Some(true)]))
            .unwrap_err();
        assert!(matches!(err, SieveError::LengthMismatch { .. }));

        data.replace_column("age", Column::numeric("age", vec![Some(0.0); 4]))
            .unwrap();
        assert_eq!(data.column_index("age"), Some(0));
        assert_eq!(data.cell(2, "age").unwrap(), Cell::Number(0.0));
    }
}
