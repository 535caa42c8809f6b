//! Dataset maintenance: dropping columns and rows, complete-case analysis
//! and column kind conversion.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::{Column, ColumnData, ColumnKind, Dataset};
use crate::error::{Result, SieveError};
use crate::result::{ColumnChange, TransformResult};

/// Summary of a cleaning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Operation name.
    pub operation: String,
    pub rows_before: usize,
    pub rows_after: usize,
    /// Original ids of removed rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_rows: Vec<usize>,
    /// Names of removed columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_columns: Vec<String>,
}

/// Result of a cleaning call.
pub type CleaningResult = TransformResult<CleaningSummary>;

/// Row and column maintenance operations.
pub struct Cleaner;

impl Cleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self
    }

    /// Remove the named columns.
    pub fn drop_columns(&self, dataset: &Dataset, columns: &[&str]) -> Result<CleaningResult> {
        let mut output = dataset.clone();
        let mut removed = Vec::with_capacity(columns.len());
        for &name in columns {
            removed.push(output.remove_column(name)?);
        }

        let summary = CleaningSummary {
            operation: "drop_columns".to_string(),
            rows_before: dataset.row_count(),
            rows_after: output.row_count(),
            removed_rows: Vec::new(),
            removed_columns: removed.iter().map(|c| c.name.clone()).collect(),
        };
        info!(columns = ?summary.removed_columns, "Dropped columns");

        let mut result = CleaningResult::new(output, summary);
        for column in removed {
            result.add_change(ColumnChange {
                column: column.name.clone(),
                description: "Column removed".to_string(),
                values_changed: column.len(),
            });
        }
        Ok(result)
    }

    /// Remove rows by their original row id.
    pub fn drop_rows(&self, dataset: &Dataset, row_ids: &[usize]) -> Result<CleaningResult> {
        if let Some(unknown) = row_ids.iter().find(|id| !dataset.row_ids().contains(*id)) {
            return Err(SieveError::InvalidParameter(format!(
                "Row id {} is not present in the dataset",
                unknown
            )));
        }
        let keep: Vec<bool> = dataset.row_ids().iter().map(|id| !row_ids.contains(id)).collect();
        Ok(self.filter(dataset, &keep, "drop_rows"))
    }

    /// Remove rows whose value in `column` has the given text form.
    ///
    /// Missing cells never match.
    pub fn drop_rows_by_value(&self, dataset: &Dataset, column: &str, value: &str) -> Result<CleaningResult> {
        let text = dataset.column(column)?.text_values();
        let keep: Vec<bool> = text.iter().map(|t| t.as_deref() != Some(value)).collect();
        let mut result = self.filter(dataset, &keep, "drop_rows_by_value");
        let removed = result.summary.removed_rows.len();
        if removed > 0 {
            result.add_change(ColumnChange {
                column: column.to_string(),
                description: format!("Removed {} row(s) with value '{}'", removed, value),
                values_changed: removed,
            });
        }
        Ok(result)
    }

    /// Listwise deletion: drop rows missing any of the selected columns.
    ///
    /// An empty selection means every column.
    pub fn complete_case(&self, dataset: &Dataset, columns: &[&str]) -> Result<CleaningResult> {
        let selected = if columns.is_empty() {
            dataset.columns().iter().collect()
        } else {
            dataset.require_columns(columns)?
        };
        let keep: Vec<bool> = (0..dataset.row_count())
            .map(|row| selected.iter().all(|c| !c.is_missing(row)))
            .collect();

        let mut result = self.filter(dataset, &keep, "complete_case");
        for column in selected {
            let count = column.missing_count();
            if count > 0 {
                result.add_change(ColumnChange {
                    column: column.name.clone(),
                    description: format!("{} missing value(s) caused row removal", count),
                    values_changed: count,
                });
            }
        }
        Ok(result)
    }

    /// Convert a column to another kind, producing a new column.
    ///
    /// Any non-missing value that does not convert fails with `Conversion`.
    pub fn cast_column(&self, dataset: &Dataset, column: &str, kind: ColumnKind) -> Result<CleaningResult> {
        let source = dataset.column(column)?;
        let converted = convert(source, kind, dataset.row_ids())?;

        let mut output = dataset.clone();
        output.replace_column(column, converted)?;

        let summary = CleaningSummary {
            operation: "cast_column".to_string(),
            rows_before: dataset.row_count(),
            rows_after: dataset.row_count(),
            removed_rows: Vec::new(),
            removed_columns: Vec::new(),
        };
        info!(column, from = %source.kind(), to = %kind, "Converted column kind");

        let mut result = CleaningResult::new(output, summary);
        if source.kind() != kind {
            result.add_change(ColumnChange {
                column: column.to_string(),
                description: format!("Converted from {} to {}", source.kind(), kind),
                values_changed: source.len() - source.missing_count(),
            });
        }
        Ok(result)
    }

    fn filter(&self, dataset: &Dataset, keep: &[bool], operation: &str) -> CleaningResult {
        let output = dataset.filter_rows(keep);
        let removed: Vec<usize> = dataset
            .row_ids()
            .iter()
            .zip(keep)
            .filter(|(_, k)| !**k)
            .map(|(id, _)| *id)
            .collect();

        info!(operation, removed = removed.len(), "Removed rows");
        let summary = CleaningSummary {
            operation: operation.to_string(),
            rows_before: dataset.row_count(),
            rows_after: output.row_count(),
            removed_rows: removed.clone(),
            removed_columns: Vec::new(),
        };
        let mut result = CleaningResult::new(output, summary);
        for id in removed {
            result.mark_row(id);
        }
        result
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

fn convert(source: &Column, kind: ColumnKind, row_ids: &[usize]) -> Result<Column> {
    let name = source.name.clone();
    let fail = |row: usize, value: String| SieveError::Conversion {
        column: name.clone(),
        row: row_ids[row],
        value,
        target: kind,
    };

    let data = match (&source.data, kind) {
        (ColumnData::Numeric(_), ColumnKind::Numeric)
        | (ColumnData::Boolean(_), ColumnKind::Boolean) => source.data.clone(),
        (_, ColumnKind::Categorical) => ColumnData::Categorical(source.text_values()),
        (ColumnData::Categorical(values), ColumnKind::Numeric) => ColumnData::Numeric(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| match v {
                    None => Ok(None),
                    Some(text) => text
                        .trim()
                        .parse::<f64>()
                        .map(Some)
                        .map_err(|_| fail(row, text.clone())),
                })
                .collect::<Result<_>>()?,
        ),
        (ColumnData::Boolean(values), ColumnKind::Numeric) => ColumnData::Numeric(
            values.iter().map(|v| v.map(|b| if b { 1.0 } else { 0.0 })).collect(),
        ),
        (ColumnData::Categorical(values), ColumnKind::Boolean) => ColumnData::Boolean(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| match v {
                    None => Ok(None),
                    Some(text) => parse_bool(text)
                        .map(Some)
                        .ok_or_else(|| fail(row, text.clone())),
                })
                .collect::<Result<_>>()?,
        ),
        (ColumnData::Numeric(values), ColumnKind::Boolean) => ColumnData::Boolean(
            values
                .iter()
                .enumerate()
                .map(|(row, v)| match v {
                    None => Ok(None),
                    Some(x) if *x == 0.0 => Ok(Some(false)),
                    Some(x) if *x == 1.0 => Ok(Some(true)),
                    Some(x) => Err(fail(row, x.to_string())),
                })
                .collect::<Result<_>>()?,
        ),
    };

    Ok(Column::new(source.name.clone(), data))
}

/// Accepts the common spellings of true and false.
fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "t" | "y" => Some(true),
        "false" | "no" | "0" | "f" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn data() -> Dataset {
        Dataset::new(vec![
            Column::numeric("age", vec![Some(25.0), None, Some(40.0), Some(33.0)]),
            Column::categorical("city", vec![Some("Paris"), Some("Oslo"), None, Some("Oslo")]),
            Column::categorical("count", vec![Some("1"), Some("2"), Some("x"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_columns() {
        let result = Cleaner::new().drop_columns(&data(), &["city"]).unwrap();
        assert_eq!(result.dataset.column_names(), vec!["age", "count"]);
        assert_eq!(result.summary.removed_columns, vec!["city".to_string()]);
        assert!(Cleaner::new().drop_columns(&data(), &["nope"]).is_err());
    }

    #[test]
    fn test_drop_rows_by_original_id() {
        let cleaner = Cleaner::new();
        let first = cleaner.drop_rows(&data(), &[0]).unwrap();
        let second = cleaner.drop_rows(&first.dataset, &[2]).unwrap();
        assert_eq!(second.dataset.row_ids(), &[1, 3]);
        assert_eq!(second.summary.removed_rows, vec![2]);
        assert!(cleaner.drop_rows(&first.dataset, &[0]).is_err());
    }

    #[test]
    fn test_drop_rows_by_value() {
        let result = Cleaner::new().drop_rows_by_value(&data(), "city", "Oslo").unwrap();
        assert_eq!(result.dataset.row_ids(), &[0, 2]);
        let numeric = Cleaner::new().drop_rows_by_value(&data(), "age", "40").unwrap();
        assert_eq!(numeric.summary.removed_rows, vec![2]);
    }

    #[test]
    fn test_complete_case() {
        let result = Cleaner::new().complete_case(&data(), &["age", "city"]).unwrap();
        assert_eq!(result.dataset.row_ids(), &[0, 3]);
        assert_eq!(result.affected_rows.len(), 2);

        let all = Cleaner::new().complete_case(&data(), &[]).unwrap();
        assert_eq!(all.dataset.row_ids(), &[0]);
    }

    #[test]
    fn test_cast_reports_bad_value() {
        let err = Cleaner::new()
            .cast_column(&data(), "count", ColumnKind::Numeric)
            .unwrap_err();
        assert!(matches!(
            err,
            SieveError::Conversion { row: 2, ref value, .. } if value == "x"
        ));
    }

    #[test]
    fn test_cast_round_trip_kinds() {
        let cleaner = Cleaner::new();
        let text = cleaner.cast_column(&data(), "age", ColumnKind::Categorical).unwrap();
        assert_eq!(text.dataset.cell(0, "age").unwrap(), Cell::Text("25".into()));
        let back = cleaner
            .cast_column(&text.dataset, "age", ColumnKind::Numeric)
            .unwrap();
        assert_eq!(back.dataset.column("age").unwrap(), data().column("age").unwrap());
    }

    #[test]
    fn test_cast_to_boolean() {
        let data = Dataset::new(vec![
            Column::categorical("flag", vec![Some("Yes"), Some("no"), None]),
            Column::numeric("bit", vec![Some(1.0), Some(0.0), Some(2.0)]),
        ])
        .unwrap();
        let result = Cleaner::new().cast_column(&data, "flag", ColumnKind::Boolean).unwrap();
        assert_eq!(result.dataset.cell(0, "flag").unwrap(), Cell::Bool(true));
        assert_eq!(result.dataset.cell(2, "flag").unwrap(), Cell::Missing);
        assert!(Cleaner::new().cast_column(&data, "bit", ColumnKind::Boolean).is_err());
    }

    #[test]
    fn test_convert_always_yields_target_kind() {
        let sources = [
            Column::numeric("n", vec![Some(1.0), Some(0.0), None]),
            Column::categorical("c", vec![Some("1"), Some("0"), None]),
            Column::boolean("b", vec![Some(true), Some(false), None]),
        ];
        let kinds = [ColumnKind::Numeric, ColumnKind::Categorical, ColumnKind::Boolean];
        for source in &sources {
            for kind in kinds {
                let converted = convert(source, kind, &[0, 1, 2]).unwrap();
                assert_eq!(converted.kind(), kind, "{} -> {}", source.name, kind);
                assert_eq!(converted.missing_count(), 1);
            }
        }
    }
}
