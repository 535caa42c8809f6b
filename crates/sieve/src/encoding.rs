//! Categorical encoding: custom ordinal maps, one-hot indicators, integer
//! labels and boolean-to-integer conversion.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::{Cell, Column, ColumnData, Dataset};
use crate::error::{Result, SieveError};
use crate::result::{ColumnChange, TransformResult};

/// Explicit category → value mapping for ordinal encoding.
///
/// Numeric targets produce a numeric column, text targets a categorical one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrdinalMapping {
    Numeric(IndexMap<String, f64>),
    Text(IndexMap<String, String>),
}

impl OrdinalMapping {
    /// Parse a JSON object such as `{"low": 1, "medium": 2, "high": 3}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn target(&self, category: &str) -> Option<Cell> {
        match self {
            OrdinalMapping::Numeric(map) => map.get(category).copied().map(Cell::Number),
            OrdinalMapping::Text(map) => map.get(category).cloned().map(Cell::Text),
        }
    }

    fn empty_column(&self, name: &str, rows: usize) -> Column {
        match self {
            OrdinalMapping::Numeric(_) => Column::numeric(name, vec![None; rows]),
            OrdinalMapping::Text(_) => Column::categorical(name, vec![None::<String>; rows]),
        }
    }
}

/// Encoding method, for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingMethod {
    Ordinal,
    OneHot,
    Label,
    BoolToInt,
}

impl fmt::Display for EncodingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingMethod::Ordinal => write!(f, "ordinal"),
            EncodingMethod::OneHot => write!(f, "one-hot"),
            EncodingMethod::Label => write!(f, "label"),
            EncodingMethod::BoolToInt => write!(f, "bool-to-int"),
        }
    }
}

/// How one source column was encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnEncoding {
    /// Columns that replaced the source column.
    pub outputs: Vec<String>,
    /// Category → assigned value.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub codes: IndexMap<String, Cell>,
    /// Dropped reference category (one-hot only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Summary of an encoding call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodingSummary {
    pub method: EncodingMethod,
    pub columns: IndexMap<String, ColumnEncoding>,
}

/// Result of an encoding call.
pub type EncodingResult = TransformResult<EncodingSummary>;

/// Encodes categorical columns.
pub struct EncodingEngine;

impl EncodingEngine {
    /// Create a new encoding engine.
    pub fn new() -> Self {
        Self
    }

    /// Replace a categorical column's values through an explicit mapping.
    ///
    /// Every observed category must be mapped; missing cells stay missing.
    pub fn ordinal(&self, dataset: &Dataset, column: &str, mapping: &OrdinalMapping) -> Result<EncodingResult> {
        let source = dataset.column(column)?;
        let values = source.as_categorical()?;

        let mut encoded = mapping.empty_column(column, values.len());
        let mut codes = IndexMap::new();
        let mut changed = 0;
        for (row, value) in values.iter().enumerate() {
            let Some(category) = value else { continue };
            let target = mapping
                .target(category)
                .ok_or_else(|| SieveError::UnmappedCategory {
                    column: column.to_string(),
                    category: category.clone(),
                })?;
            codes.entry(category.clone()).or_insert_with(|| target.clone());
            encoded.set_cell(row, target)?;
            changed += 1;
        }

        let mut output = dataset.clone();
        output.replace_column(column, encoded)?;

        let mut summary = EncodingSummary {
            method: EncodingMethod::Ordinal,
            columns: IndexMap::new(),
        };
        summary.columns.insert(
            column.to_string(),
            ColumnEncoding {
                outputs: vec![column.to_string()],
                codes,
                reference: None,
            },
        );

        info!(column, categories = summary.columns[column].codes.len(), "Ordinal encoding complete");
        let mut result = EncodingResult::new(output, summary);
        result.add_change(ColumnChange {
            column: column.to_string(),
            description: "Mapped categories to ordinal values".to_string(),
            values_changed: changed,
        });
        Ok(result)
    }

    /// Replace each column with one indicator per category except the first
    /// in sorted order.
    ///
    /// Indicators are named `<column>_<category>` and take the source
    /// column's position. A row missing the category gets missing indicators.
    pub fn one_hot(&self, dataset: &Dataset, columns: &[&str]) -> Result<EncodingResult> {
        let mut output = dataset.clone();
        let mut summary = EncodingSummary {
            method: EncodingMethod::OneHot,
            columns: IndexMap::new(),
        };
        let mut changes = Vec::new();

        for &name in columns {
            let source = dataset.column(name)?;
            let values = source.as_categorical()?;

            let mut categories: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
            categories.sort_unstable();
            categories.dedup();

            let reference = categories.first().map(|c| c.to_string());
            let indicators: Vec<Column> = categories
                .iter()
                .skip(1)
                .map(|category| {
                    Column::boolean(
                        format!("{}_{}", name, category),
                        values.iter().map(|v| v.as_deref().map(|v| v == *category)),
                    )
                })
                .collect();

            let position = output
                .column_index(name)
                .ok_or_else(|| SieveError::ColumnNotFound(name.to_string()))?;
            output.remove_column(name)?;
            let outputs: Vec<String> = indicators.iter().map(|c| c.name.clone()).collect();
            for (offset, indicator) in indicators.into_iter().enumerate() {
                output.insert_column(position + offset, indicator)?;
            }

            debug!(column = name, indicators = outputs.len(), reference = ?reference, "One-hot encoded");
            changes.push(ColumnChange {
                column: name.to_string(),
                description: format!(
                    "Expanded into {} indicator column(s), reference '{}'",
                    outputs.len(),
                    reference.as_deref().unwrap_or("")
                ),
                values_changed: outputs.len(),
            });
            summary.columns.insert(
                name.to_string(),
                ColumnEncoding {
                    outputs,
                    codes: IndexMap::new(),
                    reference,
                },
            );
        }

        info!(columns = columns.len(), "One-hot encoding complete");
        let mut result = EncodingResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        Ok(result)
    }

    /// Replace each column with integer codes in first-encountered order.
    ///
    /// Codes depend on row order, so they are not comparable across datasets.
    pub fn label(&self, dataset: &Dataset, columns: &[&str]) -> Result<EncodingResult> {
        let mut output = dataset.clone();
        let mut summary = EncodingSummary {
            method: EncodingMethod::Label,
            columns: IndexMap::new(),
        };
        let mut changes = Vec::new();

        for &name in columns {
            let values = dataset.column(name)?.as_categorical()?;
            let mut codes: IndexMap<String, usize> = IndexMap::new();
            let encoded: Vec<Option<f64>> = values
                .iter()
                .map(|value| {
                    value.as_ref().map(|category| {
                        let next = codes.len();
                        *codes.entry(category.clone()).or_insert(next) as f64
                    })
                })
                .collect();
            let changed = encoded.iter().flatten().count();
            output.replace_column(name, Column::numeric(name, encoded))?;

            changes.push(ColumnChange {
                column: name.to_string(),
                description: format!("Encoded {} categories as integer labels", codes.len()),
                values_changed: changed,
            });
            summary.columns.insert(
                name.to_string(),
                ColumnEncoding {
                    outputs: vec![name.to_string()],
                    codes: codes
                        .into_iter()
                        .map(|(category, code)| (category, Cell::Number(code as f64)))
                        .collect(),
                    reference: None,
                },
            );
        }

        info!(columns = columns.len(), "Label encoding complete");
        let mut result = EncodingResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        Ok(result)
    }

    /// Convert boolean columns to numeric 0/1.
    pub fn bool_to_int(&self, dataset: &Dataset, columns: &[&str]) -> Result<EncodingResult> {
        let mut output = dataset.clone();
        let mut summary = EncodingSummary {
            method: EncodingMethod::BoolToInt,
            columns: IndexMap::new(),
        };
        let mut changes = Vec::new();

        for &name in columns {
            let column = dataset.column(name)?;
            let ColumnData::Boolean(values) = &column.data else {
                return Err(column.kind_error(crate::dataset::ColumnKind::Boolean));
            };
            let encoded: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.map(|b| if b { 1.0 } else { 0.0 }))
                .collect();
            let changed = encoded.iter().flatten().count();
            output.replace_column(name, Column::numeric(name, encoded))?;

            changes.push(ColumnChange {
                column: name.to_string(),
                description: "Converted booleans to 0/1".to_string(),
                values_changed: changed,
            });
            summary.columns.insert(
                name.to_string(),
                ColumnEncoding {
                    outputs: vec![name.to_string()],
                    codes: IndexMap::from([
                        ("false".to_string(), Cell::Number(0.0)),
                        ("true".to_string(), Cell::Number(1.0)),
                    ]),
                    reference: None,
                },
            );
        }

        info!(columns = columns.len(), "Boolean encoding complete");
        let mut result = EncodingResult::new(output, summary);
        for change in changes {
            result.add_change(change);
        }
        Ok(result)
    }
}

impl Default for EncodingEngine {
    fn default() -> Self {
        Self::new()
    }
}
