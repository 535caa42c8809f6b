//! Delimited-text reader with delimiter detection and column kind inference.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::source::SourceMetadata;
use crate::dataset::{Column, ColumnKind, Dataset};
use crate::error::{Result, SieveError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Tokens read as missing, compared case-insensitively.
const NULL_TOKENS: &[&str] = &["", "na", "n/a", "null", "none", "nil", "nan", ".", "-"];

/// Reader configuration.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Reads delimited files into typed datasets.
pub struct CsvReader {
    config: ReaderConfig,
}

impl CsvReader {
    /// Create a reader with default configuration.
    pub fn new() -> Self {
        Self {
            config: ReaderConfig::default(),
        }
    }

    /// Create a reader with custom configuration.
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a file, returning the dataset and its source metadata.
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let io_error = |source| SieveError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_error)?;
        let size_bytes = file.metadata().map_err(io_error)?.len();
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_error)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = self.delimiter_for(&contents)?;
        let dataset = self.parse(&contents, delimiter)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            delimiter,
            dataset.row_count(),
            dataset.column_count(),
        );
        info!(
            file = %metadata.file,
            rows = metadata.row_count,
            columns = metadata.column_count,
            format = %metadata.format,
            "Loaded dataset"
        );

        Ok((dataset, metadata))
    }

    /// Read in-memory bytes.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let delimiter = self.delimiter_for(bytes)?;
        self.parse(bytes, delimiter)
    }

    fn delimiter_for(&self, bytes: &[u8]) -> Result<u8> {
        match self.config.delimiter {
            Some(d) => Ok(d),
            None => detect_delimiter(bytes),
        }
    }

    fn parse(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = record?;
            if headers.is_empty() {
                headers = (0..record.len()).map(|i| format!("column_{}", i + 1)).collect();
            }
            if record.len() > headers.len() {
                return Err(SieveError::RaggedRow {
                    row: row_idx,
                    expected: headers.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            // Short rows are padded with missing cells.
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(SieveError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(SieveError::EmptyData("No data rows found".to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let raw: Vec<&str> = rows.iter().map(|row| row[index].as_str()).collect();
                build_column(name, &raw)
            })
            .collect();

        Dataset::new(columns)
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw field represents a missing value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_TOKENS.iter().any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Decide a column's kind from its raw fields.
///
/// Numeric when every non-missing field parses as a number, Boolean when
/// every one is `true` or `false`, otherwise Categorical. A column with no
/// non-missing fields is Numeric.
pub fn infer_kind(raw: &[&str]) -> ColumnKind {
    let mut present = raw.iter().map(|v| v.trim()).filter(|v| !is_null_token(v)).peekable();
    if present.peek().is_none() {
        return ColumnKind::Numeric;
    }
    let present: Vec<&str> = present.collect();
    if present.iter().all(|v| v.parse::<f64>().is_ok()) {
        ColumnKind::Numeric
    } else if present.iter().all(|v| parse_bool(v).is_some()) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Categorical
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn build_column(name: &str, raw: &[&str]) -> Column {
    let kind = infer_kind(raw);
    debug!(column = name, kind = %kind, "Inferred column kind");
    let present = raw.iter().map(|v| {
        let trimmed = v.trim();
        (!is_null_token(trimmed)).then_some(trimmed)
    });
    match kind {
        ColumnKind::Numeric => Column::numeric(name, present.map(|v| v.and_then(|s| s.parse().ok()))),
        ColumnKind::Boolean => Column::boolean(name, present.map(|v| v.and_then(parse_bool))),
        ColumnKind::Categorical => Column::categorical(name, present.map(|v| v.map(str::to_string))),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SieveError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Consistent counts dominate; tab wins ties since it rarely appears in values.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
