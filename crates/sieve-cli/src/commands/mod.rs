//! CLI command implementations.

pub mod clean;
pub mod encode;
pub mod impute;
pub mod outliers;
pub mod profile;
pub mod scale;
pub mod transform;

use std::fs;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use sieve::{Dataset, Sieve, SieveConfig, TransformResult};
use tracing::debug;

use crate::cli::CommonArgs;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration from `--config`, or defaults.
pub fn load_config(common: &CommonArgs) -> Result<SieveConfig, sieve::SieveError> {
    match &common.config {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            SieveConfig::load(path)
        }
        None => Ok(SieveConfig::default()),
    }
}

/// Load the input file and print its shape.
pub fn load_dataset(sieve: &Sieve, common: &CommonArgs) -> Result<Dataset, sieve::SieveError> {
    let (dataset, source) = sieve.load(&common.file)?;
    println!(
        "{} {} ({} rows, {} columns, {})",
        "Loaded".cyan().bold(),
        source.file.white(),
        source.row_count,
        source.column_count,
        source.format
    );
    Ok(dataset)
}

/// Fail when a command that needs columns got none.
pub fn require_columns(common: &CommonArgs) -> Result<Vec<&str>, Box<dyn std::error::Error>> {
    if common.columns.is_empty() {
        return Err("No columns selected. Pass --columns a,b,c".into());
    }
    Ok(common.column_refs())
}

/// Print the changes of an engine call and write `--output` / `--report`.
pub fn finish<S: Serialize>(title: &str, result: &TransformResult<S>, common: &CommonArgs) -> CommandResult {
    println!();
    println!("{}", title.yellow().bold());
    if result.changes.is_empty() {
        println!("  {}", "No changes".dimmed());
    }
    for change in &result.changes {
        println!(
            "  {}: {} ({})",
            change.column.white().bold(),
            change.description,
            change.values_changed.to_string().cyan()
        );
    }
    if !result.affected_rows.is_empty() {
        println!(
            "  Rows affected: {}",
            result.affected_rows.len().to_string().cyan()
        );
    }
    println!(
        "  Result: {} rows, {} columns",
        result.dataset.row_count(),
        result.dataset.column_count()
    );

    if let Some(path) = &common.report {
        let report = serde_json::json!({
            "source": common.file,
            "affected_rows": result.affected_rows,
            "affected_columns": result.affected_columns,
            "changes": result.changes,
            "summary": result.summary,
        });
        write_report(path, &report)?;
    }

    match &common.output {
        Some(path) => {
            sieve::io::write_csv(&result.dataset, path)?;
            println!();
            println!("{} {}", "Wrote".green().bold(), path.display());
        }
        None => {
            println!();
            println!("Use {} to save the result.", "--output <FILE>".cyan());
        }
    }

    Ok(())
}

/// Write a value as pretty JSON.
pub fn write_report(path: &Path, value: &impl Serialize) -> CommandResult {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    println!("{} {}", "Report".green().bold(), path.display());
    Ok(())
}
