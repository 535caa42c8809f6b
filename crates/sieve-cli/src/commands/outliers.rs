//! Outliers command - detect, trim or cap.

use colored::Colorize;
use sieve::{OutlierMethod, Sieve, Treatment};

use super::{finish, load_config, load_dataset, require_columns, write_report, CommandResult};
use crate::cli::CommonArgs;

pub fn run(
    common: CommonArgs,
    method: OutlierMethod,
    treatment: Option<Treatment>,
    threshold: Option<f64>,
    multiplier: Option<f64>,
    percentiles: Option<Vec<f64>>,
    detect_only: bool,
) -> CommandResult {
    let mut config = load_config(&common)?;
    if let Some(treatment) = treatment {
        config = config.with_treatment(treatment);
    }
    if let Some(threshold) = threshold {
        config = config.with_z_threshold(threshold);
    }
    if let Some(multiplier) = multiplier {
        config = config.with_iqr_multiplier(multiplier);
    }
    if let Some(&[lower, upper]) = percentiles.as_deref() {
        config = config.with_percentiles(lower, upper);
    }

    let sieve = Sieve::with_config(config)?;
    let dataset = load_dataset(&sieve, &common)?;
    let columns = require_columns(&common)?;

    let detection = sieve.detect_outliers(&dataset, &columns, method)?;
    println!();
    println!("{}", format!("Boundaries ({}):", detection.method).yellow().bold());
    for (column, boundary) in &detection.boundaries {
        let count = detection.outlier_counts.get(column).copied().unwrap_or(0);
        let count = if count > 0 {
            count.to_string().red()
        } else {
            count.to_string().green()
        };
        println!(
            "  {}: [{:.4}, {:.4}]  outliers {}",
            column.white().bold(),
            boundary.lower,
            boundary.upper,
            count
        );
    }

    if detect_only {
        if let Some(path) = &common.report {
            println!();
            write_report(path, &detection)?;
        }
        return Ok(());
    }

    let result = sieve.treat_outliers(&dataset, &columns, method)?;
    let title = format!(
        "Treatment ({}): {} row(s) affected",
        result.summary.treatment, result.summary.rows_affected
    );
    finish(&title, &result, &common)
}
