//! Profile command - missingness, summary statistics and correlations.

use colored::Colorize;
use sieve::{ColumnKind, Sieve};

use super::{load_config, load_dataset, write_report, CommandResult};
use crate::cli::CommonArgs;

pub fn run(common: CommonArgs) -> CommandResult {
    let sieve = Sieve::with_config(load_config(&common)?)?;
    let mut dataset = load_dataset(&sieve, &common)?;
    if !common.columns.is_empty() {
        dataset = dataset.select_columns(&common.columns)?;
    }

    let profile = sieve.profile(&dataset)?;
    println!();
    println!("{}", "Columns:".yellow().bold());
    for column in &profile.columns {
        let missing = if column.missing > 0 {
            format!("{} missing ({:.1}%)", column.missing, column.missing_percentage).red()
        } else {
            "complete".green()
        };
        print!("  {} [{}] {}", column.name.white().bold(), column.kind, missing);
        match column.kind {
            ColumnKind::Numeric => {
                if let (Some(mean), Some(median)) = (column.mean, column.median) {
                    print!("  mean {:.4}  median {:.4}", mean, median);
                }
                if let Some(variance) = column.variance {
                    print!("  variance {:.4}", variance);
                }
            }
            _ => {
                if !column.modes.is_empty() {
                    print!("  mode {}", column.modes.join(", "));
                }
            }
        }
        println!();
    }

    let correlation = sieve.diagnostics().correlation(&dataset);
    if correlation.size() > 1 {
        println!();
        println!("{}", "Correlation:".yellow().bold());
        print!("  {:>12}", "");
        for name in &correlation.columns {
            print!(" {:>12}", truncate(name));
        }
        println!();
        for (name, row) in correlation.columns.iter().zip(&correlation.values) {
            print!("  {:>12}", truncate(name));
            for value in row {
                match value {
                    Some(v) => print!(" {:>12.4}", v),
                    None => print!(" {:>12}", "-"),
                }
            }
            println!();
        }
    }

    let candidates = sieve.complete_case_candidates(&dataset);
    if !candidates.is_empty() {
        println!();
        println!(
            "Complete-case candidates (missing <= {}%): {}",
            sieve.config().complete_case_max_pct,
            candidates.join(", ").cyan()
        );
    }

    if let Some(path) = &common.report {
        let report = serde_json::json!({
            "source": common.file,
            "profile": profile,
            "correlation": correlation,
            "covariance": sieve.diagnostics().covariance(&dataset),
            "complete_case_candidates": candidates,
        });
        println!();
        write_report(path, &report)?;
    }

    Ok(())
}

fn truncate(name: &str) -> String {
    if name.chars().count() > 12 {
        name.chars().take(11).chain(std::iter::once('…')).collect()
    } else {
        name.to_string()
    }
}
