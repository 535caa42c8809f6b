//! Transform command - append reshaped copies of columns.

use colored::Colorize;
use sieve::{DistributionTransform, Sieve};

use super::{finish, load_config, load_dataset, require_columns, CommandResult};
use crate::cli::CommonArgs;

pub fn run(common: CommonArgs, transform: DistributionTransform, shift: Option<f64>) -> CommandResult {
    let mut config = load_config(&common)?;
    if let Some(shift) = shift {
        config = config.with_box_cox_shift(shift);
    }

    let sieve = Sieve::with_config(config)?;
    let dataset = load_dataset(&sieve, &common)?;
    let columns = require_columns(&common)?;

    let result = sieve.transform(&dataset, &columns, transform)?;
    if !result.summary.lambdas.is_empty() {
        println!();
        println!("{}", "Fitted lambda:".yellow().bold());
        for (column, lambda) in &result.summary.lambdas {
            println!("  {}: {:.4}", column.white().bold(), lambda);
        }
    }
    finish(&format!("Transform ({})", transform), &result, &common)
}
