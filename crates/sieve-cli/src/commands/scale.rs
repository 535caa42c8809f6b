//! Scale command - standardize, min-max or robust scaling.

use colored::Colorize;
use sieve::{ScalingMethod, Sieve};

use super::{finish, load_config, load_dataset, require_columns, CommandResult};
use crate::cli::CommonArgs;

pub fn run(common: CommonArgs, method: ScalingMethod) -> CommandResult {
    let sieve = Sieve::with_config(load_config(&common)?)?;
    let dataset = load_dataset(&sieve, &common)?;
    let columns = require_columns(&common)?;

    let result = sieve.scale(&dataset, &columns, method)?;
    for (column, params) in &result.summary.parameters {
        if params.degenerate {
            println!(
                "{} {} has zero spread; scaled to 0",
                "Note:".yellow().bold(),
                column
            );
        }
    }
    finish(&format!("Scaling ({})", method), &result, &common)
}
