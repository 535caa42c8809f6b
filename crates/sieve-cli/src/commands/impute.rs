//! Impute command - fill missing values.

use sieve::{FillMethod, ImputationStrategy, Sieve, Weighting};

use super::{finish, load_config, load_dataset, require_columns, CommandResult};
use crate::cli::CommonArgs;

pub fn run(
    common: CommonArgs,
    strategy: ImputationStrategy,
    method: Option<FillMethod>,
    neighbors: Option<usize>,
    weighting: Option<Weighting>,
    iterations: Option<usize>,
) -> CommandResult {
    let mut config = load_config(&common)?;
    if let Some(method) = method {
        config = config.with_fill_method(method);
    }
    if let Some(k) = neighbors {
        config = config.with_neighbor_count(k);
    }
    if let Some(weighting) = weighting {
        config = config.with_neighbor_weighting(weighting);
    }
    if let Some(iterations) = iterations {
        config = config.with_iteration_count(iterations);
    }

    let sieve = Sieve::with_config(config)?;
    let dataset = load_dataset(&sieve, &common)?;
    let columns = require_columns(&common)?;

    let result = sieve.impute(&dataset, &columns, strategy)?;
    let title = format!(
        "Imputation ({}): {} value(s) filled",
        result.summary.strategy,
        result.summary.total_filled()
    );
    finish(&title, &result, &common)
}
