//! Sieve CLI - tabular data cleaning and transformation.

mod cli;
mod commands;

use clap::Parser;
use cli::{CleanAction, Cli, Commands};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries only command output.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "sieve=debug" } else { "sieve=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile { common } => commands::profile::run(common),

        Commands::Impute {
            common,
            strategy,
            method,
            neighbors,
            weighting,
            iterations,
        } => commands::impute::run(common, strategy, method, neighbors, weighting, iterations),

        Commands::Outliers {
            common,
            method,
            treatment,
            threshold,
            multiplier,
            percentiles,
            detect_only,
        } => commands::outliers::run(
            common,
            method,
            treatment,
            threshold,
            multiplier,
            percentiles,
            detect_only,
        ),

        Commands::Transform {
            common,
            transform,
            shift,
        } => commands::transform::run(common, transform, shift),

        Commands::Scale { common, method } => commands::scale::run(common, method),

        Commands::Encode {
            common,
            method,
            mapping,
        } => commands::encode::run(common, method, mapping),

        Commands::Clean { action } => match action {
            CleanAction::DropColumns { common } => commands::clean::drop_columns(common),
            CleanAction::DropRows { common, rows } => commands::clean::drop_rows(common, rows),
            CleanAction::DropValue { common, value } => commands::clean::drop_value(common, value),
            CleanAction::CompleteCase { common } => commands::clean::complete_case(common),
            CleanAction::Cast { common, kind } => commands::clean::cast(common, kind),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
