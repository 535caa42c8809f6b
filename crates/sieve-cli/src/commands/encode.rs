//! Encode command - ordinal, one-hot, label and boolean encodings.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use sieve::{OrdinalMapping, Sieve};

use super::{finish, load_config, load_dataset, require_columns, CommandResult};
use crate::cli::{CommonArgs, EncodingChoice};

pub fn run(common: CommonArgs, method: EncodingChoice, mapping: Option<PathBuf>) -> CommandResult {
    let sieve = Sieve::with_config(load_config(&common)?)?;
    let dataset = load_dataset(&sieve, &common)?;
    let columns = require_columns(&common)?;
    let encoder = sieve.encoding();

    let result = match method {
        EncodingChoice::Ordinal => {
            let [column] = columns.as_slice() else {
                return Err("Ordinal encoding takes exactly one column".into());
            };
            let path = mapping.ok_or("Ordinal encoding requires --mapping <JSON>")?;
            let mapping = OrdinalMapping::from_json_str(&fs::read_to_string(&path)?)?;
            encoder.ordinal(&dataset, column, &mapping)?
        }
        EncodingChoice::OneHot => encoder.one_hot(&dataset, &columns)?,
        EncodingChoice::Label => encoder.label(&dataset, &columns)?,
        EncodingChoice::BoolToInt => encoder.bool_to_int(&dataset, &columns)?,
    };

    for (column, encoding) in &result.summary.columns {
        if let Some(reference) = &encoding.reference {
            println!(
                "{} {} reference category: {}",
                "Note:".yellow().bold(),
                column,
                reference.cyan()
            );
        }
    }
    finish(&format!("Encoding ({})", method), &result, &common)
}
