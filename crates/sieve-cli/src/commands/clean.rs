//! Clean subcommands - drop rows or columns, complete-case, cast.

use sieve::{ColumnKind, Sieve};

use super::{finish, load_config, load_dataset, require_columns, CommandResult};
use crate::cli::CommonArgs;

fn setup(common: &CommonArgs) -> Result<(Sieve, sieve::Dataset), Box<dyn std::error::Error>> {
    let sieve = Sieve::with_config(load_config(common)?)?;
    let dataset = load_dataset(&sieve, common)?;
    Ok((sieve, dataset))
}

pub fn drop_columns(common: CommonArgs) -> CommandResult {
    let (sieve, dataset) = setup(&common)?;
    let columns = require_columns(&common)?;
    let result = sieve.cleaner().drop_columns(&dataset, &columns)?;
    finish("Dropped columns", &result, &common)
}

pub fn drop_rows(common: CommonArgs, rows: Vec<usize>) -> CommandResult {
    let (sieve, dataset) = setup(&common)?;
    let result = sieve.cleaner().drop_rows(&dataset, &rows)?;
    finish("Dropped rows", &result, &common)
}

pub fn drop_value(common: CommonArgs, value: String) -> CommandResult {
    let (sieve, dataset) = setup(&common)?;
    let columns = require_columns(&common)?;
    let [column] = columns.as_slice() else {
        return Err("drop-value takes exactly one column".into());
    };
    let result = sieve.cleaner().drop_rows_by_value(&dataset, column, &value)?;
    finish(&format!("Dropped rows where {} = {}", column, value), &result, &common)
}

pub fn complete_case(common: CommonArgs) -> CommandResult {
    let (sieve, dataset) = setup(&common)?;
    let result = sieve.cleaner().complete_case(&dataset, &common.column_refs())?;
    finish("Complete-case rows", &result, &common)
}

pub fn cast(common: CommonArgs, kind: ColumnKind) -> CommandResult {
    let (sieve, mut dataset) = setup(&common)?;
    let columns = require_columns(&common)?;

    // Casts chain so several columns land in one output file.
    let mut changes = Vec::new();
    let mut last = None;
    for column in columns {
        let result = sieve.cleaner().cast_column(&dataset, column, kind)?;
        dataset = result.dataset.clone();
        changes.extend(result.changes.iter().cloned());
        last = Some(result);
    }
    let Some(mut result) = last else {
        return Ok(());
    };
    result.changes.clear();
    for change in changes {
        result.add_change(change);
    }
    finish(&format!("Cast to {}", kind), &result, &common)
}
