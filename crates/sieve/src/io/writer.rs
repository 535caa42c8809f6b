//! Delimited-text writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::dataset::Dataset;
use crate::error::{Result, SieveError};

/// Write a dataset as comma-separated text to a file.
pub fn write_csv(dataset: &Dataset, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SieveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_to(dataset, file)?;
    info!(path = %path.display(), rows = dataset.row_count(), "Wrote dataset");
    Ok(())
}

/// Write a dataset with a header row. Missing cells become empty fields.
pub fn write_to<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(dataset.column_names())?;

    let text: Vec<Vec<Option<String>>> = dataset.columns().iter().map(|c| c.text_values()).collect();
    for row in 0..dataset.row_count() {
        writer.write_record(text.iter().map(|column| column[row].as_deref().unwrap_or("")))?;
    }
    writer.flush().map_err(|e| SieveError::Csv(e.into()))?;
    Ok(())
}
