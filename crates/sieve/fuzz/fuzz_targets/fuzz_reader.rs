//! Fuzz target for the delimited-text reader.
//!
//! Arbitrary bytes must either load into a dataset whose columns all have
//! the row count, or fail with an error. Never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::CsvReader;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(dataset) = CsvReader::new().read_bytes(data) {
        for column in dataset.columns() {
            assert_eq!(column.len(), dataset.row_count());
        }
        assert_eq!(dataset.row_ids().len(), dataset.row_count());
    }
});
