//! CSV boundary: delimited text in, typed `Dataset` out, and back again.

mod reader;
mod source;
mod writer;

pub use reader::{infer_kind, is_null_token, CsvReader, ReaderConfig};
pub use source::SourceMetadata;
pub use writer::{write_csv, write_to};
