//! Loading entrypoints.
//!
//! Most callers should use [`ingest_csv_inferred_from_path`], which reads a headered CSV file into
//! an in-memory [`crate::types::DataSet`] and infers a type for every column. When the shape of
//! the input is known up front, [`ingest_csv_from_path`] parses cells into a provided
//! [`crate::types::Schema`] instead.

pub mod csv;
pub mod infer;

pub use self::csv::{
    ingest_csv_from_path, ingest_csv_from_reader, ingest_csv_inferred_from_path, ingest_csv_inferred_from_reader,
};
pub use infer::{infer_column_type, parse_timestamp};
