//! CSV loading.
//!
//! Two entry points:
//!
//! - [`ingest_csv_from_path`]: schema-first, cells are parsed into the declared field types.
//! - [`ingest_csv_inferred_from_path`]: the schema is inferred from the data (see
//!   [`super::infer::infer_column_type`]).
//!
//! Both require a header row and reject records whose field count differs from the header.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

use super::infer::{infer_column_type, parse_bool, parse_timestamp};

fn open_reader(path: &Path) -> PipelineResult<csv::Reader<File>> {
    let file = File::open(path).map_err(|e| PipelineError::file_access(path, e))?;
    Ok(csv::ReaderBuilder::new().has_headers(true).from_reader(file))
}

/// Load a CSV file into an in-memory [`DataSet`] using `schema`.
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ).
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &Schema) -> PipelineResult<DataSet> {
    let mut rdr = open_reader(path.as_ref())?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Load CSV data from an existing CSV reader using `schema`.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(PipelineError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

/// Load a CSV file, inferring the type of every column from its contents.
///
/// All header columns are kept, in file order.
pub fn ingest_csv_inferred_from_path(path: impl AsRef<Path>) -> PipelineResult<DataSet> {
    let mut rdr = open_reader(path.as_ref())?;
    ingest_csv_inferred_from_reader(&mut rdr)
}

/// Load CSV data from an existing reader, inferring column types.
pub fn ingest_csv_inferred_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> PipelineResult<DataSet> {
    let headers = rdr.headers()?.clone();
    let records = rdr.records().collect::<Result<Vec<_>, _>>()?;

    let fields: Vec<Field> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let data_type = infer_column_type(records.iter().map(|r| r.get(idx).unwrap_or("")));
            Field::new(name.trim(), data_type)
        })
        .collect();
    let schema = Schema::new(fields);
    debug!(columns = schema.fields.len(), records = records.len(), "inferred csv schema");

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        let user_row = row_idx0 + 2;
        let row = schema
            .fields
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                parse_typed_value(user_row, &field.name, field.data_type, record.get(idx).unwrap_or(""))
            })
            .collect::<PipelineResult<Vec<_>>>()?;
        rows.push(row);
    }

    Ok(DataSet::new(schema, rows))
}

/// Parse a single cell; empty cells become [`Value::Null`].
pub(crate) fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: DataType,
    raw: &str,
) -> PipelineResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| PipelineError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::Timestamp => parse_timestamp(trimmed)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_error("expected date (YYYY-MM-DD[ HH:MM:SS])".to_string())),
    }
}
