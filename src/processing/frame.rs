//! Conversion between [`DataSet`] and Polars [`DataFrame`]s.
//!
//! Aggregation runs as Polars lazy queries; loading, rendering and export stay on `DataSet`.
//! Timestamps cross the boundary as millisecond `Datetime` columns without a time zone.

use chrono::{DateTime, NaiveDateTime};
use polars::prelude::{self as pl, AnyValue, Column, DataFrame, TimeUnit};

use crate::error::{PipelineError, PipelineResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Build a [`DataFrame`] with one column per schema field, in schema order.
///
/// Fails with [`PipelineError::SchemaMismatch`] if a cell does not hold its field's type.
pub fn to_frame(dataset: &DataSet) -> PipelineResult<DataFrame> {
    let columns = dataset
        .schema
        .fields
        .iter()
        .map(|field| to_column(dataset, field))
        .collect::<PipelineResult<Vec<_>>>()?;
    Ok(DataFrame::new_infer_height(columns)?)
}

/// Read a collected [`DataFrame`] back into a [`DataSet`].
///
/// Integer columns of any width load as `Int64`, floats as `Float64`. Column types without a
/// [`DataType`] counterpart are rejected.
pub fn from_frame(frame: &DataFrame) -> PipelineResult<DataSet> {
    let columns = frame.columns();

    let fields = columns
        .iter()
        .map(|c| Ok(Field::new(c.name().as_str(), data_type_of(c.name().as_str(), c.dtype())?)))
        .collect::<PipelineResult<Vec<_>>>()?;

    let mut rows = vec![Vec::with_capacity(columns.len()); frame.height()];
    for column in columns {
        let series = column.as_materialized_series();
        for (idx, row) in rows.iter_mut().enumerate() {
            row.push(from_any_value(series.get(idx)?));
        }
    }

    Ok(DataSet::new(Schema::new(fields), rows))
}

fn to_column(dataset: &DataSet, field: &Field) -> PipelineResult<Column> {
    let values = dataset.column_values(&field.name).into_iter().flatten();
    let name = field.name.as_str().into();

    let column = match field.data_type {
        DataType::Int64 => Column::new(
            name,
            cells(field, values, |v| match v {
                Value::Int64(n) => Some(*n),
                _ => None,
            })?,
        ),
        DataType::Float64 => Column::new(name, cells(field, values, Value::as_f64)?),
        DataType::Bool => Column::new(
            name,
            cells(field, values, |v| match v {
                Value::Bool(b) => Some(*b),
                _ => None,
            })?,
        ),
        DataType::Timestamp => Column::new(
            name,
            cells(field, values, |v| match v {
                Value::Timestamp(ts) => Some(*ts),
                _ => None,
            })?,
        ),
        DataType::Utf8 => Column::new(
            name,
            cells(field, values, |v| match v {
                Value::Utf8(s) => Some(s.as_str()),
                _ => None,
            })?,
        ),
    };
    Ok(column)
}

/// Typed cells of one column; nulls pass through, any other mismatch is an error.
fn cells<'a, T>(
    field: &Field,
    values: impl Iterator<Item = &'a Value>,
    cell: impl Fn(&'a Value) -> Option<T>,
) -> PipelineResult<Vec<Option<T>>> {
    values
        .map(|value| {
            if value.is_null() {
                return Ok(None);
            }
            cell(value).map(Some).ok_or_else(|| PipelineError::SchemaMismatch {
                message: format!(
                    "column '{}' is {} but holds {value:?}",
                    field.name,
                    field.data_type.type_name()
                ),
            })
        })
        .collect()
}

fn data_type_of(name: &str, dtype: &pl::DataType) -> PipelineResult<DataType> {
    match dtype {
        pl::DataType::Int32 | pl::DataType::Int64 | pl::DataType::UInt32 | pl::DataType::UInt64 => {
            Ok(DataType::Int64)
        }
        pl::DataType::Float32 | pl::DataType::Float64 => Ok(DataType::Float64),
        pl::DataType::Boolean => Ok(DataType::Bool),
        pl::DataType::Datetime(_, _) => Ok(DataType::Timestamp),
        pl::DataType::String | pl::DataType::Null => Ok(DataType::Utf8),
        other => Err(PipelineError::SchemaMismatch {
            message: format!("column '{name}' has unsupported type {other}"),
        }),
    }
}

fn from_any_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Bool(v),
        AnyValue::Int32(v) => Value::Int64(v.into()),
        AnyValue::Int64(v) => Value::Int64(v),
        AnyValue::UInt32(v) => Value::Int64(v.into()),
        AnyValue::UInt64(v) => i64::try_from(v)
            .map(Value::Int64)
            .unwrap_or(Value::Float64(v as f64)),
        AnyValue::Float32(v) => Value::Float64(v.into()),
        AnyValue::Float64(v) => Value::Float64(v),
        AnyValue::String(v) => Value::Utf8(v.to_string()),
        AnyValue::StringOwned(v) => Value::Utf8(v.to_string()),
        AnyValue::Datetime(v, unit, _) => naive_timestamp(v, unit)
            .map(Value::Timestamp)
            .unwrap_or(Value::Null),
        other => Value::Utf8(other.to_string()),
    }
}

fn naive_timestamp(v: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(v),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(v),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(v)),
    };
    utc.map(|dt| dt.naive_utc())
}
