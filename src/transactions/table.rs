//! Read-only handle over a loaded transactions [`DataSet`].

use polars::prelude::{self as pl, col, DataFrame, IntoLazy, LazyFrame};

use crate::error::{PipelineError, PipelineResult};
use crate::ingestion::parse_timestamp;
use crate::processing::{to_frame, with_column};
use crate::types::{DataSet, DataType, Field, Value};

pub const ACCOUNT_ID: &str = "AccountID";
pub const TRANSACTION_AMOUNT: &str = "TransactionAmount";
pub const TRANSACTION_TYPE: &str = "TransactionType";
pub const TRANSACTION_DATE: &str = "TransactionDate";

/// A loaded transactions table with its four required columns resolved.
///
/// Construction normalizes `TransactionAmount` to a numeric column and `TransactionDate` to a
/// timestamp column; cells that cannot be converted fail with
/// [`PipelineError::ParseError`]. Columns other than the four required ones are kept and ignored.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    data: DataSet,
    frame: DataFrame,
}

impl TransactionTable {
    pub fn new(data: DataSet) -> PipelineResult<Self> {
        for column in [ACCOUNT_ID, TRANSACTION_AMOUNT, TRANSACTION_TYPE, TRANSACTION_DATE] {
            require_column(&data, column)?;
        }

        let data = normalize_amounts(data)?;
        let data = normalize_dates(data)?;
        let frame = to_frame(&data)?;

        Ok(Self { data, frame })
    }

    /// The full (normalized) table, including rows with a null amount.
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    pub fn row_count(&self) -> usize {
        self.data.row_count()
    }

    /// Lazy query over the rows that take part in aggregation: those with a non-null
    /// `TransactionAmount`, with the amount as `Float64`.
    pub fn amounts(&self) -> LazyFrame {
        self.frame
            .clone()
            .lazy()
            .filter(col(TRANSACTION_AMOUNT).is_not_null())
            .with_column(col(TRANSACTION_AMOUNT).cast(pl::DataType::Float64))
    }
}

fn require_column(data: &DataSet, column: &str) -> PipelineResult<usize> {
    data.schema
        .index_of(column)
        .ok_or_else(|| PipelineError::SchemaMismatch {
            message: format!(
                "missing required column '{column}'. columns={:?}",
                data.schema.field_names().collect::<Vec<_>>()
            ),
        })
}

fn normalize_amounts(data: DataSet) -> PipelineResult<DataSet> {
    let idx = require_column(&data, TRANSACTION_AMOUNT)?;
    match data.schema.fields[idx].data_type {
        DataType::Int64 | DataType::Float64 => Ok(data),
        DataType::Utf8 => with_column(
            &data,
            Field::new(TRANSACTION_AMOUNT, DataType::Float64),
            |row_idx, row| match &row[idx] {
                Value::Utf8(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float64)
                    .map_err(|e| PipelineError::ParseError {
                        row: row_idx + 2,
                        column: TRANSACTION_AMOUNT.to_string(),
                        raw: raw.clone(),
                        message: e.to_string(),
                    }),
                other => Ok(other.clone()),
            },
        ),
        other => Err(PipelineError::SchemaMismatch {
            message: format!("column '{TRANSACTION_AMOUNT}' must be numeric, found {}", other.type_name()),
        }),
    }
}

fn normalize_dates(data: DataSet) -> PipelineResult<DataSet> {
    let idx = require_column(&data, TRANSACTION_DATE)?;
    match data.schema.fields[idx].data_type {
        DataType::Timestamp => Ok(data),
        DataType::Utf8 => with_column(
            &data,
            Field::new(TRANSACTION_DATE, DataType::Timestamp),
            |row_idx, row| match &row[idx] {
                Value::Utf8(raw) => parse_timestamp(raw)
                    .map(Value::Timestamp)
                    .ok_or_else(|| PipelineError::ParseError {
                        row: row_idx + 2,
                        column: TRANSACTION_DATE.to_string(),
                        raw: raw.clone(),
                        message: "expected date (YYYY-MM-DD[ HH:MM:SS])".to_string(),
                    }),
                other => Ok(other.clone()),
            },
        ),
        other => Err(PipelineError::SchemaMismatch {
            message: format!("column '{TRANSACTION_DATE}' must be a date, found {}", other.type_name()),
        }),
    }
}
