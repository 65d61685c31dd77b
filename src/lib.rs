//! `transaction-rollup` loads a transactions CSV into an in-memory [`types::DataSet`], derives
//! four aggregate views from it with Polars lazy queries, and writes each view back out as CSV.
//!
//! The primary entrypoint is [`pipeline::Pipeline`], which runs the whole flow for a
//! [`config::PipelineConfig`]. The individual stages are also usable on their own.
//!
//! ## Input
//!
//! A comma-delimited file with a header row. Column types are inferred from the data
//! ([`types::DataType::Int64`], [`types::DataType::Float64`], [`types::DataType::Bool`],
//! [`types::DataType::Timestamp`] or [`types::DataType::Utf8`]); empty cells load as
//! [`types::Value::Null`]. The aggregate views need four columns: `AccountID`,
//! `TransactionAmount`, `TransactionType` and `TransactionDate`.
//!
//! ## Views
//!
//! | file | key | columns |
//! |------|-----|---------|
//! | `summary.csv` | none | `total_transactions`, `total_amount`, `avg_amount` |
//! | `top_accounts.csv` | `AccountID` | `n_transactions`, `total_spent` (descending) |
//! | `by_type.csv` | `TransactionType` | `n_transactions`, `total_amount`, `avg_amount` |
//! | `monthly_trends.csv` | `month` (`YYYY-MM`) | `n_transactions`, `total_amount` (ascending) |
//!
//! Rows with a null `TransactionAmount` are left out of every count, sum and average.
//!
//! ## Quick example
//!
//! ```no_run
//! use transaction_rollup::config::PipelineConfig;
//! use transaction_rollup::pipeline::Pipeline;
//!
//! # fn main() -> Result<(), transaction_rollup::PipelineError> {
//! let config = PipelineConfig::new("transactions.csv", "output");
//! let summary = Pipeline::new(config).run(&mut std::io::stdout())?;
//! println!("rows={} files={}", summary.input_rows, summary.exported.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV loading (schema-first or inferred)
//! - [`types`]: schema + in-memory dataset types
//! - [`processing`]: derived columns and the `DataSet` <-> Polars `DataFrame` bridge
//! - [`transactions`]: the transaction table handle and the four aggregate views
//! - [`report`]: text rendering of schemas and tables
//! - [`export`]: CSV output
//! - [`observability`]: observer hooks for runs
//! - [`config`], [`pipeline`]: run configuration and orchestration
//! - [`error`]: the error type used across the crate

pub mod config;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod observability;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod transactions;
pub mod types;

pub use error::{ErrorKind, PipelineError, PipelineResult};
