//! In-memory data transformations.
//!
//! Row-level work (normalizing text columns, deriving values with per-row errors) runs on
//! [`crate::types::DataSet`] through [`with_column()`]. Grouping, aggregation and sorting run as
//! Polars lazy queries over a frame built with [`to_frame()`]; results come back through
//! [`from_frame()`].
//!
//! ## Example: group → sort with Polars
//!
//! ```rust
//! use polars::prelude::{col, IntoLazy, SortMultipleOptions};
//! use transaction_rollup::processing::{from_frame, to_frame};
//! use transaction_rollup::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("AccountID", DataType::Utf8),
//!     Field::new("TransactionAmount", DataType::Float64),
//! ]);
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("A".into()), Value::Float64(100.0)],
//!         vec![Value::Utf8("A".into()), Value::Float64(50.0)],
//!         vec![Value::Utf8("B".into()), Value::Float64(200.0)],
//!         vec![Value::Utf8("B".into()), Value::Null],
//!     ],
//! );
//!
//! let ranked = to_frame(&ds)
//!     .unwrap()
//!     .lazy()
//!     .filter(col("TransactionAmount").is_not_null())
//!     .group_by_stable([col("AccountID")])
//!     .agg([col("TransactionAmount").sum().alias("total_spent")])
//!     .sort(
//!         ["total_spent"],
//!         SortMultipleOptions::default().with_order_descending(true),
//!     )
//!     .collect()
//!     .unwrap();
//!
//! let ranked = from_frame(&ranked).unwrap();
//! assert_eq!(ranked.rows[0], vec![Value::Utf8("B".into()), Value::Float64(200.0)]);
//! ```

pub mod frame;
pub mod with_column;

pub use frame::{from_frame, to_frame};
pub use with_column::with_column;
