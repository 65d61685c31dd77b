//! Transaction aggregate views.
//!
//! Wrap a loaded [`crate::types::DataSet`] in a [`TransactionTable`] and derive any of the four
//! views from it. Each view is computed independently and returns a fresh `DataSet`.
//!
//! ```rust
//! use transaction_rollup::transactions::{top_accounts, TransactionTable};
//! use transaction_rollup::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("AccountID", DataType::Utf8),
//!     Field::new("TransactionAmount", DataType::Int64),
//!     Field::new("TransactionType", DataType::Utf8),
//!     Field::new("TransactionDate", DataType::Utf8),
//! ]);
//! let row = |a: &str, amt: i64, t: &str, d: &str| {
//!     vec![Value::Utf8(a.into()), Value::Int64(amt), Value::Utf8(t.into()), Value::Utf8(d.into())]
//! };
//! let ds = DataSet::new(
//!     schema,
//!     vec![
//!         row("A", 100, "deposit", "2024-01-05"),
//!         row("A", 50, "withdrawal", "2024-01-10"),
//!         row("B", 200, "deposit", "2024-02-01"),
//!     ],
//! );
//!
//! let table = TransactionTable::new(ds).unwrap();
//! let top = top_accounts(&table).unwrap();
//! assert_eq!(top.rows[0][0], Value::Utf8("B".into()));
//! ```

mod table;
mod views;

pub use table::{TransactionTable, ACCOUNT_ID, TRANSACTION_AMOUNT, TRANSACTION_DATE, TRANSACTION_TYPE};
pub use views::{by_type, monthly_trends, overall_summary, top_accounts, MONTH};

use crate::error::PipelineResult;
use crate::types::DataSet;

/// The aggregate views a pipeline run produces, in the order they are computed and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateView {
    Summary,
    TopAccounts,
    ByType,
    MonthlyTrends,
}

impl AggregateView {
    pub const ALL: [AggregateView; 4] = [
        Self::Summary,
        Self::TopAccounts,
        Self::ByType,
        Self::MonthlyTrends,
    ];

    /// Output file stem; the exported file is `<name>.csv`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::TopAccounts => "top_accounts",
            Self::ByType => "by_type",
            Self::MonthlyTrends => "monthly_trends",
        }
    }

    pub fn compute(&self, table: &TransactionTable) -> PipelineResult<DataSet> {
        match self {
            Self::Summary => overall_summary(table),
            Self::TopAccounts => top_accounts(table),
            Self::ByType => by_type(table),
            Self::MonthlyTrends => monthly_trends(table),
        }
    }
}
