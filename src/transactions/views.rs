//! The four aggregate views over a [`TransactionTable`].
//!
//! Every view drops rows whose `TransactionAmount` is null before aggregating, so counts, sums
//! and averages only see present amounts.

use polars::prelude::{self as pl, col, len, Expr, SortMultipleOptions};

use crate::error::PipelineResult;
use crate::processing::from_frame;
use crate::types::DataSet;

use super::table::{TransactionTable, ACCOUNT_ID, TRANSACTION_AMOUNT, TRANSACTION_DATE, TRANSACTION_TYPE};

pub const MONTH: &str = "month";

fn n_transactions(alias: &str) -> Expr {
    len().cast(pl::DataType::Int64).alias(alias)
}

fn amount_sum(alias: &str) -> Expr {
    col(TRANSACTION_AMOUNT).sum().alias(alias)
}

fn amount_mean(alias: &str) -> Expr {
    col(TRANSACTION_AMOUNT).mean().alias(alias)
}

/// Single row: `total_transactions`, `total_amount`, `avg_amount`.
///
/// Over no rows the sum is `0` and the average is null.
pub fn overall_summary(table: &TransactionTable) -> PipelineResult<DataSet> {
    let frame = table
        .amounts()
        .select([
            n_transactions("total_transactions"),
            amount_sum("total_amount"),
            amount_mean("avg_amount"),
        ])
        .collect()?;
    from_frame(&frame)
}

/// One row per account (`AccountID`, `n_transactions`, `total_spent`), highest spend first.
///
/// Accounts with equal spend keep the order in which they first appear in the input.
pub fn top_accounts(table: &TransactionTable) -> PipelineResult<DataSet> {
    let frame = table
        .amounts()
        .group_by_stable([col(ACCOUNT_ID)])
        .agg([n_transactions("n_transactions"), amount_sum("total_spent")])
        .sort(
            ["total_spent"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;
    from_frame(&frame)
}

/// One row per transaction type (`TransactionType`, `n_transactions`, `total_amount`,
/// `avg_amount`) in first-appearance order.
pub fn by_type(table: &TransactionTable) -> PipelineResult<DataSet> {
    let frame = table
        .amounts()
        .group_by_stable([col(TRANSACTION_TYPE)])
        .agg([
            n_transactions("n_transactions"),
            amount_sum("total_amount"),
            amount_mean("avg_amount"),
        ])
        .collect()?;
    from_frame(&frame)
}

/// One row per calendar month (`month` as `YYYY-MM`, `n_transactions`, `total_amount`),
/// ascending by month. Rows without a date land in a null month, which sorts first.
pub fn monthly_trends(table: &TransactionTable) -> PipelineResult<DataSet> {
    let frame = table
        .amounts()
        .with_column(col(TRANSACTION_DATE).dt().strftime("%Y-%m").alias(MONTH))
        .group_by_stable([col(MONTH)])
        .agg([n_transactions("n_transactions"), amount_sum("total_amount")])
        .sort([MONTH], SortMultipleOptions::default().with_maintain_order(true))
        .collect()?;
    from_frame(&frame)
}

#[cfg(test)]
mod tests {
    use super::{by_type, monthly_trends, overall_summary, top_accounts};
    use crate::transactions::TransactionTable;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn table(rows: Vec<(&str, Option<f64>, &str, &str)>) -> TransactionTable {
        let schema = Schema::new(vec![
            Field::new("AccountID", DataType::Utf8),
            Field::new("TransactionAmount", DataType::Float64),
            Field::new("TransactionType", DataType::Utf8),
            Field::new("TransactionDate", DataType::Utf8),
        ]);
        let rows = rows
            .into_iter()
            .map(|(acct, amount, kind, date)| {
                vec![
                    s(acct),
                    amount.map(Value::Float64).unwrap_or(Value::Null),
                    s(kind),
                    s(date),
                ]
            })
            .collect();
        TransactionTable::new(DataSet::new(schema, rows)).unwrap()
    }

    fn three_rows() -> TransactionTable {
        table(vec![
            ("A", Some(100.0), "deposit", "2024-01-05"),
            ("A", Some(50.0), "withdrawal", "2024-01-10"),
            ("B", Some(200.0), "deposit", "2024-02-01"),
        ])
    }

    #[test]
    fn summary_of_three_rows() {
        let out = overall_summary(&three_rows()).unwrap();
        assert_eq!(
            out.schema.field_names().collect::<Vec<_>>(),
            vec!["total_transactions", "total_amount", "avg_amount"]
        );
        assert_eq!(out.row_count(), 1);
        assert_eq!(out.rows[0][0], Value::Int64(3));
        assert_eq!(out.rows[0][1], Value::Float64(350.0));
        let avg = out.rows[0][2].as_f64().unwrap();
        assert!((avg - 116.666_666).abs() < 1e-3);
    }

    #[test]
    fn top_accounts_sorted_by_spend() {
        let out = top_accounts(&three_rows()).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![s("B"), Value::Int64(1), Value::Float64(200.0)],
                vec![s("A"), Value::Int64(2), Value::Float64(150.0)],
            ]
        );
    }

    #[test]
    fn top_accounts_ties_keep_input_order() {
        let t = table(vec![
            ("X", Some(10.0), "deposit", "2024-01-01"),
            ("Y", Some(30.0), "deposit", "2024-01-01"),
            ("Z", Some(10.0), "deposit", "2024-01-01"),
        ]);
        let out = top_accounts(&t).unwrap();
        let ids: Vec<String> = out.rows.iter().map(|r| r[0].to_string()).collect();
        assert_eq!(ids, vec!["Y", "X", "Z"]);
    }

    #[test]
    fn by_type_groups_in_first_appearance_order() {
        let out = by_type(&three_rows()).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![
                    s("deposit"),
                    Value::Int64(2),
                    Value::Float64(300.0),
                    Value::Float64(150.0)
                ],
                vec![
                    s("withdrawal"),
                    Value::Int64(1),
                    Value::Float64(50.0),
                    Value::Float64(50.0)
                ],
            ]
        );
    }

    #[test]
    fn monthly_trends_ascending_by_month() {
        let t = table(vec![
            ("B", Some(200.0), "deposit", "2024-02-01"),
            ("A", Some(100.0), "deposit", "2024-01-05"),
            ("A", Some(50.0), "withdrawal", "2024-01-10 08:15:00"),
        ]);
        let out = monthly_trends(&t).unwrap();
        assert_eq!(
            out.schema.field_names().collect::<Vec<_>>(),
            vec!["month", "n_transactions", "total_amount"]
        );
        assert_eq!(
            out.rows,
            vec![
                vec![s("2024-01"), Value::Int64(2), Value::Float64(150.0)],
                vec![s("2024-02"), Value::Int64(1), Value::Float64(200.0)],
            ]
        );
    }

    #[test]
    fn null_amounts_are_excluded_everywhere() {
        let t = table(vec![
            ("A", Some(10.0), "deposit", "2024-01-05"),
            ("A", None, "deposit", "2024-01-06"),
            ("C", None, "refund", "2024-03-01"),
        ]);

        let summary = overall_summary(&t).unwrap();
        assert_eq!(
            summary.rows[0],
            vec![Value::Int64(1), Value::Float64(10.0), Value::Float64(10.0)]
        );

        let accounts = top_accounts(&t).unwrap();
        assert_eq!(accounts.row_count(), 1);

        let types = by_type(&t).unwrap();
        assert_eq!(types.row_count(), 1);

        let months = monthly_trends(&t).unwrap();
        assert_eq!(months.rows, vec![vec![s("2024-01"), Value::Int64(1), Value::Float64(10.0)]]);
    }

    #[test]
    fn missing_dates_group_into_a_leading_null_month() {
        let schema = Schema::new(vec![
            Field::new("AccountID", DataType::Utf8),
            Field::new("TransactionAmount", DataType::Float64),
            Field::new("TransactionType", DataType::Utf8),
            Field::new("TransactionDate", DataType::Utf8),
        ]);
        let ds = DataSet::new(
            schema,
            vec![
                vec![s("A"), Value::Float64(1.0), s("deposit"), s("2024-05-01")],
                vec![s("A"), Value::Float64(2.0), s("deposit"), Value::Null],
            ],
        );
        let out = monthly_trends(&TransactionTable::new(ds).unwrap()).unwrap();
        assert_eq!(out.rows[0][0], Value::Null);
        assert_eq!(out.rows[1][0], s("2024-05"));
    }

    #[test]
    fn empty_table_summary() {
        let t = table(Vec::new());
        let out = overall_summary(&t).unwrap();
        assert_eq!(
            out.rows,
            vec![vec![Value::Int64(0), Value::Float64(0.0), Value::Null]]
        );
        assert_eq!(top_accounts(&t).unwrap().row_count(), 0);
        assert_eq!(monthly_trends(&t).unwrap().row_count(), 0);
    }
}
