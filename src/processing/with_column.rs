//! Derived columns for [`crate::types::DataSet`].

use crate::error::PipelineResult;
use crate::types::{DataSet, Field, Value};

/// Returns a new [`DataSet`] with `field` computed from every row by `derive`.
///
/// `derive` receives the 0-based row index and the row. If a column named `field.name` already
/// exists it is replaced in place; otherwise the column is appended. The first error returned by
/// `derive` aborts the whole operation.
pub fn with_column<F>(dataset: &DataSet, field: Field, mut derive: F) -> PipelineResult<DataSet>
where
    F: FnMut(usize, &[Value]) -> PipelineResult<Value>,
{
    let existing = dataset.schema.index_of(&field.name);

    let mut schema = dataset.schema.clone();
    match existing {
        Some(idx) => schema.fields[idx] = field,
        None => schema.fields.push(field),
    }

    let rows = dataset
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let derived = derive(row_idx, row.as_slice())?;
            let mut out = row.clone();
            match existing {
                Some(idx) => out[idx] = derived,
                None => out.push(derived),
            }
            Ok(out)
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    Ok(DataSet::new(schema, rows))
}

#[cfg(test)]
mod tests {
    use super::with_column;
    use crate::error::PipelineError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("AccountID", DataType::Utf8),
            Field::new("TransactionAmount", DataType::Int64),
        ]);

        let rows = vec![
            vec![Value::Utf8("a".to_string()), Value::Int64(1)],
            vec![Value::Utf8("b".to_string()), Value::Int64(2)],
        ];

        DataSet::new(schema, rows)
    }

    #[test]
    fn appends_new_column_and_leaves_input_untouched() {
        let ds = sample_dataset();
        let out = with_column(&ds, Field::new("doubled", DataType::Int64), |_, row| {
            Ok(match row[1] {
                Value::Int64(v) => Value::Int64(v * 2),
                _ => Value::Null,
            })
        })
        .unwrap();

        assert_eq!(
            out.schema.field_names().collect::<Vec<_>>(),
            vec!["AccountID", "TransactionAmount", "doubled"]
        );
        assert_eq!(out.rows[1][2], Value::Int64(4));
        assert_eq!(ds.schema.fields.len(), 2);
    }

    #[test]
    fn replaces_existing_column() {
        let ds = sample_dataset();
        let out = with_column(&ds, Field::new("AccountID", DataType::Utf8), |_, row| {
            Ok(Value::Utf8(row[0].to_string().to_uppercase()))
        })
        .unwrap();

        assert_eq!(out.schema.fields.len(), 2);
        assert_eq!(out.rows[0][0], Value::Utf8("A".to_string()));
    }

    #[test]
    fn first_error_aborts() {
        let ds = sample_dataset();
        let err = with_column(&ds, Field::new("x", DataType::Int64), |idx, _| {
            Err(PipelineError::ParseError {
                row: idx + 2,
                column: "x".to_string(),
                raw: String::new(),
                message: "boom".to_string(),
            })
        })
        .unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }
}
