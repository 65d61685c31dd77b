//! Text rendering of schemas and tables for diagnostics.
//!
//! Output is meant for people reading a terminal; nothing parses it.

use std::fmt::Write;

use crate::types::{DataSet, Schema, Value};

const MAX_CELL_CHARS: usize = 20;

/// Render a schema as an indented tree, one line per field.
///
/// ```text
/// root
///  |-- AccountID: string (nullable = true)
///  |-- TransactionAmount: double (nullable = true)
/// ```
pub fn render_schema(schema: &Schema) -> String {
    let mut out = String::from("root\n");
    for field in &schema.fields {
        let _ = writeln!(
            out,
            " |-- {}: {} (nullable = true)",
            field.name,
            field.data_type.type_name()
        );
    }
    out
}

/// Render at most `limit` rows of `dataset` as a bordered grid.
///
/// Cells are right-aligned; cells longer than 20 characters are cut to 17 plus `...`; nulls show
/// as `null`. When rows are omitted a trailing `only showing top N rows` line is added.
pub fn render_table(dataset: &DataSet, limit: usize) -> String {
    let header: Vec<String> = dataset.schema.field_names().map(truncate).collect();
    let body: Vec<Vec<String>> = dataset
        .rows
        .iter()
        .take(limit)
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let border = widths.iter().fold(String::from("+"), |mut acc, w| {
        acc.push_str(&"-".repeat(*w));
        acc.push('+');
        acc
    });

    let mut out = String::new();
    let _ = writeln!(out, "{border}");
    push_line(&mut out, &header, &widths);
    let _ = writeln!(out, "{border}");
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    let _ = writeln!(out, "{border}");

    if dataset.row_count() > limit {
        let plural = if limit == 1 { "row" } else { "rows" };
        let _ = writeln!(out, "only showing top {limit} {plural}");
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    out.push('|');
    for (cell, w) in cells.iter().zip(widths) {
        let _ = write!(out, "{cell:>w$}|", w = *w);
    }
    out.push('\n');
}

fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        other => truncate(&other.to_string()),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_CHARS {
        s.to_string()
    } else {
        let head: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
        format!("{head}...")
    }
}
