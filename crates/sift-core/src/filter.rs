use std::collections::HashMap;

use crate::error::Result;
use crate::expr::{self, Expr};
use crate::table::Table;
use crate::value::Value;

/// Keep the rows for which `query` evaluates to true.
///
/// The expression is parsed once and its column references are bound against
/// the table before any row is evaluated, so an unknown column or a malformed
/// expression fails the whole call up front. A type error during evaluation
/// aborts filtering at the offending row. Surviving rows keep their input
/// order.
///
/// An empty or all-whitespace query matches every row. That path resolves no
/// columns at all and succeeds even on a zero-column table.
pub fn filter(table: &Table, query: &str) -> Result<Table> {
    if query.trim().is_empty() {
        return Ok(table.clone());
    }

    let parsed = expr::parse(query)?;
    let index = column_index(table);
    parsed.validate(&index)?;

    let mut rows = Vec::new();
    for row in table.rows() {
        if keep_row(&parsed, row, &index)? {
            rows.push(row.clone());
        }
    }

    tracing::debug!("query kept {} of {} rows", rows.len(), table.n_rows());
    Ok(Table::new(table.columns().to_vec(), rows))
}

/// Name-to-position map; a duplicated column name resolves to its first
/// occurrence.
fn column_index(table: &Table) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (i, name) in table.columns().iter().enumerate() {
        index.entry(name.clone()).or_insert(i);
    }
    index
}

fn keep_row(expr: &Expr, row: &[Value], index: &HashMap<String, usize>) -> Result<bool> {
    match expr.eval(row, index)? {
        Value::Boolean(b) => Ok(b),
        other => Err(crate::error::SiftError::invalid_query(format!(
            "expression must evaluate to a boolean, got {}",
            other.data_type()
        ))),
    }
}
