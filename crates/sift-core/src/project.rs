use std::collections::HashSet;

use crate::error::{Result, SiftError};
use crate::table::Table;

/// Restrict a table to the requested columns, in the requested order.
///
/// Every requested name is checked against the table's column set before any
/// data is copied; the first absent name fails the whole call. Indexing by
/// name alone would silently yield a column of nulls for a missing name, so
/// the existence check is explicit and exhaustive. A repeated name repeats
/// the column in the output.
pub fn project(table: &Table, columns: &[String]) -> Result<Table> {
    let known: HashSet<&str> = table.columns().iter().map(String::as_str).collect();
    for name in columns {
        if !known.contains(name.as_str()) {
            return Err(SiftError::ColumnNotFound {
                column: name.clone(),
            });
        }
    }

    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(Table::new(columns.to_vec(), rows))
}
