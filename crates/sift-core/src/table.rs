use crate::value::Value;

/// In-memory dataset: ordered column names plus row-major values.
///
/// Every row holds exactly one value per column, in column order. Column
/// names are unique when a table comes out of the reader; a projection may
/// repeat names, and name lookups then resolve to the first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Panics if any row's length differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                columns.len(),
                "row {} has {} values for {} columns",
                i,
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first column with the given name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
