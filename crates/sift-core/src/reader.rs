use std::path::Path;

use crate::error::{Result, SiftError};
use crate::table::Table;
use crate::value::Value;

/// Read a CSV file into a [`Table`].
///
/// The first record is the header and supplies the column names. Every
/// remaining record becomes a row of inferred values. A record whose field
/// count differs from the header is a read error (the reader is not
/// flexible), as is any I/O failure.
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let read_err = |source: csv::Error| SiftError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new().from_path(path).map_err(read_err)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(read_err)?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(read_err)?;
        rows.push(record.iter().map(Value::infer).collect());
    }

    tracing::debug!(
        "read {} rows, {} columns from {:?}",
        rows.len(),
        columns.len(),
        path
    );
    Ok(Table::new(columns, rows))
}
