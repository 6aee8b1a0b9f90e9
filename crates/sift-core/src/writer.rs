use std::path::Path;

use crate::error::{Result, SiftError};
use crate::table::Table;

/// Write a [`Table`] as CSV: a header row, then one record per row.
///
/// Fields are quoted per the standard rules (quoting when a field contains
/// the delimiter, a quote, or a newline; embedded quotes doubled). A
/// zero-row table produces a header-only file.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<()> {
    let path = path.as_ref();
    let write_err = |source: csv::Error| SiftError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;

    // A zero-column table has no header to emit; leave the file empty.
    if table.n_columns() > 0 {
        writer.write_record(table.columns()).map_err(write_err)?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|v| v.to_string()))
                .map_err(write_err)?;
        }
    }

    writer
        .flush()
        .map_err(|e| write_err(csv::Error::from(e)))?;

    tracing::debug!(
        "wrote {} rows, {} columns to {:?}",
        table.n_rows(),
        table.n_columns(),
        path
    );
    Ok(())
}
