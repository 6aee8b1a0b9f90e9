use std::path::PathBuf;

use crate::error::Result;
use crate::filter;
use crate::project;
use crate::reader;
use crate::writer;

/// One batch invocation: where to read, what to keep, how to filter, where
/// to write.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub columns: Vec<String>,
    /// Filter expression; `None` (or an empty string) matches every row.
    pub query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub rows_read: usize,
    pub rows_written: usize,
}

/// Run the stages strictly in order: read, project, filter, write.
///
/// The first failing stage's error is returned and the remaining stages
/// never run. Nothing is retried.
pub fn run(config: &PipelineConfig) -> Result<PipelineSummary> {
    let table = reader::read_csv(&config.input)?;
    let rows_read = table.n_rows();

    let table = project::project(&table, &config.columns)?;
    tracing::debug!("projected to {} columns", table.n_columns());

    let query = config.query.as_deref().unwrap_or("");
    let table = filter::filter(&table, query)?;

    writer::write_csv(&table, &config.output)?;

    Ok(PipelineSummary {
        rows_read,
        rows_written: table.n_rows(),
    })
}
