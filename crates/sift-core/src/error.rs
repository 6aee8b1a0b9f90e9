use std::path::PathBuf;

/// Failures surfaced by the pipeline. Each stage constructs its error at the
/// point of detection and propagates it; no stage recovers or retries.
#[derive(Debug, thiserror::Error)]
pub enum SiftError {
    #[error("cannot read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("column `{column}` does not exist in the dataset")]
    ColumnNotFound { column: String },

    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("cannot write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl SiftError {
    pub(crate) fn invalid_query(message: impl Into<String>) -> Self {
        SiftError::InvalidQuery {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SiftError>;
