use std::path::PathBuf;

use incident_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to open {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read csv {origin}")]
    Csv {
        origin: String,
        #[source]
        source: csv::Error,
    },
    #[error("invalid table in {origin}")]
    Table {
        origin: String,
        #[source]
        source: ModelError,
    },
    #[error("source {source_name} is not configured in the registry")]
    UnknownSource { source_name: String },
    #[error("{origin} line {line}: {message}")]
    DuplicateList {
        origin: String,
        line: u64,
        message: String,
    },
    #[error("loader for source {source_name} panicked")]
    Worker { source_name: String },
}

impl IngestError {
    pub(crate) fn csv(origin: &str, source: csv::Error) -> Self {
        Self::Csv {
            origin: origin.to_string(),
            source,
        }
    }
}
