use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render {artifact} as csv")]
    Csv {
        artifact: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to serialize run report")]
    Json(#[from] serde_json::Error),
    #[error("failed to build data frame")]
    Frame(#[from] polars::error::PolarsError),
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
