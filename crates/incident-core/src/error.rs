use incident_model::{HealthReport, SourceName};
use incident_registry::ConfigError;
use thiserror::Error;

/// Errors that stop a run before any table is produced.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid schema registry")]
    Config(#[from] ConfigError),
    #[error("schema health check blocked the run ({} source(s) with block-level findings)", reports.len())]
    SchemaHealth { reports: Vec<HealthReport> },
    #[error("source {source_name} is not configured in the registry")]
    UnknownSource { source_name: SourceName },
    #[error("source {source_name} was supplied more than once")]
    DuplicateSource { source_name: SourceName },
}

impl BuildError {
    /// Health reports behind a blocked run; empty for other errors.
    pub fn health_reports(&self) -> &[HealthReport] {
        match self {
            Self::SchemaHealth { reports } => reports,
            _ => &[],
        }
    }
}
