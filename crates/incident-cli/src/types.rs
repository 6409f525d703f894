//! Request and result types shared by the command runners and the binary.

use std::path::{Path, PathBuf};

use incident_core::MasterTable;
use incident_ingest::SourceRequest;
use incident_model::{FieldName, HealthReport, RunReport, SourceName};
use incident_report::OutputPaths;

/// Parses a `--source` argument of the form `name=path`.
pub fn parse_source_arg(value: &str) -> Result<SourceRequest, String> {
    let Some((name, path)) = value.split_once('=') else {
        return Err(format!("expected NAME=PATH, got {value:?}"));
    };
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing path for source {:?}", name.trim()));
    }
    let name = SourceName::new(name).map_err(|error| error.to_string())?;
    Ok(SourceRequest::new(name, path))
}

#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Registry file; the bundled registry is used when absent.
    pub registry: Option<PathBuf>,
    pub sources: Vec<SourceRequest>,
    pub duplicates: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub allow_missing_sources: bool,
    /// Build and report without writing any file.
    pub dry_run: bool,
    /// Number of most frequent values listed per categorical field.
    pub top: usize,
}

impl BuildRequest {
    pub fn new(sources: Vec<SourceRequest>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            registry: None,
            sources,
            duplicates: None,
            output_dir: output_dir.into(),
            allow_missing_sources: false,
            dry_run: false,
            top: 0,
        }
    }

    pub fn registry_path(&self) -> Option<&Path> {
        self.registry.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub registry: Option<PathBuf>,
    pub sources: Vec<SourceRequest>,
    pub allow_missing_sources: bool,
}

/// Most frequent values of one categorical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopValues {
    pub field: FieldName,
    pub values: Vec<(String, usize)>,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub table: MasterTable,
    pub report: RunReport,
    /// Written files; `None` on a dry run.
    pub outputs: Option<OutputPaths>,
    pub top_values: Vec<TopValues>,
}

#[derive(Debug, Clone)]
pub enum BuildOutcome {
    Completed(Box<BuildSummary>),
    /// The schema gate stopped the run; only the blocking reports are kept.
    Blocked { reports: Vec<HealthReport> },
}

impl BuildOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed(_) => 0,
            Self::Blocked { .. } => 2,
        }
    }
}
