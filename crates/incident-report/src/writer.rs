use std::fs;
use std::path::{Path, PathBuf};

use incident_core::MasterTable;
use incident_model::RunReport;
use incident_registry::SchemaRegistry;
use tracing::info;

use crate::ReportError;
use crate::coverage::{render_coverage_csv, source_coverage};
use crate::dictionary::{data_dictionary, render_dictionary_csv};
use crate::master::{master_digest, render_master_csv};

const MASTER_FILE: &str = "master.csv";
const REPORT_FILE: &str = "run_report.json";
const DICTIONARY_FILE: &str = "data_dictionary.csv";
const COVERAGE_FILE: &str = "source_coverage.csv";

/// Files produced by [`write_outputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub master: PathBuf,
    pub report: PathBuf,
    pub dictionary: PathBuf,
    pub coverage: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            master: dir.join(MASTER_FILE),
            report: dir.join(REPORT_FILE),
            dictionary: dir.join(DICTIONARY_FILE),
            coverage: dir.join(COVERAGE_FILE),
        }
    }
}

/// Writes the master table, run report, data dictionary, and source coverage
/// into `dir`, creating it when needed.
///
/// The digest of the rendered master table is stored in `report` before the
/// report itself is written.
pub fn write_outputs(
    dir: &Path,
    table: &MasterTable,
    report: &mut RunReport,
    registry: &SchemaRegistry,
) -> Result<OutputPaths, ReportError> {
    fs::create_dir_all(dir).map_err(|source| ReportError::io(dir, source))?;
    let paths = OutputPaths::in_dir(dir);

    let master = render_master_csv(table)?;
    let digest = master_digest(&master);
    write_file(&paths.master, &master)?;
    report.master_digest = Some(digest);

    let json = serde_json::to_vec_pretty(report)?;
    write_file(&paths.report, &json)?;

    let dictionary = render_dictionary_csv(&data_dictionary(registry))?;
    write_file(&paths.dictionary, &dictionary)?;

    let coverage = render_coverage_csv(&source_coverage(table, registry.priority()))?;
    write_file(&paths.coverage, &coverage)?;

    info!(
        dir = %dir.display(),
        records = table.len(),
        digest = report.master_digest.as_deref().unwrap_or_default(),
        "wrote outputs"
    );
    Ok(paths)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    fs::write(path, bytes).map_err(|source| ReportError::io(path, source))
}
