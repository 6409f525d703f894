//! Command runners behind the `incident-master` subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use incident_core::{BuildError, BuildOptions, BuildOutput, MasterTable, MasterTableBuilder};
use incident_ingest::{load_sources, read_duplicate_pairs};
use incident_model::HealthReport;
use incident_registry::SchemaRegistry;
use incident_report::{
    DictionaryEntry, data_dictionary, master_digest, render_master_csv, top_counts,
    write_outputs,
};
use tracing::{info, info_span};

use crate::types::{BuildOutcome, BuildRequest, BuildSummary, CheckRequest, TopValues};

/// Loads the registry at `path`, or the bundled one.
pub fn load_registry(path: Option<&Path>) -> Result<SchemaRegistry> {
    match path {
        Some(path) => SchemaRegistry::load(path)
            .with_context(|| format!("failed to load registry {}", path.display())),
        None => SchemaRegistry::builtin().context("failed to load the bundled registry"),
    }
}

pub fn run_build(request: &BuildRequest) -> Result<BuildOutcome> {
    let _span = info_span!("run_build", sources = request.sources.len()).entered();
    let registry = load_registry(request.registry_path())?;
    let tables = load_sources(&registry, &request.sources).context("failed to load sources")?;
    let pairs = match &request.duplicates {
        Some(path) => read_duplicate_pairs(path)
            .with_context(|| format!("failed to read duplicate list {}", path.display()))?,
        None => Vec::new(),
    };

    let builder = MasterTableBuilder::new(registry).with_options(BuildOptions {
        allow_missing_sources: request.allow_missing_sources,
    });
    let BuildOutput { table, mut report } = match builder.build(&tables, &pairs) {
        Ok(output) => output,
        Err(BuildError::SchemaHealth { reports }) => {
            return Ok(BuildOutcome::Blocked { reports });
        }
        Err(error) => return Err(error).context("failed to build master table"),
    };

    let outputs = if request.dry_run {
        let rendered = render_master_csv(&table).context("failed to render master table")?;
        report.master_digest = Some(master_digest(&rendered));
        info!("dry run, no files written");
        None
    } else {
        let paths = write_outputs(&request.output_dir, &table, &mut report, builder.registry())
            .with_context(|| {
                format!("failed to write outputs to {}", request.output_dir.display())
            })?;
        Some(paths)
    };
    let top_values = categorical_top_values(builder.registry(), &table, request.top);

    Ok(BuildOutcome::Completed(Box::new(BuildSummary {
        table,
        report,
        outputs,
        top_values,
    })))
}

/// Validates the supplied sources without merging. One report per configured
/// source.
pub fn run_check(request: &CheckRequest) -> Result<Vec<HealthReport>> {
    let _span = info_span!("run_check", sources = request.sources.len()).entered();
    let registry = load_registry(request.registry.as_deref())?;
    let tables = load_sources(&registry, &request.sources).context("failed to load sources")?;
    let builder = MasterTableBuilder::new(registry).with_options(BuildOptions {
        allow_missing_sources: request.allow_missing_sources,
    });
    builder
        .validate(&tables)
        .context("failed to validate sources")
}

pub fn run_fields(registry: Option<&Path>) -> Result<Vec<DictionaryEntry>> {
    let registry = load_registry(registry)?;
    Ok(data_dictionary(&registry))
}

fn categorical_top_values(
    registry: &SchemaRegistry,
    table: &MasterTable,
    top: usize,
) -> Vec<TopValues> {
    if top == 0 {
        return Vec::new();
    }
    registry
        .schema()
        .fields
        .iter()
        .filter(|field| field.field_type.is_categorical())
        .map(|field| TopValues {
            field: field.name.clone(),
            values: top_counts(table, field.name.as_str(), top),
        })
        .collect()
}
