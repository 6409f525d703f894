//! Parallel loading of source extracts, one thread per source.

use std::path::PathBuf;
use std::thread;

use incident_model::{SourceName, SourceTable};
use incident_registry::SchemaRegistry;
use tracing::{info, info_span};

use crate::IngestError;
use crate::table::{IngestOptions, read_source_csv};

/// A source extract to load: configured source name plus file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub name: SourceName,
    pub path: PathBuf,
}

impl SourceRequest {
    pub fn new(name: SourceName, path: impl Into<PathBuf>) -> Self {
        Self {
            name,
            path: path.into(),
        }
    }
}

/// Loads every requested source concurrently.
///
/// Tables come back in request order. When several loads fail, the error of
/// the earliest request is returned.
pub fn load_sources(
    registry: &SchemaRegistry,
    requests: &[SourceRequest],
) -> Result<Vec<SourceTable>, IngestError> {
    let _span = info_span!("ingest", sources = requests.len()).entered();
    let options = requests
        .iter()
        .map(|request| IngestOptions::for_source(registry, request.name.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let results: Vec<Result<SourceTable, IngestError>> = thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .zip(&options)
            .map(|(request, options)| {
                let handle = scope.spawn(move || {
                    read_source_csv(&request.path, request.name.clone(), options)
                });
                (request, handle)
            })
            .collect();
        handles
            .into_iter()
            .map(|(request, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(IngestError::Worker {
                        source_name: request.name.to_string(),
                    })
                })
            })
            .collect()
    });

    let tables = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    for table in &tables {
        info!(
            source = %table.name(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "loaded source"
        );
    }
    Ok(tables)
}
