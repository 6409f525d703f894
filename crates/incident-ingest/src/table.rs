use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use incident_model::{HeaderStyle, RawValue, SourceName, SourceTable};
use incident_registry::SchemaRegistry;
use tracing::{debug, trace};

use crate::IngestError;
use crate::headers::{apply_style, dedupe_headers};

/// How one source extract is read.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub header_style: HeaderStyle,
    /// Cell values (after trimming) that mean "no value".
    pub blank_tokens: BTreeSet<String>,
}

impl IngestOptions {
    /// Options for a configured source: its header style plus the registry's
    /// blank tokens.
    pub fn for_source(registry: &SchemaRegistry, source: &str) -> Result<Self, IngestError> {
        let mapping = registry
            .mapping(source)
            .ok_or_else(|| IngestError::UnknownSource {
                source_name: source.to_string(),
            })?;
        Ok(Self {
            header_style: mapping.header_style,
            blank_tokens: registry.blank_tokens().iter().cloned().collect(),
        })
    }

    fn cell(&self, raw: &str) -> RawValue {
        let trimmed = raw.trim().trim_matches('\u{feff}').trim();
        if trimmed.is_empty() || self.blank_tokens.contains(trimmed) {
            RawValue::Blank
        } else {
            RawValue::Text(trimmed.to_string())
        }
    }
}

/// Reads one source extract from disk.
pub fn read_source_csv(
    path: &Path,
    name: SourceName,
    options: &IngestOptions,
) -> Result<SourceTable, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_source_from_reader(file, name, &path.display().to_string(), options)
}

/// Reads a source extract from any reader. `origin` names the input in errors.
///
/// The first non-blank record is the header. Short rows are padded with blank
/// cells, cells beyond the header width are dropped, and rows whose cells are
/// all blank are skipped.
pub fn read_source_from_reader<R: Read>(
    reader: R,
    name: SourceName,
    origin: &str,
    options: &IngestOptions,
) -> Result<SourceTable, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let table_error = |source| IngestError::Table {
        origin: origin.to_string(),
        source,
    };
    let mut records = reader.records();
    let mut header = None;
    for record in records.by_ref() {
        let record = record.map_err(|source| IngestError::csv(origin, source))?;
        if !record.iter().all(|cell| cell.trim().is_empty()) {
            header = Some(record);
            break;
        }
    }
    let Some(header) = header else {
        return SourceTable::new(name, Vec::new()).map_err(table_error);
    };
    let headers: Vec<String> = header
        .iter()
        .map(|raw| apply_style(raw, options.header_style))
        .collect();
    let width = headers.len();
    let mut table = SourceTable::new(name, dedupe_headers(headers)).map_err(table_error)?;

    let mut truncated = 0usize;
    for record in records {
        let record = record.map_err(|source| IngestError::csv(origin, source))?;
        if record.len() > width {
            truncated += 1;
        }
        let row: Vec<RawValue> = (0..width)
            .map(|index| options.cell(record.get(index).unwrap_or("")))
            .collect();
        if row.iter().all(RawValue::is_blank) {
            continue;
        }
        trace!(source = %table.name(), cells = ?row, "read row");
        table.push_row(row).map_err(table_error)?;
    }

    debug!(
        source = %table.name(),
        columns = table.columns().len(),
        rows = table.row_count(),
        truncated,
        "read source table"
    );
    Ok(table)
}
