use incident_core::MasterTable;
use incident_model::{FieldName, IncidentRecord, SourceName};
use serde::Serialize;

use crate::ReportError;

/// Share of master records for which `source` supplied `field`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub field: FieldName,
    pub source: SourceName,
    pub populated: usize,
    pub total: usize,
    pub percent: f64,
}

/// Coverage for every column and the given sources, in column order then
/// source order. A source counts for a field only when it is in that field's
/// provenance; for the key column, when it supplied a row for the record.
pub fn source_coverage(table: &MasterTable, sources: &[SourceName]) -> Vec<CoverageRow> {
    let total = table.len();
    let mut rows = Vec::with_capacity(table.columns().len() * sources.len());
    for column in table.columns() {
        let is_key = column == table.key_field();
        for source in sources {
            let populated = table
                .records()
                .iter()
                .filter(|record| supplied(record, column, source, is_key))
                .count();
            let percent = if total == 0 {
                0.0
            } else {
                (populated as f64 * 1000.0 / total as f64).round() / 10.0
            };
            rows.push(CoverageRow {
                field: column.clone(),
                source: source.clone(),
                populated,
                total,
                percent,
            });
        }
    }
    rows
}

fn supplied(record: &IncidentRecord, column: &FieldName, source: &SourceName, is_key: bool) -> bool {
    if is_key {
        return record.key_sources().contains(source);
    }
    record
        .field(column.as_str())
        .is_some_and(|field| field.provenance.contains(source))
}

pub fn render_coverage_csv(rows: &[CoverageRow]) -> Result<Vec<u8>, ReportError> {
    let csv_error = |source| ReportError::Csv {
        artifact: "source coverage",
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["field", "source", "populated", "total", "percent"])
        .map_err(csv_error)?;
    for row in rows {
        writer
            .write_record([
                row.field.to_string(),
                row.source.to_string(),
                row.populated.to_string(),
                row.total.to_string(),
                format!("{:.1}", row.percent),
            ])
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| csv_error(csv::Error::from(err.into_error())))
}
