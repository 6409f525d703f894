use incident_core::MasterTable;
use incident_model::FieldName;
use sha2::{Digest, Sha256};

use crate::ReportError;

/// Extra column listing every source that contributed to the record.
pub const SOURCES_COLUMN: &str = "sources";
/// Extra column listing incident ids folded into the record.
pub const MERGED_IDS_COLUMN: &str = "merged_ids";

const LIST_SEPARATOR: &str = ";";

/// Renders the master table as CSV: canonical columns, then `sources` and
/// `merged_ids`. Blank cells are empty strings; rows are in key order.
pub fn render_master_csv(table: &MasterTable) -> Result<Vec<u8>, ReportError> {
    let csv_error = |source| ReportError::Csv {
        artifact: "master table",
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header: Vec<&str> = table.columns().iter().map(FieldName::as_str).collect();
    header.push(SOURCES_COLUMN);
    header.push(MERGED_IDS_COLUMN);
    writer.write_record(&header).map_err(csv_error)?;

    for record in table.records() {
        let mut row: Vec<String> = table
            .columns()
            .iter()
            .map(|column| table.cell(record, column.as_str()).unwrap_or_default())
            .collect();
        row.push(join(record.sources().iter().map(ToString::to_string)));
        row.push(join(record.absorbed().iter().map(ToString::to_string)));
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| csv_error(csv::Error::from(err.into_error())))
}

/// Lowercase hex sha256 of the rendered master table.
pub fn master_digest(rendered: &[u8]) -> String {
    hex::encode(Sha256::digest(rendered))
}

fn join(values: impl Iterator<Item = String>) -> String {
    values.collect::<Vec<_>>().join(LIST_SEPARATOR)
}
