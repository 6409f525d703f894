use incident_model::{FieldName, FieldType, SourceName};
use incident_registry::SchemaRegistry;
use serde::Serialize;

use crate::ReportError;

/// One data dictionary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryEntry {
    pub field: FieldName,
    pub field_type: FieldType,
    pub required: bool,
    pub description: String,
    /// Sources mapping the field, highest priority first.
    pub sources: Vec<SourceName>,
}

/// Dictionary entries in canonical field order.
pub fn data_dictionary(registry: &SchemaRegistry) -> Vec<DictionaryEntry> {
    let schema = registry.schema();
    schema
        .fields
        .iter()
        .map(|field| DictionaryEntry {
            field: field.name.clone(),
            field_type: field.field_type,
            required: schema.is_required(field.name.as_str()),
            description: field.description.clone().unwrap_or_default(),
            sources: registry
                .sources_supplying(field.name.as_str())
                .into_iter()
                .cloned()
                .collect(),
        })
        .collect()
}

pub fn render_dictionary_csv(entries: &[DictionaryEntry]) -> Result<Vec<u8>, ReportError> {
    let csv_error = |source| ReportError::Csv {
        artifact: "data dictionary",
        source,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["field", "type", "required", "description", "sources"])
        .map_err(csv_error)?;
    for entry in entries {
        let sources: Vec<&str> = entry.sources.iter().map(SourceName::as_str).collect();
        writer
            .write_record([
                entry.field.as_str(),
                entry.field_type.as_str(),
                if entry.required { "yes" } else { "no" },
                entry.description.as_str(),
                sources.join(";").as_str(),
            ])
            .map_err(csv_error)?;
    }
    writer
        .into_inner()
        .map_err(|err| csv_error(csv::Error::from(err.into_error())))
}
