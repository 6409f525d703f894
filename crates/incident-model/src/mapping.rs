//! Per-source column mappings from raw column names to canonical fields.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{FieldName, FieldType, SourceName};

/// How raw headers are rewritten before the mapping is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Headers are trimmed and inner whitespace collapsed, nothing else.
    #[default]
    Verbatim,
    /// Headers are lower-cased with non-alphanumeric runs replaced by `_`.
    SnakeCase,
}

/// Where a canonical value is read from in the raw table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSource {
    /// A single raw column.
    Column(String),
    /// A date assembled from separate year / month / day columns.
    DateParts {
        year: String,
        month: String,
        day: Option<String>,
    },
}

impl ColumnSource {
    pub fn raw_columns(&self) -> Vec<&str> {
        match self {
            Self::Column(column) => vec![column.as_str()],
            Self::DateParts { year, month, day } => {
                let mut columns = vec![year.as_str(), month.as_str()];
                if let Some(day) = day {
                    columns.push(day.as_str());
                }
                columns
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: ColumnSource,
    pub field: FieldName,
    /// Optional type declared for the raw column itself.
    pub declared_type: Option<FieldType>,
}

/// Ordered raw column → canonical field mapping for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source: SourceName,
    pub description: Option<String>,
    pub header_style: HeaderStyle,
    pub entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    /// Every raw column the mapping expects to find in the source.
    pub fn expected_columns(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .flat_map(|entry| entry.source.raw_columns())
            .collect()
    }

    pub fn entries_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a MappingEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.field.as_str() == field)
    }

    pub fn maps_field(&self, field: &str) -> bool {
        self.entries_for(field).next().is_some()
    }

    /// Canonical fields fed by this source, in first-mapped order.
    pub fn fields(&self) -> Vec<&FieldName> {
        let mut fields: Vec<&FieldName> = Vec::new();
        for entry in &self.entries {
            if !fields.contains(&&entry.field) {
                fields.push(&entry.field);
            }
        }
        fields
    }
}
