//! On-disk (TOML) shape of the schema registry.

use std::collections::BTreeMap;

use incident_model::{CombineRule, HeaderStyle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Canonical field joining all sources.
    pub key: String,
    /// Source names, highest priority first.
    pub priority: Vec<String>,
    /// Raw strings treated as blank cells; defaults apply when omitted.
    #[serde(default)]
    pub blank_tokens: Option<Vec<String>>,
    /// Canonical fields in output order.
    pub fields: Vec<FieldConfig>,
    /// Extra code alias tables, merged over the built-in ones.
    #[serde(default)]
    pub codes: BTreeMap<String, BTreeMap<String, String>>,
    pub sources: BTreeMap<String, SourceConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub combine: Option<CombineRule>,
    #[serde(default)]
    pub codes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub header_style: HeaderStyle,
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub parts: Option<DatePartsConfig>,
    pub field: String,
    #[serde(rename = "type", default)]
    pub declared_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatePartsConfig {
    pub year: String,
    pub month: String,
    #[serde(default)]
    pub day: Option<String>,
}
