#![deny(unsafe_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use incident_model::{
    CanonicalField, CanonicalSchema, ColumnMapping, ColumnSource, FieldName, FieldType,
    MappingEntry, SourceName,
};
use sha2::{Digest, Sha256};

use crate::config::{ColumnConfig, FieldConfig, RegistryConfig, SourceConfig};
use crate::defaults::{DEFAULT_BLANK_TOKENS, builtin_code_tables};
use crate::error::ConfigError;

/// Registry shipped with the crate, covering the public AI-incident extracts.
pub const DEFAULT_REGISTRY_TOML: &str = include_str!("../../../config/registry.toml");

/// Validated, read-only configuration for a run.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schema: CanonicalSchema,
    mappings: BTreeMap<SourceName, ColumnMapping>,
    priority: Vec<SourceName>,
    code_tables: BTreeMap<String, BTreeMap<String, String>>,
    blank_tokens: Vec<String>,
    fingerprint: String,
}

impl SchemaRegistry {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>")
    }

    /// The registry bundled in `config/registry.toml`.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_REGISTRY_TOML, "<builtin>")
    }

    fn parse(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = toml::from_str(text).map_err(|source| ConfigError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_config(config)
    }

    pub fn from_config(config: RegistryConfig) -> Result<Self, ConfigError> {
        if config.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        let code_tables = build_code_tables(&config);
        let schema = build_schema(&config, &code_tables)?;

        let mut mappings = BTreeMap::new();
        for (name, source) in &config.sources {
            let mapping = build_mapping(name, source, &schema)?;
            mappings.insert(mapping.source.clone(), mapping);
        }

        for field in &schema.fields {
            let supplied = mappings
                .values()
                .any(|mapping| mapping.maps_field(field.name.as_str()));
            if !supplied {
                return Err(ConfigError::UnsourcedField {
                    field: field.name.to_string(),
                });
            }
        }

        let priority = build_priority(&config.priority, &mappings)?;
        let blank_tokens = config.blank_tokens.clone().unwrap_or_else(|| {
            DEFAULT_BLANK_TOKENS
                .iter()
                .map(|token| (*token).to_string())
                .collect()
        });
        let fingerprint = fingerprint_config(&config)?;

        Ok(Self {
            schema,
            mappings,
            priority,
            code_tables,
            blank_tokens,
            fingerprint,
        })
    }

    pub fn schema(&self) -> &CanonicalSchema {
        &self.schema
    }

    pub fn key_field(&self) -> &FieldName {
        &self.schema.key
    }

    pub fn mapping(&self, source: &str) -> Option<&ColumnMapping> {
        self.mappings.get(source)
    }

    pub fn mappings(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.mappings.values()
    }

    pub fn contains_source(&self, source: &str) -> bool {
        self.mappings.contains_key(source)
    }

    /// Source names, highest priority first.
    pub fn priority(&self) -> &[SourceName] {
        &self.priority
    }

    /// 0 for the highest-priority source.
    pub fn priority_rank(&self, source: &str) -> Option<usize> {
        self.priority.iter().position(|name| name.as_str() == source)
    }

    /// Alias table for a code field; alias keys are lower-case.
    pub fn code_table(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.code_tables.get(name)
    }

    pub fn blank_tokens(&self) -> &[String] {
        &self.blank_tokens
    }

    /// Sources mapping a canonical field, in priority order.
    pub fn sources_supplying(&self, field: &str) -> Vec<&SourceName> {
        self.priority
            .iter()
            .filter(|source| {
                self.mappings
                    .get(source.as_str())
                    .is_some_and(|mapping| mapping.maps_field(field))
            })
            .collect()
    }

    /// Stable sha256 of the configuration, recorded in every run report.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

fn build_code_tables(config: &RegistryConfig) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut tables = builtin_code_tables();
    for (name, aliases) in &config.codes {
        let table = tables.entry(name.clone()).or_default();
        for (alias, canonical) in aliases {
            table.insert(alias.trim().to_lowercase(), canonical.trim().to_string());
        }
    }
    tables
}

fn build_schema(
    config: &RegistryConfig,
    code_tables: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<CanonicalSchema, ConfigError> {
    let mut seen = BTreeSet::new();
    let mut fields = Vec::with_capacity(config.fields.len());
    for field in &config.fields {
        let canonical = build_field(field, code_tables)?;
        if !seen.insert(canonical.name.clone()) {
            return Err(ConfigError::DuplicateField {
                field: canonical.name.to_string(),
            });
        }
        fields.push(canonical);
    }

    let key = FieldName::new(config.key.clone())?;
    let Some(key_field) = fields.iter().find(|field| field.name == key) else {
        return Err(ConfigError::UnknownKeyField {
            key: key.to_string(),
        });
    };
    if !matches!(key_field.field_type, FieldType::Text | FieldType::Numeric) {
        return Err(ConfigError::InvalidKeyType {
            key: key.to_string(),
            found: key_field.field_type.to_string(),
        });
    }

    Ok(CanonicalSchema { key, fields })
}

fn build_field(
    field: &FieldConfig,
    code_tables: &BTreeMap<String, BTreeMap<String, String>>,
) -> Result<CanonicalField, ConfigError> {
    let name = FieldName::new(field.name.clone())?;
    let field_type = parse_type(&field.field_type).ok_or_else(|| ConfigError::UnknownFieldType {
        field: name.to_string(),
        value: field.field_type.clone(),
    })?;
    if let Some(table) = &field.codes {
        if field_type != FieldType::Code {
            return Err(ConfigError::CodesOnNonCodeField {
                field: name.to_string(),
                table: table.clone(),
                field_type: field_type.to_string(),
            });
        }
        if !code_tables.contains_key(table) {
            return Err(ConfigError::UnknownCodeTable {
                field: name.to_string(),
                table: table.clone(),
            });
        }
    }
    Ok(CanonicalField {
        name,
        field_type,
        required: field.required,
        description: field.description.clone(),
        combine: field.combine,
        codes: field.codes.clone(),
    })
}

fn parse_type(value: &str) -> Option<FieldType> {
    value.parse().ok()
}

fn build_mapping(
    name: &str,
    source: &SourceConfig,
    schema: &CanonicalSchema,
) -> Result<ColumnMapping, ConfigError> {
    let source_name = SourceName::new(name)?;
    let mut raw_seen = BTreeSet::new();
    let mut entries = Vec::with_capacity(source.columns.len());

    for column in &source.columns {
        let entry = build_entry(&source_name, column)?;
        let Some(field) = schema.field(entry.field.as_str()) else {
            return Err(ConfigError::UnknownField {
                source_name: source_name.to_string(),
                column: describe_source(&entry.source),
                field: entry.field.to_string(),
            });
        };
        for raw in entry.source.raw_columns() {
            if !raw_seen.insert(raw.to_string()) {
                return Err(ConfigError::DuplicateRawColumn {
                    source_name: source_name.to_string(),
                    column: raw.to_string(),
                });
            }
        }
        if matches!(entry.source, ColumnSource::DateParts { .. })
            && field.field_type != FieldType::Date
        {
            return Err(ConfigError::PartsOnNonDateField {
                source_name: source_name.to_string(),
                field: field.name.to_string(),
                field_type: field.field_type.to_string(),
            });
        }
        if let Some(declared) = entry.declared_type
            && field.field_type != FieldType::Text
            && declared != field.field_type
        {
            return Err(ConfigError::DeclaredTypeMismatch {
                source_name: source_name.to_string(),
                column: describe_source(&entry.source),
                field: field.name.to_string(),
                declared: declared.to_string(),
                expected: field.field_type.to_string(),
            });
        }
        entries.push(entry);
    }

    let mapping = ColumnMapping {
        source: source_name,
        description: source.description.clone(),
        header_style: source.header_style,
        entries,
    };
    check_shared_fields(&mapping, schema)?;

    if !mapping.maps_field(schema.key.as_str()) {
        return Err(ConfigError::KeyNotMapped {
            source_name: mapping.source.to_string(),
            key: schema.key.to_string(),
        });
    }
    Ok(mapping)
}

fn build_entry(source: &SourceName, column: &ColumnConfig) -> Result<MappingEntry, ConfigError> {
    let field = FieldName::new(column.field.clone())?;
    let column_source = match (&column.raw, &column.parts) {
        (Some(raw), None) if !raw.trim().is_empty() => ColumnSource::Column(raw.trim().to_string()),
        (None, Some(parts)) => ColumnSource::DateParts {
            year: parts.year.trim().to_string(),
            month: parts.month.trim().to_string(),
            day: parts.day.as_ref().map(|day| day.trim().to_string()),
        },
        _ => {
            return Err(ConfigError::InvalidColumnSource {
                source_name: source.to_string(),
                field: field.to_string(),
            });
        }
    };
    let declared_type = match &column.declared_type {
        Some(value) => Some(parse_type(value).ok_or_else(|| ConfigError::UnknownFieldType {
            field: field.to_string(),
            value: value.clone(),
        })?),
        None => None,
    };
    Ok(MappingEntry {
        source: column_source,
        field,
        declared_type,
    })
}

/// Several raw columns of one source may feed the same field only with a
/// combine rule and compatible declared types.
fn check_shared_fields(mapping: &ColumnMapping, schema: &CanonicalSchema) -> Result<(), ConfigError> {
    for field_name in mapping.fields() {
        let entries: Vec<&MappingEntry> = mapping.entries_for(field_name.as_str()).collect();
        if entries.len() < 2 {
            continue;
        }
        let Some(field) = schema.field(field_name.as_str()) else {
            continue;
        };
        let first = entries[0];
        let first_type = first.declared_type.unwrap_or(field.field_type);
        for other in &entries[1..] {
            let other_type = other.declared_type.unwrap_or(field.field_type);
            if other_type != first_type {
                return Err(ConfigError::IncompatibleTypes {
                    source_name: mapping.source.to_string(),
                    field: field.name.to_string(),
                    first: describe_source(&first.source),
                    first_type: first_type.to_string(),
                    second: describe_source(&other.source),
                    second_type: other_type.to_string(),
                });
            }
        }
        if field.combine.is_none() {
            return Err(ConfigError::MissingCombineRule {
                source_name: mapping.source.to_string(),
                field: field.name.to_string(),
                count: entries.len(),
            });
        }
    }
    Ok(())
}

fn build_priority(
    priority: &[String],
    mappings: &BTreeMap<SourceName, ColumnMapping>,
) -> Result<Vec<SourceName>, ConfigError> {
    let mut ordered = Vec::with_capacity(priority.len());
    for name in priority {
        let source = SourceName::new(name.clone())?;
        if !mappings.contains_key(&source) {
            return Err(ConfigError::UnknownPrioritySource {
                source_name: source.to_string(),
            });
        }
        if ordered.contains(&source) {
            return Err(ConfigError::DuplicatePrioritySource {
                source_name: source.to_string(),
            });
        }
        ordered.push(source);
    }
    if let Some(missing) = mappings.keys().find(|name| !ordered.contains(name)) {
        return Err(ConfigError::UnprioritizedSource {
            source_name: missing.to_string(),
        });
    }
    Ok(ordered)
}

fn describe_source(source: &ColumnSource) -> String {
    source.raw_columns().join("+")
}

fn fingerprint_config(config: &RegistryConfig) -> Result<String, ConfigError> {
    // Map-typed sections serialize in key order, so the digest is stable.
    let bytes =
        serde_json::to_vec(config).map_err(|source| ConfigError::Fingerprint { source })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
key = "incident_id"
priority = ["aiid", "cset"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "title"
type = "text"
required = true

[[fields]]
name = "harm_domain"
type = "code"
codes = "tri_state"

[sources.aiid]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "title", field = "title" },
]

[sources.cset]
header_style = "snake_case"
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "harm_domain", field = "harm_domain" },
]
"#;

    #[test]
    fn loads_minimal_registry() {
        let registry = SchemaRegistry::from_toml_str(MINIMAL).expect("load registry");
        assert_eq!(registry.key_field().as_str(), "incident_id");
        assert_eq!(registry.priority_rank("cset"), Some(1));
        let supplying: Vec<&str> = registry
            .sources_supplying("harm_domain")
            .into_iter()
            .map(SourceName::as_str)
            .collect();
        assert_eq!(supplying, vec!["cset"]);
        let tri_state = registry.code_table("tri_state").expect("tri_state table");
        assert_eq!(tri_state.get("true").map(String::as_str), Some("yes"));
        assert_eq!(registry.blank_tokens().len(), DEFAULT_BLANK_TOKENS.len());
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = SchemaRegistry::from_toml_str(MINIMAL).unwrap();
        let b = SchemaRegistry::from_toml_str(MINIMAL).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn builtin_registry_is_valid() {
        let registry = SchemaRegistry::builtin().expect("builtin registry");
        assert!(registry.priority().len() >= 3);
        assert!(registry.schema().field("incident_date").is_some());
    }
}
