#![deny(unsafe_code)]

use std::path::PathBuf;

use incident_model::ModelError;

/// A malformed schema registry. Always fatal, raised before any run starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse registry {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid name in registry: {0}")]
    Name(#[from] ModelError),

    #[error("failed to serialize registry for fingerprinting: {source}")]
    Fingerprint {
        #[source]
        source: serde_json::Error,
    },

    #[error("registry declares no sources")]
    NoSources,

    #[error("field {field}: unknown type {value:?}")]
    UnknownFieldType { field: String, value: String },

    #[error("duplicate canonical field {field}")]
    DuplicateField { field: String },

    #[error("key field {key} is not declared in [[fields]]")]
    UnknownKeyField { key: String },

    #[error("key field {key} must be text or numeric, found {found}")]
    InvalidKeyType { key: String, found: String },

    #[error("field {field}: unknown code table {table:?}")]
    UnknownCodeTable { field: String, table: String },

    #[error("field {field}: code table {table:?} set on a {field_type} field")]
    CodesOnNonCodeField {
        field: String,
        table: String,
        field_type: String,
    },

    #[error("source {source_name}: entry for {field} must set exactly one of `raw` or `parts`")]
    InvalidColumnSource { source_name: String, field: String },

    #[error("source {source_name}: duplicate raw column {column:?}")]
    DuplicateRawColumn { source_name: String, column: String },

    #[error("source {source_name}: column {column:?} maps to unknown field {field}")]
    UnknownField {
        source_name: String,
        column: String,
        field: String,
    },

    #[error("source {source_name}: column {column:?} declared {declared} but field {field} is {expected}")]
    DeclaredTypeMismatch {
        source_name: String,
        column: String,
        field: String,
        declared: String,
        expected: String,
    },

    #[error(
        "source {source_name}: columns {first:?} ({first_type}) and {second:?} ({second_type}) feed {field} with incompatible types"
    )]
    IncompatibleTypes {
        source_name: String,
        field: String,
        first: String,
        first_type: String,
        second: String,
        second_type: String,
    },

    #[error("source {source_name}: {count} columns feed {field} but the field has no combine rule")]
    MissingCombineRule {
        source_name: String,
        field: String,
        count: usize,
    },

    #[error("source {source_name}: date parts feed {field}, which is a {field_type} field")]
    PartsOnNonDateField {
        source_name: String,
        field: String,
        field_type: String,
    },

    #[error("source {source_name} does not map the key field {key}")]
    KeyNotMapped { source_name: String, key: String },

    #[error("field {field} is not supplied by any source mapping")]
    UnsourcedField { field: String },

    #[error("priority lists unknown source {source_name}")]
    UnknownPrioritySource { source_name: String },

    #[error("priority lists source {source_name} more than once")]
    DuplicatePrioritySource { source_name: String },

    #[error("source {source_name} is missing from the priority order")]
    UnprioritizedSource { source_name: String },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
