use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid source name: {0:?}")]
    InvalidSourceName(String),
    #[error("invalid field name: {0:?}")]
    InvalidFieldName(String),
    #[error("invalid incident key: {0:?}")]
    InvalidIncidentKey(String),
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("source {source_name}: duplicate column {column:?}")]
    DuplicateColumn { source_name: String, column: String },
    #[error("source {source_name}: row has {found} cells, expected {expected}")]
    RowWidth {
        source_name: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
