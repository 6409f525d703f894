//! Shared data model for the incident master dataset.
//!
//! - **source**: raw tables as supplied by the acquisition layer
//! - **schema** / **mapping**: canonical schema and per-source column mappings
//! - **record**: merged incident records with per-field provenance
//! - **health** / **warnings** / **report**: findings accumulated during a run

pub mod duplicate;
pub mod error;
pub mod health;
pub mod ids;
pub mod mapping;
pub mod record;
pub mod report;
pub mod schema;
pub mod source;
pub mod warnings;

pub use duplicate::DuplicatePair;
pub use error::{ModelError, Result};
pub use health::{FindingSeverity, HealthFinding, HealthReport};
pub use ids::{FieldName, IncidentKey, SourceName};
pub use mapping::{ColumnMapping, ColumnSource, HeaderStyle, MappingEntry};
pub use record::{CellValue, FieldValue, IncidentRecord};
pub use report::{DedupSummary, RunReport, SourceSummary};
pub use schema::{CanonicalField, CanonicalSchema, CombineRule, FieldType, JOIN_SEPARATOR};
pub use source::{RawValue, SourceRow, SourceTable};
pub use warnings::{ConflictWarning, DuplicateResolutionWarning, ParseWarning};
