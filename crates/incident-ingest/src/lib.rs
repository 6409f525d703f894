//! Acquisition-side adapter: turns CSV extracts into [`SourceTable`]s and the
//! duplicate list into [`DuplicatePair`]s.
//!
//! [`SourceTable`]: incident_model::SourceTable
//! [`DuplicatePair`]: incident_model::DuplicatePair

#![deny(unsafe_code)]

pub mod duplicates;
pub mod error;
pub mod headers;
pub mod loader;
pub mod table;

pub use duplicates::{read_duplicate_pairs, read_duplicate_pairs_from_reader};
pub use error::IngestError;
pub use headers::{dedupe_headers, normalize_header, snake_case_header};
pub use loader::{SourceRequest, load_sources};
pub use table::{IngestOptions, read_source_csv, read_source_from_reader};
