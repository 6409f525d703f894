//! Output generation for the incident master dataset.
//!
//! - **master**: `master.csv` rendering and its sha256 digest
//! - **dictionary**: data dictionary (field, type, description, supplying sources)
//! - **coverage**: per field and source, share of records the source populated
//! - **counts**: top-N value counts per field
//! - **frame**: polars `DataFrame` view for in-process consumers
//! - **writer**: writes every artifact into an output directory

mod counts;
mod coverage;
mod dictionary;
mod error;
mod frame;
mod master;
mod writer;

pub use counts::{MISSING_LABEL, top_counts};
pub use coverage::{CoverageRow, render_coverage_csv, source_coverage};
pub use dictionary::{DictionaryEntry, data_dictionary, render_dictionary_csv};
pub use error::ReportError;
pub use frame::to_dataframe;
pub use master::{MERGED_IDS_COLUMN, SOURCES_COLUMN, master_digest, render_master_csv};
pub use writer::{OutputPaths, write_outputs};
