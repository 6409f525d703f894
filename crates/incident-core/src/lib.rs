//! Merge engine for the incident master dataset.
//!
//! Pipeline stages, in the order [`MasterTableBuilder`] runs them:
//!
//! 1. schema validation (`incident-validate`), gated on block-level findings
//! 2. per-source normalization ([`normalize`])
//! 3. priority-ordered merge with provenance ([`merge`])
//! 4. union-find deduplication ([`dedup`])

#![deny(unsafe_code)]

pub mod builder;
pub mod dedup;
pub mod error;
pub mod merge;
pub mod normalize;

pub use builder::{BuildOptions, BuildOutput, MasterTable, MasterTableBuilder, field_normalizer};
pub use dedup::{DedupOutcome, deduplicate};
pub use error::BuildError;
pub use merge::{MergeOutcome, merge_sources};
pub use normalize::{NormalizedRow, NormalizedSource, normalize_source};
