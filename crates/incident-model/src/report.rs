//! Run report returned alongside the master table.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    ConflictWarning, DuplicateResolutionWarning, FieldName, HealthReport, IncidentKey,
    ParseWarning, SourceName,
};

/// Row accounting for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub rows_read: usize,
    pub rows_merged: usize,
    /// Rows dropped because their key cell was blank.
    pub rows_without_key: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupSummary {
    pub pairs: usize,
    /// Records folded into a surviving record.
    pub absorbed: usize,
    /// Records renamed to a kept id that had no record of its own.
    pub promoted: usize,
    /// Absorbed ids whose kept id did not exist.
    pub orphaned: Vec<IncidentKey>,
    pub warnings: Vec<DuplicateResolutionWarning>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub registry_fingerprint: String,
    pub health: Vec<HealthReport>,
    pub sources: BTreeMap<SourceName, SourceSummary>,
    pub parse_failures: BTreeMap<FieldName, usize>,
    pub parse_warnings: Vec<ParseWarning>,
    /// Per code field, values absent from the lookup table and how often they occurred.
    pub unmapped_codes: BTreeMap<FieldName, BTreeMap<String, usize>>,
    pub conflicts: Vec<ConflictWarning>,
    pub dedup: DedupSummary,
    pub records_merged: usize,
    pub records_final: usize,
    /// sha256 of the rendered master table, filled in when the table is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_digest: Option<String>,
}

impl RunReport {
    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    pub fn parse_failure_count(&self) -> usize {
        self.parse_failures.values().sum()
    }

    pub fn health_warning_count(&self) -> usize {
        self.health.iter().map(HealthReport::warning_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.health_warning_count()
            + self.parse_failure_count()
            + self.conflict_count()
            + self.dedup.warnings.len()
    }
}
