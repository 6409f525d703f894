//! Master table builder: validation, normalization, merge, dedup.

use std::collections::{BTreeMap, BTreeSet};
use std::panic;
use std::path::Path;
use std::thread;

use incident_model::{
    DuplicatePair, FieldName, FindingSeverity, HealthReport, IncidentKey, IncidentRecord,
    RunReport, SourceName, SourceTable,
};
use incident_registry::SchemaRegistry;
use incident_transform::{CodeTable, FieldNormalizer};
use incident_validate::{gate_reports, missing_source_report, validate_source};
use tracing::{error, info, info_span, warn};

use crate::dedup::deduplicate;
use crate::error::BuildError;
use crate::merge::merge_sources;
use crate::normalize::{NormalizedSource, normalize_source};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Downgrade configured-but-absent sources from block to warn.
    pub allow_missing_sources: bool,
}

/// The final dataset: canonical columns and one record per surviving key,
/// sorted by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterTable {
    key_field: FieldName,
    columns: Vec<FieldName>,
    records: Vec<IncidentRecord>,
}

impl MasterTable {
    pub fn key_field(&self) -> &FieldName {
        &self.key_field
    }

    pub fn columns(&self) -> &[FieldName] {
        &self.columns
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, key: &IncidentKey) -> Option<&IncidentRecord> {
        self.records
            .binary_search_by(|record| record.key().cmp(key))
            .ok()
            .map(|index| &self.records[index])
    }

    /// Cell text for `column`; the key column renders the record key.
    pub fn cell(&self, record: &IncidentRecord, column: &str) -> Option<String> {
        if column == self.key_field.as_str() {
            return Some(record.key().to_string());
        }
        record.value(column).map(str::to_string)
    }
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub table: MasterTable,
    pub report: RunReport,
}

/// Runs the merge pipeline for one batch of source tables.
#[derive(Debug, Clone)]
pub struct MasterTableBuilder {
    registry: SchemaRegistry,
    options: BuildOptions,
}

impl MasterTableBuilder {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            options: BuildOptions::default(),
        }
    }

    pub fn from_registry_path(path: &Path) -> Result<Self, BuildError> {
        Ok(Self::new(SchemaRegistry::load(path)?))
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates the supplied tables against the registry without merging.
    ///
    /// Returns one report per configured source, in source-name order.
    pub fn validate(&self, tables: &[SourceTable]) -> Result<Vec<HealthReport>, BuildError> {
        let mut supplied: BTreeMap<&SourceName, &SourceTable> = BTreeMap::new();
        for table in tables {
            if !self.registry.contains_source(table.name().as_str()) {
                return Err(BuildError::UnknownSource {
                    source_name: table.name().clone(),
                });
            }
            if supplied.insert(table.name(), table).is_some() {
                return Err(BuildError::DuplicateSource {
                    source_name: table.name().clone(),
                });
            }
        }

        let schema = self.registry.schema();
        let reports = self
            .registry
            .mappings()
            .map(|mapping| match supplied.get(&mapping.source) {
                Some(table) => validate_source(table, mapping, schema),
                None => missing_source_report(
                    mapping.source.clone(),
                    !self.options.allow_missing_sources,
                ),
            })
            .collect();
        Ok(reports)
    }

    /// Runs the full pipeline. Nothing is returned when any source has a
    /// block-level health finding.
    pub fn build(
        &self,
        tables: &[SourceTable],
        pairs: &[DuplicatePair],
    ) -> Result<BuildOutput, BuildError> {
        let _span = info_span!("build", sources = tables.len(), pairs = pairs.len()).entered();

        let health = self.validate(tables)?;
        log_findings(&health);
        let decision = gate_reports(&health);
        if decision.blocked {
            let reports: Vec<HealthReport> = health
                .into_iter()
                .filter(HealthReport::has_blocking)
                .collect();
            error!(
                sources = ?decision.blocking_sources,
                "schema health check failed, merge skipped"
            );
            return Err(BuildError::SchemaHealth { reports });
        }

        let normalized = self.normalize_all(tables);
        let merged = merge_sources(&normalized, self.registry.priority());
        let records_merged = merged.records.len();
        let deduped = deduplicate(merged.records, pairs);

        let mut report = RunReport {
            registry_fingerprint: self.registry.fingerprint().to_string(),
            health,
            records_merged,
            records_final: deduped.records.len(),
            dedup: deduped.summary,
            ..RunReport::default()
        };
        for source in normalized {
            for warning in &source.parse_warnings {
                *report.parse_failures.entry(warning.field.clone()).or_default() += 1;
            }
            report.parse_warnings.extend(source.parse_warnings);
            for (field, codes) in source.unmapped_codes {
                let counts = report.unmapped_codes.entry(field).or_default();
                for (code, count) in codes {
                    *counts.entry(code).or_default() += count;
                }
            }
            report.sources.insert(source.source, source.summary);
        }
        report.parse_warnings.sort();
        report.conflicts = merged.conflicts;
        report.conflicts.extend(deduped.conflicts);

        let schema = self.registry.schema();
        let table = MasterTable {
            key_field: schema.key.clone(),
            columns: schema.names().cloned().collect(),
            records: deduped.records.into_values().collect(),
        };
        info!(
            records = table.len(),
            conflicts = report.conflict_count(),
            parse_failures = report.parse_failure_count(),
            "master table built"
        );
        Ok(BuildOutput { table, report })
    }

    /// Normalizes each source on its own thread; results come back in
    /// source-name order.
    fn normalize_all(&self, tables: &[SourceTable]) -> Vec<NormalizedSource> {
        let _span = info_span!("normalize").entered();
        let schema = self.registry.schema();
        let normalizer = field_normalizer(&self.registry);
        let mut sorted: Vec<&SourceTable> = tables.iter().collect();
        sorted.sort_by(|left, right| left.name().cmp(right.name()));

        thread::scope(|scope| {
            let handles: Vec<_> = sorted
                .iter()
                .filter_map(|table| {
                    let mapping = self.registry.mapping(table.name().as_str())?;
                    let normalizer = &normalizer;
                    Some(scope.spawn(move || normalize_source(table, mapping, schema, normalizer)))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }
}

/// Builds a [`FieldNormalizer`] holding every code table the schema refers to.
pub fn field_normalizer(registry: &SchemaRegistry) -> FieldNormalizer {
    let tables: BTreeSet<&str> = registry
        .schema()
        .fields
        .iter()
        .filter_map(|field| field.codes.as_deref())
        .collect();
    tables
        .into_iter()
        .fold(FieldNormalizer::new(), |normalizer, name| {
            match registry.code_table(name) {
                Some(aliases) => normalizer.with_code_table(name, CodeTable::new(aliases)),
                None => normalizer,
            }
        })
}

fn log_findings(reports: &[HealthReport]) {
    for report in reports {
        for finding in report.findings() {
            match finding.severity() {
                FindingSeverity::Block => {
                    error!(source = %report.source, "{}", finding.message());
                }
                FindingSeverity::Warn => {
                    warn!(source = %report.source, "{}", finding.message());
                }
            }
        }
    }
}
