//! Priority-ordered merge of normalized sources.

use std::collections::BTreeMap;

use incident_model::{
    ConflictWarning, FieldName, FieldValue, IncidentKey, IncidentRecord, SourceName,
};
use tracing::{debug, info, info_span};

use crate::normalize::NormalizedSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub records: BTreeMap<IncidentKey, IncidentRecord>,
    /// Sorted by key, then field.
    pub conflicts: Vec<ConflictWarning>,
}

/// Joins normalized sources on the incident key.
///
/// Sources are applied highest priority first; sources absent from `priority`
/// follow in name order. Within a field the first non-blank value wins. A later
/// identical value only adds its source to the field's provenance, a later
/// different value is discarded and recorded as a conflict.
pub fn merge_sources(sources: &[NormalizedSource], priority: &[SourceName]) -> MergeOutcome {
    let _span = info_span!("merge", sources = sources.len()).entered();
    let mut ordered: Vec<&NormalizedSource> = sources.iter().collect();
    ordered.sort_by_key(|source| {
        let rank = priority
            .iter()
            .position(|name| name == &source.source)
            .unwrap_or(priority.len());
        (rank, source.source.clone())
    });

    let mut outcome = MergeOutcome::default();
    for source in ordered {
        for row in &source.rows {
            let record = outcome
                .records
                .entry(row.key.clone())
                .or_insert_with(|| IncidentRecord::new(row.key.clone()));
            record.add_key_source(source.source.clone());
            for (field, cell) in &row.cells {
                let incoming = FieldValue::new(cell.clone(), source.source.clone());
                if let Some(conflict) = reconcile(record, field, incoming, None) {
                    outcome.conflicts.push(conflict);
                }
            }
        }
    }
    outcome.conflicts.sort();
    info!(
        records = outcome.records.len(),
        conflicts = outcome.conflicts.len(),
        "merged sources"
    );
    outcome
}

/// Applies one incoming field value to a record under first-non-blank-wins.
///
/// Returns a conflict when the record already holds a different value.
pub(crate) fn reconcile(
    record: &mut IncidentRecord,
    field: &FieldName,
    incoming: FieldValue,
    absorbed_key: Option<&IncidentKey>,
) -> Option<ConflictWarning> {
    if record.field(field.as_str()).is_none() {
        record.insert_field(field.clone(), incoming);
        return None;
    }
    let existing = record.field(field.as_str())?;
    if existing.value == incoming.value {
        record.corroborate(field.as_str(), incoming.provenance);
        return None;
    }
    let conflict = ConflictWarning {
        key: record.key().clone(),
        field: field.clone(),
        kept_source: existing.origin.clone(),
        kept_value: existing.value.as_str().to_string(),
        rejected_source: incoming.origin,
        rejected_value: incoming.value.as_str().to_string(),
        absorbed_key: absorbed_key.cloned(),
    };
    debug!(
        key = %conflict.key,
        field = %conflict.field,
        kept = %conflict.kept_source,
        rejected = %conflict.rejected_source,
        "conflicting value discarded"
    );
    Some(conflict)
}
