//! Per-source normalization from raw rows to canonical cells.

use std::collections::BTreeMap;

use incident_model::{
    CanonicalField, CanonicalSchema, CellValue, ColumnMapping, CombineRule, FieldName,
    IncidentKey, JOIN_SEPARATOR, ParseWarning, SourceName, SourceRow, SourceSummary, SourceTable,
};
use incident_transform::{FieldNormalizer, Normalized};
use tracing::{debug, trace};

/// One source row after normalization: its incident key and populated cells.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NormalizedRow {
    pub key: IncidentKey,
    pub cells: BTreeMap<FieldName, CellValue>,
}

/// A fully normalized source, ready for merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSource {
    pub source: SourceName,
    /// Rows in canonical order: by key, then by cell content.
    pub rows: Vec<NormalizedRow>,
    pub summary: SourceSummary,
    pub parse_warnings: Vec<ParseWarning>,
    pub unmapped_codes: BTreeMap<FieldName, BTreeMap<String, usize>>,
}

/// Normalizes every row of `table` through `mapping`.
///
/// Rows whose key cell is blank are dropped and counted. The output does not
/// depend on the row order of `table`.
pub fn normalize_source(
    table: &SourceTable,
    mapping: &ColumnMapping,
    schema: &CanonicalSchema,
    normalizer: &FieldNormalizer,
) -> NormalizedSource {
    let source = table.name().clone();
    let fields: Vec<&CanonicalField> = mapping
        .fields()
        .into_iter()
        .filter(|field| !schema.is_key(field.as_str()))
        .filter_map(|field| schema.field(field.as_str()))
        .collect();
    let key_field = schema.field(schema.key.as_str());

    let mut rows = Vec::with_capacity(table.row_count());
    let mut summary = SourceSummary {
        rows_read: table.row_count(),
        ..SourceSummary::default()
    };
    let mut parse_warnings = Vec::new();
    let mut unmapped_codes: BTreeMap<FieldName, BTreeMap<String, usize>> = BTreeMap::new();

    for row in table.rows() {
        let Some(key) = key_field.and_then(|field| row_key(field, mapping, &row, normalizer)) else {
            summary.rows_without_key += 1;
            continue;
        };
        let mut cells = BTreeMap::new();
        for field in &fields {
            let values: Vec<Normalized> = mapping
                .entries_for(field.name.as_str())
                .map(|entry| normalizer.normalize_source(field, &entry.source, &row))
                .collect();
            for value in &values {
                match value {
                    Normalized::Unparseable(raw) => parse_warnings.push(ParseWarning {
                        source: source.clone(),
                        key: key.clone(),
                        field: field.name.clone(),
                        field_type: field.field_type,
                        raw: raw.clone(),
                    }),
                    Normalized::UnknownCode(code) => {
                        *unmapped_codes
                            .entry(field.name.clone())
                            .or_default()
                            .entry(code.clone())
                            .or_default() += 1;
                    }
                    Normalized::Value(_) | Normalized::Blank => {}
                }
            }
            if let Some(cell) = combine(field.combine, values) {
                cells.insert(field.name.clone(), cell);
            }
        }
        trace!(source = %source, key = %key, cells = ?cells, "normalized row");
        rows.push(NormalizedRow { key, cells });
    }

    rows.sort();
    parse_warnings.sort();
    summary.rows_merged = rows.len();
    debug!(
        source = %source,
        rows = rows.len(),
        without_key = summary.rows_without_key,
        parse_failures = parse_warnings.len(),
        "normalized source"
    );
    NormalizedSource {
        source,
        rows,
        summary,
        parse_warnings,
        unmapped_codes,
    }
}

fn row_key(
    field: &CanonicalField,
    mapping: &ColumnMapping,
    row: &SourceRow<'_>,
    normalizer: &FieldNormalizer,
) -> Option<IncidentKey> {
    mapping
        .entries_for(field.name.as_str())
        .map(|entry| normalizer.normalize_source(field, &entry.source, row))
        .find_map(|value| value.as_str().and_then(IncidentKey::parse))
}

/// Collapses the values of several raw columns feeding one field.
///
/// `Join` keeps distinct non-blank values in mapping order; the result is only
/// unparseable when every contributing value was. Anything else keeps the
/// first non-blank value.
fn combine(rule: Option<CombineRule>, values: Vec<Normalized>) -> Option<CellValue> {
    let mut cells = values.into_iter().filter_map(Normalized::into_cell);
    match rule {
        Some(CombineRule::Join) => {
            let cells: Vec<CellValue> = cells.collect();
            let all_unparseable = cells.iter().all(CellValue::is_unparseable);
            let mut parts: Vec<&str> = Vec::new();
            for cell in &cells {
                if !parts.contains(&cell.as_str()) {
                    parts.push(cell.as_str());
                }
            }
            if parts.is_empty() {
                return None;
            }
            let joined = parts.join(JOIN_SEPARATOR);
            Some(if all_unparseable {
                CellValue::Unparseable(joined)
            } else {
                CellValue::Value(joined)
            })
        }
        Some(CombineRule::FirstNonBlank) | None => cells.next(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_distinct_values_in_order() {
        let cell = combine(
            Some(CombineRule::Join),
            vec![
                Normalized::Value("Chatbot".into()),
                Normalized::Blank,
                Normalized::Value("Recommendation".into()),
                Normalized::UnknownCode("Chatbot".into()),
            ],
        );
        assert_eq!(cell, Some(CellValue::Value("Chatbot; Recommendation".into())));
    }

    #[test]
    fn first_non_blank_wins() {
        let cell = combine(
            Some(CombineRule::FirstNonBlank),
            vec![
                Normalized::Blank,
                Normalized::Unparseable("soon".into()),
                Normalized::Value("2020".into()),
            ],
        );
        assert_eq!(cell, Some(CellValue::Unparseable("soon".into())));
        assert_eq!(combine(None, vec![Normalized::Blank]), None);
    }
}
