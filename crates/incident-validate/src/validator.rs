use std::collections::BTreeSet;

use incident_model::{
    CanonicalSchema, ColumnMapping, ColumnSource, HealthFinding, HealthReport, SourceTable,
};
use tracing::debug;

use crate::drift::suggest_column;

/// Compares one source table with its mapping.
///
/// - a raw column the mapping does not mention is an `UnexpectedColumn` (warn)
/// - a mapped canonical field none of whose raw columns is present is missing;
///   block-level when the schema marks it required, warn-level otherwise
/// - a table without data rows gets `EmptySource` (warn)
///
/// A split date counts as present when its year and month columns are; the day
/// column is optional. The result depends only on the column sets, not on
/// column order.
pub fn validate_source(
    table: &SourceTable,
    mapping: &ColumnMapping,
    schema: &CanonicalSchema,
) -> HealthReport {
    let actual: BTreeSet<&str> = table.columns().iter().map(String::as_str).collect();
    let expected = mapping.expected_columns();
    let absent: BTreeSet<&str> = expected.difference(&actual).copied().collect();

    let mut findings = Vec::new();
    for column in actual.difference(&expected) {
        findings.push(HealthFinding::UnexpectedColumn {
            column: (*column).to_string(),
            suggestion: suggest_column(column, &absent).map(str::to_string),
        });
    }

    for field in mapping.fields() {
        let available = mapping
            .entries_for(field.as_str())
            .any(|entry| source_available(&entry.source, &actual));
        if available {
            continue;
        }
        let mut columns: Vec<String> = mapping
            .entries_for(field.as_str())
            .flat_map(|entry| entry.source.raw_columns())
            .filter(|column| !actual.contains(column))
            .map(str::to_string)
            .collect();
        columns.sort();
        columns.dedup();
        let finding = if schema.is_required(field.as_str()) {
            HealthFinding::MissingRequired {
                field: field.clone(),
                columns,
            }
        } else {
            HealthFinding::MissingOptional {
                field: field.clone(),
                columns,
            }
        };
        findings.push(finding);
    }

    if table.is_empty() {
        findings.push(HealthFinding::EmptySource);
    }

    let report = HealthReport::new(table.name().clone(), findings);
    debug!(
        source = %report.source,
        blocking = report.blocking_count(),
        warnings = report.warning_count(),
        "validated source columns"
    );
    report
}

fn source_available(source: &ColumnSource, actual: &BTreeSet<&str>) -> bool {
    match source {
        ColumnSource::Column(column) => actual.contains(column.as_str()),
        ColumnSource::DateParts { year, month, .. } => {
            actual.contains(year.as_str()) && actual.contains(month.as_str())
        }
    }
}
