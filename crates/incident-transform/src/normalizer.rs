//! Dispatch from canonical field type to the matching transform.

use std::collections::BTreeMap;

use incident_model::{CanonicalField, ColumnSource, FieldType, RawValue, SourceRow};

use crate::code::CodeTable;
use crate::datetime::{compose_date, normalize_date};
use crate::label::normalize_label;
use crate::numeric::normalize_numeric;
use crate::Normalized;

/// Free text is trimmed; numbers and dates render as plain text.
pub fn normalize_text(raw: &RawValue) -> Normalized {
    if raw.is_blank() {
        return Normalized::Blank;
    }
    Normalized::Value(raw.to_text())
}

/// Normalizes raw cells for canonical fields using the configured code tables.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer {
    tables: BTreeMap<String, CodeTable>,
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code_table(mut self, name: impl Into<String>, table: CodeTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    pub fn code_table(&self, name: &str) -> Option<&CodeTable> {
        self.tables.get(name)
    }

    pub fn normalize(&self, field: &CanonicalField, raw: &RawValue) -> Normalized {
        match field.field_type {
            FieldType::Text => normalize_text(raw),
            FieldType::Date => normalize_date(raw),
            FieldType::Numeric => normalize_numeric(raw),
            FieldType::Label => normalize_label(raw),
            FieldType::Code => match field.codes.as_deref().and_then(|name| self.code_table(name)) {
                Some(table) => table.normalize(raw),
                // An unresolved table behaves like an empty one.
                None if raw.is_blank() => Normalized::Blank,
                None => Normalized::UnknownCode(raw.to_text()),
            },
        }
    }

    /// Reads one mapped column source from a row and normalizes it.
    ///
    /// Date parts are composed first; a split date is only meaningful for date
    /// fields, anything else sees the year cell alone.
    pub fn normalize_source(
        &self,
        field: &CanonicalField,
        source: &ColumnSource,
        row: &SourceRow<'_>,
    ) -> Normalized {
        let cell = |column: &str| row.get(column).cloned().unwrap_or(RawValue::Blank);
        match source {
            ColumnSource::Column(column) => self.normalize(field, &cell(column)),
            ColumnSource::DateParts { year, month, day } if field.field_type == FieldType::Date => {
                let day = day.as_deref().map(cell);
                compose_date(&cell(year), &cell(month), day.as_ref())
            }
            ColumnSource::DateParts { year, .. } => self.normalize(field, &cell(year)),
        }
    }
}

#[cfg(test)]
mod tests {
    use incident_model::{FieldName, SourceName, SourceTable};

    use super::*;

    fn field(name: &str, field_type: FieldType) -> CanonicalField {
        CanonicalField::new(FieldName::new(name).unwrap(), field_type)
    }

    #[test]
    fn dispatches_by_field_type() {
        let normalizer = FieldNormalizer::new()
            .with_code_table("tri_state", CodeTable::new([("y", "yes"), ("n", "no")]));
        let mut harm = field("harm_domain", FieldType::Code);
        harm.codes = Some("tri_state".to_string());

        assert_eq!(
            normalizer.normalize(&harm, &RawValue::Text("Y".into())),
            Normalized::Value("yes".into())
        );
        assert_eq!(
            normalizer.normalize(&field("sector", FieldType::Label), &"1. Health".into()),
            Normalized::Value("Health".into())
        );
        assert_eq!(
            normalizer.normalize(&field("title", FieldType::Text), &"  Chatbot  ".into()),
            Normalized::Value("Chatbot".into())
        );
        assert_eq!(
            normalizer.normalize(&field("injuries", FieldType::Numeric), &RawValue::Number(3.0)),
            Normalized::Value("3".into())
        );
    }

    #[test]
    fn composes_date_parts_from_row() {
        let table = SourceTable::new(
            SourceName::new("cset").unwrap(),
            vec!["y".into(), "m".into(), "d".into()],
        )
        .unwrap()
        .with_row(vec!["2019.0".into(), "March".into(), RawValue::Blank])
        .unwrap();
        let row = table.rows().next().unwrap();
        let source = ColumnSource::DateParts {
            year: "y".into(),
            month: "m".into(),
            day: Some("d".into()),
        };
        let normalizer = FieldNormalizer::new();
        assert_eq!(
            normalizer.normalize_source(&field("incident_date", FieldType::Date), &source, &row),
            Normalized::Value("2019-03".into())
        );
    }
}
