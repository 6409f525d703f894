//! Incident records of the master dataset and their provenance.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{FieldName, IncidentKey, SourceName};

/// A populated, normalized cell. Blank cells are represented by absence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Value(String),
    /// The raw text did not match any known format for the field type.
    Unparseable(String),
}

impl CellValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(value) | Self::Unparseable(value) => value,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable(_))
    }
}

/// A field value together with the sources that supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: CellValue,
    /// Source whose value was kept.
    pub origin: SourceName,
    /// Origin plus every source that corroborated the identical value.
    pub provenance: BTreeSet<SourceName>,
}

impl FieldValue {
    pub fn new(value: CellValue, origin: SourceName) -> Self {
        let provenance = BTreeSet::from([origin.clone()]);
        Self {
            value,
            origin,
            provenance,
        }
    }
}

/// One row of the master dataset.
///
/// `sources` is the record's provenance flag: the union of the key's
/// provenance and every field's provenance. It is recomputed on each mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    key: IncidentKey,
    key_sources: BTreeSet<SourceName>,
    fields: BTreeMap<FieldName, FieldValue>,
    absorbed: BTreeSet<IncidentKey>,
    sources: BTreeSet<SourceName>,
}

impl IncidentRecord {
    pub fn new(key: IncidentKey) -> Self {
        Self {
            key,
            key_sources: BTreeSet::new(),
            fields: BTreeMap::new(),
            absorbed: BTreeSet::new(),
            sources: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> &IncidentKey {
        &self.key
    }

    /// Re-keys the record, remembering the previous key as absorbed.
    pub fn rename(&mut self, key: IncidentKey) {
        if key != self.key {
            let previous = std::mem::replace(&mut self.key, key);
            self.absorbed.insert(previous);
            self.absorbed.remove(&self.key);
        }
    }

    /// Sources that supplied a row for this record's key.
    pub fn key_sources(&self) -> &BTreeSet<SourceName> {
        &self.key_sources
    }

    pub fn add_key_source(&mut self, source: SourceName) {
        self.key_sources.insert(source.clone());
        self.sources.insert(source);
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.value.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FieldName, &FieldValue)> {
        self.fields.iter()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Sets a field that is not yet populated. Returns `false` if it already was.
    pub fn insert_field(&mut self, name: FieldName, value: FieldValue) -> bool {
        if self.fields.contains_key(&name) {
            return false;
        }
        self.sources.extend(value.provenance.iter().cloned());
        self.fields.insert(name, value);
        true
    }

    /// Adds corroborating sources to an already populated field.
    pub fn corroborate<I>(&mut self, name: &str, sources: I) -> bool
    where
        I: IntoIterator<Item = SourceName>,
    {
        let Some(field) = self.fields.get_mut(name) else {
            return false;
        };
        for source in sources {
            field.provenance.insert(source.clone());
            self.sources.insert(source);
        }
        true
    }

    /// Identifiers of records folded into this one by deduplication.
    pub fn absorbed(&self) -> &BTreeSet<IncidentKey> {
        &self.absorbed
    }

    /// Moves the key provenance and absorbed ids of `other` into this record
    /// and returns the other record's fields for value-level reconciliation.
    pub fn take_identity(&mut self, other: IncidentRecord) -> BTreeMap<FieldName, FieldValue> {
        for source in other.key_sources {
            self.add_key_source(source);
        }
        self.absorbed.extend(other.absorbed);
        if other.key != self.key {
            self.absorbed.insert(other.key);
        }
        other.fields
    }

    /// The provenance flag.
    pub fn sources(&self) -> &BTreeSet<SourceName> {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> SourceName {
        SourceName::new(name).unwrap()
    }

    fn field(name: &str) -> FieldName {
        FieldName::new(name).unwrap()
    }

    #[test]
    fn provenance_flag_tracks_fields_and_key() {
        let mut record = IncidentRecord::new(IncidentKey::Numeric(1));
        record.add_key_source(source("aiid"));
        record.insert_field(
            field("title"),
            FieldValue::new(CellValue::Value("Crash".into()), source("aiid")),
        );
        assert!(!record.insert_field(
            field("title"),
            FieldValue::new(CellValue::Value("Other".into()), source("cset")),
        ));
        record.corroborate("title", [source("mit")]);
        let sources: Vec<&str> = record.sources().iter().map(SourceName::as_str).collect();
        assert_eq!(sources, vec!["aiid", "mit"]);
        assert_eq!(record.value("title"), Some("Crash"));
        assert_eq!(record.field("title").unwrap().provenance.len(), 2);
    }

    #[test]
    fn rename_records_previous_key() {
        let mut record = IncidentRecord::new(IncidentKey::Numeric(4));
        record.rename(IncidentKey::Numeric(1));
        assert_eq!(record.key(), &IncidentKey::Numeric(1));
        assert!(record.absorbed().contains(&IncidentKey::Numeric(4)));
    }

    #[test]
    fn take_identity_merges_key_sources() {
        let mut kept = IncidentRecord::new(IncidentKey::Numeric(1));
        kept.add_key_source(source("aiid"));
        let mut other = IncidentRecord::new(IncidentKey::Numeric(4));
        other.add_key_source(source("mit"));
        other.insert_field(
            field("sector"),
            FieldValue::new(CellValue::Value("Health".into()), source("mit")),
        );
        let fields = kept.take_identity(other);
        assert_eq!(fields.len(), 1);
        assert!(kept.absorbed().contains(&IncidentKey::Numeric(4)));
        assert_eq!(kept.key_sources().len(), 2);
    }
}
