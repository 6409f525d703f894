//! Lookup tables that canonicalize internal codes.

use std::collections::{BTreeMap, BTreeSet};

use incident_model::RawValue;

use crate::Normalized;

/// Case-insensitive alias table for one code list.
///
/// A value already equal to a canonical code counts as known even when the
/// table carries no alias for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    aliases: BTreeMap<String, String>,
    canonical: BTreeMap<String, String>,
}

impl CodeTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut aliases = BTreeMap::new();
        let mut canonical = BTreeMap::new();
        for (alias, code) in entries {
            let code = code.into();
            canonical.insert(code.to_lowercase(), code.clone());
            aliases.insert(alias.as_ref().trim().to_lowercase(), code);
        }
        Self { aliases, canonical }
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Distinct canonical codes in sorted order.
    pub fn codes(&self) -> BTreeSet<&str> {
        self.canonical.values().map(String::as_str).collect()
    }

    pub fn lookup(&self, value: &str) -> Option<&str> {
        let key = value.trim().to_lowercase();
        self.aliases
            .get(&key)
            .or_else(|| self.canonical.get(&key))
            .map(String::as_str)
    }

    /// Canonicalizes a raw cell. Codes missing from the table pass through
    /// trimmed as [`Normalized::UnknownCode`].
    pub fn normalize(&self, raw: &RawValue) -> Normalized {
        if raw.is_blank() {
            return Normalized::Blank;
        }
        let text = raw.to_text();
        match self.lookup(&text) {
            Some(code) => Normalized::Value(code.to_string()),
            None => Normalized::UnknownCode(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_state() -> CodeTable {
        CodeTable::new([("yes", "yes"), ("y", "yes"), ("true", "yes"), ("n", "no"), ("maybe", "maybe")])
    }

    #[test]
    fn canonicalizes_aliases_case_insensitively() {
        let table = tri_state();
        assert_eq!(table.normalize(&RawValue::Text(" TRUE ".into())), Normalized::Value("yes".into()));
        assert_eq!(table.normalize(&RawValue::Text("Y".into())), Normalized::Value("yes".into()));
        assert_eq!(table.lookup("No"), Some("no"));
    }

    #[test]
    fn unknown_codes_pass_through() {
        let table = tri_state();
        assert_eq!(
            table.normalize(&RawValue::Text("Unclear ".into())),
            Normalized::UnknownCode("Unclear".into())
        );
        assert_eq!(table.normalize(&RawValue::Blank), Normalized::Blank);
    }

    #[test]
    fn lists_canonical_codes() {
        let table = tri_state();
        let codes: Vec<&str> = table.codes().into_iter().collect();
        assert_eq!(codes, vec!["maybe", "no", "yes"]);
    }
}
