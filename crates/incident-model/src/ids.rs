#![deny(unsafe_code)]

use std::borrow::Borrow;
use std::fmt;

use crate::ModelError;

/// Name of a configured source extract (e.g. `aiid`, `cset`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SourceName(String);

impl SourceName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidSourceName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SourceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SourceName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SourceName> for String {
    fn from(value: SourceName) -> Self {
        value.0
    }
}

/// Name of a canonical field in the master dataset schema.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct FieldName(String);

impl FieldName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidFieldName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldName> for String {
    fn from(value: FieldName) -> Self {
        value.0
    }
}

/// Identifier shared by every source for the same real-world incident.
///
/// Integral keys are stored numerically so that `"0042"`, `"42"` and the
/// float-rendered `"42.0"` all join to the same record. Numeric keys order
/// before free-text keys.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum IncidentKey {
    Numeric(u64),
    Text(String),
}

impl IncidentKey {
    /// Parses a raw key cell. Blank input yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match integral_number(trimmed) {
            Some(number) => Some(Self::Numeric(number)),
            None => Some(Self::Text(trimmed.to_string())),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }
}

fn integral_number(value: &str) -> Option<u64> {
    if value.bytes().all(|b| b.is_ascii_digit()) {
        return value.parse().ok();
    }
    let (whole, fraction) = value.split_once('.')?;
    let whole_digits = !whole.is_empty() && whole.bytes().all(|b| b.is_ascii_digit());
    let zero_fraction = !fraction.is_empty() && fraction.bytes().all(|b| b == b'0');
    if whole_digits && zero_fraction {
        whole.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for IncidentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl TryFrom<String> for IncidentKey {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ModelError::InvalidIncidentKey(value))
    }
}

impl From<IncidentKey> for String {
    fn from(value: IncidentKey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_keys_collapse_float_and_padding() {
        assert_eq!(IncidentKey::parse("42"), Some(IncidentKey::Numeric(42)));
        assert_eq!(IncidentKey::parse(" 0042 "), Some(IncidentKey::Numeric(42)));
        assert_eq!(IncidentKey::parse("42.0"), Some(IncidentKey::Numeric(42)));
        assert_eq!(
            IncidentKey::parse("42.5"),
            Some(IncidentKey::Text("42.5".to_string()))
        );
        assert_eq!(IncidentKey::parse("   "), None);
    }

    #[test]
    fn numeric_keys_sort_before_text() {
        let mut keys = vec![
            IncidentKey::parse("b-7").unwrap(),
            IncidentKey::parse("10").unwrap(),
            IncidentKey::parse("9").unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["9", "10", "b-7"]);
    }

    #[test]
    fn names_reject_blank() {
        assert!(SourceName::new("  ").is_err());
        assert_eq!(FieldName::new(" title ").unwrap().as_str(), "title");
    }
}
