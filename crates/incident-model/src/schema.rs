//! Canonical schema definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FieldName, ModelError};

/// Expected value type of a canonical field; selects the normalization applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text, trimmed.
    Text,
    /// Calendar date rendered as ISO 8601 with preserved precision.
    Date,
    /// Number rendered without trailing zeros.
    Numeric,
    /// Categorical label whose leading ordinal prefix is stripped.
    Label,
    /// Internal code canonicalized through a lookup table.
    Code,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Numeric => "numeric",
            Self::Label => "label",
            Self::Code => "code",
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Label | Self::Code)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "date" => Ok(Self::Date),
            "numeric" | "number" => Ok(Self::Numeric),
            "label" | "categorical" => Ok(Self::Label),
            "code" => Ok(Self::Code),
            _ => Err(ModelError::UnknownFieldType(s.to_string())),
        }
    }
}

/// How several raw columns of one source collapse into a single canonical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CombineRule {
    /// First non-blank value in mapping order.
    FirstNonBlank,
    /// Distinct non-blank values joined with `"; "` in mapping order.
    Join,
}

/// Separator used by [`CombineRule::Join`].
pub const JOIN_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalField {
    pub name: FieldName,
    pub field_type: FieldType,
    pub required: bool,
    pub description: Option<String>,
    pub combine: Option<CombineRule>,
    /// Name of the code table used when `field_type` is [`FieldType::Code`].
    pub codes: Option<String>,
}

impl CanonicalField {
    pub fn new(name: FieldName, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            description: None,
            combine: None,
            codes: None,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Ordered list of canonical fields plus the shared incident key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSchema {
    pub key: FieldName,
    pub fields: Vec<CanonicalField>,
}

impl CanonicalSchema {
    pub fn field(&self, name: &str) -> Option<&CanonicalField> {
        self.fields.iter().find(|field| field.name.as_str() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.name.as_str() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &FieldName> {
        self.fields.iter().map(|field| &field.name)
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.key.as_str() == name
    }

    /// The key is always required, regardless of its declared flag.
    pub fn is_required(&self, name: &str) -> bool {
        self.is_key(name) || self.field(name).is_some_and(|field| field.required)
    }
}
