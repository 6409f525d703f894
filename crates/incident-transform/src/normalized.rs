use incident_model::CellValue;

/// Outcome of normalizing one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Value(String),
    Blank,
    /// No known format matched; carries the original text.
    Unparseable(String),
    /// A code missing from its lookup table, passed through unchanged.
    UnknownCode(String),
}

impl Normalized {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Blank)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Value(value) | Self::Unparseable(value) | Self::UnknownCode(value) => {
                Some(value)
            }
            Self::Blank => None,
        }
    }

    pub fn into_cell(self) -> Option<CellValue> {
        match self {
            Self::Value(value) | Self::UnknownCode(value) => Some(CellValue::Value(value)),
            Self::Unparseable(raw) => Some(CellValue::Unparseable(raw)),
            Self::Blank => None,
        }
    }
}
