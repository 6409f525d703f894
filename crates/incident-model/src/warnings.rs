//! Non-fatal findings accumulated into the run report.

use serde::{Deserialize, Serialize};

use crate::{FieldName, FieldType, IncidentKey, SourceName};

/// A value that failed normalization for its field type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParseWarning {
    pub source: SourceName,
    pub key: IncidentKey,
    pub field: FieldName,
    pub field_type: FieldType,
    pub raw: String,
}

/// Two values disagreed for the same field; the kept value won, the other was discarded.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConflictWarning {
    pub key: IncidentKey,
    pub field: FieldName,
    pub kept_source: SourceName,
    pub kept_value: String,
    pub rejected_source: SourceName,
    pub rejected_value: String,
    /// Set when the conflict arose while folding a duplicate record into `key`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub absorbed_key: Option<IncidentKey>,
}

/// Problems with the duplicate-pair list. None of them drop data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DuplicateResolutionWarning {
    /// Kept id has no record; the absorbed record was promoted under the kept id.
    MissingKept {
        kept: IncidentKey,
        absorbed: IncidentKey,
    },
    /// Absorbed id has no record; nothing to fold.
    MissingAbsorbed {
        kept: IncidentKey,
        absorbed: IncidentKey,
    },
    /// Neither id of the pair has a record.
    MissingBoth {
        kept: IncidentKey,
        absorbed: IncidentKey,
    },
    /// A pair naming the same id twice.
    SelfPair { key: IncidentKey },
    /// The duplicate group had no unique never-absorbed kept id.
    AmbiguousSurvivor {
        candidates: Vec<IncidentKey>,
        chosen: IncidentKey,
    },
}

impl DuplicateResolutionWarning {
    pub fn message(&self) -> String {
        match self {
            Self::MissingKept { kept, absorbed } => {
                format!("kept id {kept} not found; promoted {absorbed} to {kept}")
            }
            Self::MissingAbsorbed { kept, absorbed } => {
                format!("absorbed id {absorbed} not found (kept id {kept})")
            }
            Self::MissingBoth { kept, absorbed } => {
                format!("neither {kept} nor {absorbed} exists")
            }
            Self::SelfPair { key } => format!("pair ({key}, {key}) ignored"),
            Self::AmbiguousSurvivor { candidates, chosen } => {
                let rendered: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                format!(
                    "no unique survivor among [{}]; kept {chosen}",
                    rendered.join(", ")
                )
            }
        }
    }
}
