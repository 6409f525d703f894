//! Schema health reports produced before any merging happens.

use serde::{Deserialize, Serialize};

use crate::{FieldName, SourceName};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    /// Prevents the run from merging.
    Block,
    /// Reported, processing continues.
    Warn,
}

impl FindingSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::Warn => "Warn",
        }
    }
}

/// One observation about a source's columns. Each variant carries only what it needs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HealthFinding {
    /// A required canonical field has none of its mapped raw columns.
    MissingRequired {
        field: FieldName,
        columns: Vec<String>,
    },
    /// The configured source was not supplied to the run.
    SourceNotSupplied { blocking: bool },
    /// An optional canonical field has none of its mapped raw columns.
    MissingOptional {
        field: FieldName,
        columns: Vec<String>,
    },
    /// A raw column present in the source but absent from the mapping.
    UnexpectedColumn {
        column: String,
        /// Closest expected-but-absent column, when one is similar enough.
        suggestion: Option<String>,
    },
    /// The source has a header but no data rows.
    EmptySource,
}

impl HealthFinding {
    pub fn severity(&self) -> FindingSeverity {
        match self {
            Self::MissingRequired { .. } => FindingSeverity::Block,
            Self::SourceNotSupplied { blocking: true } => FindingSeverity::Block,
            Self::SourceNotSupplied { blocking: false }
            | Self::MissingOptional { .. }
            | Self::UnexpectedColumn { .. }
            | Self::EmptySource => FindingSeverity::Warn,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity() == FindingSeverity::Block
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingRequired { field, columns } => format!(
                "required field {field} is missing (expected column {})",
                columns.join(" / ")
            ),
            Self::SourceNotSupplied { .. } => "configured source was not supplied".to_string(),
            Self::MissingOptional { field, columns } => format!(
                "optional field {field} is missing (expected column {})",
                columns.join(" / ")
            ),
            Self::UnexpectedColumn {
                column,
                suggestion: Some(suggestion),
            } => format!("unmapped column {column:?} (renamed from {suggestion:?}?)"),
            Self::UnexpectedColumn { column, .. } => format!("unmapped column {column:?}"),
            Self::EmptySource => "source has no data rows".to_string(),
        }
    }
}

/// Validation result for one source. Findings are kept sorted so that equal
/// inputs always produce equal reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub source: SourceName,
    findings: Vec<HealthFinding>,
}

impl HealthReport {
    pub fn new(source: SourceName, mut findings: Vec<HealthFinding>) -> Self {
        findings.sort();
        findings.dedup();
        Self { source, findings }
    }

    pub fn findings(&self) -> &[HealthFinding] {
        &self.findings
    }

    /// Raw columns present but unmapped.
    pub fn unexpected(&self) -> impl Iterator<Item = &str> {
        self.findings.iter().filter_map(|finding| match finding {
            HealthFinding::UnexpectedColumn { column, .. } => Some(column.as_str()),
            _ => None,
        })
    }

    /// Canonical fields expected but absent, required or not.
    pub fn missing(&self) -> impl Iterator<Item = &FieldName> {
        self.findings.iter().filter_map(|finding| match finding {
            HealthFinding::MissingRequired { field, .. }
            | HealthFinding::MissingOptional { field, .. } => Some(field),
            _ => None,
        })
    }

    pub fn blocking_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_blocking()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.blocking_count()
    }

    pub fn has_blocking(&self) -> bool {
        self.blocking_count() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}
