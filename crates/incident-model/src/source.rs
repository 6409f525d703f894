//! Raw source tables as handed over by the acquisition layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ModelError, SourceName};

/// A single raw cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Blank,
}

impl RawValue {
    /// Builds a text cell, mapping empty or whitespace-only input to `Blank`.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Blank => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(number) => number.is_nan(),
            Self::Date(_) => false,
        }
    }

    /// Plain-text rendering of the cell; blank cells render as an empty string.
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_string(),
            Self::Number(number) if number.is_nan() => String::new(),
            Self::Number(number) => number.to_string(),
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::Blank => String::new(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

/// One ingested source file: named, ordered columns and rows of raw cells.
///
/// Column names are unique within a table and every row has exactly one cell
/// per column.
#[derive(Debug, Clone)]
pub struct SourceTable {
    name: SourceName,
    columns: Vec<String>,
    index: BTreeMap<String, usize>,
    rows: Vec<Vec<RawValue>>,
}

impl SourceTable {
    pub fn new(name: SourceName, columns: Vec<String>) -> Result<Self, ModelError> {
        let mut index = BTreeMap::new();
        for (position, column) in columns.iter().enumerate() {
            if index.insert(column.clone(), position).is_some() {
                return Err(ModelError::DuplicateColumn {
                    source_name: name.to_string(),
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            name,
            columns,
            index,
            rows: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<RawValue>) -> Result<(), ModelError> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RowWidth {
                source_name: self.name.to_string(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Builder-style variant of [`Self::push_row`].
    pub fn with_row(mut self, row: Vec<RawValue>) -> Result<Self, ModelError> {
        self.push_row(row)?;
        Ok(self)
    }

    pub fn name(&self) -> &SourceName {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = SourceRow<'_>> {
        self.rows.iter().map(move |cells| SourceRow {
            index: &self.index,
            cells,
        })
    }
}

/// Borrowed view over one row, addressed by raw column name.
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a> {
    index: &'a BTreeMap<String, usize>,
    cells: &'a [RawValue],
}

impl<'a> SourceRow<'a> {
    pub fn get(&self, column: &str) -> Option<&'a RawValue> {
        self.index
            .get(column)
            .and_then(|position| self.cells.get(*position))
    }
}
