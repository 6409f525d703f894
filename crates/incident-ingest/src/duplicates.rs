//! Duplicate-pair list reader.
//!
//! The list is a CSV whose header names a kept column (`kept`, `kept_id`,
//! `canonical_id`, `incident_id`) and an absorbed column (`absorbed`,
//! `absorbed_id`, `duplicate`, `duplicate_id`). Without recognizable headers
//! the first two columns are used in that order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use incident_model::{DuplicatePair, IncidentKey};
use tracing::debug;

use crate::IngestError;
use crate::headers::snake_case_header;

const KEPT_HEADERS: &[&str] = &["kept", "kept_id", "canonical_id", "incident_id"];
const ABSORBED_HEADERS: &[&str] = &["absorbed", "absorbed_id", "duplicate", "duplicate_id"];

pub fn read_duplicate_pairs(path: &Path) -> Result<Vec<DuplicatePair>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_duplicate_pairs_from_reader(file, &path.display().to_string())
}

/// Pairs are returned in file order; rows with both cells blank are skipped.
pub fn read_duplicate_pairs_from_reader<R: Read>(
    reader: R,
    origin: &str,
) -> Result<Vec<DuplicatePair>, IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader
        .headers()
        .map_err(|source| IngestError::csv(origin, source))?
        .clone();
    let (kept_index, absorbed_index) = locate_columns(&headers);

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::csv(origin, source))?;
        let line = record.position().map_or(0, csv::Position::line);
        let kept = record.get(kept_index).unwrap_or("").trim();
        let absorbed = record.get(absorbed_index).unwrap_or("").trim();
        if kept.is_empty() && absorbed.is_empty() {
            continue;
        }
        let parse = |value: &str, role: &str| {
            IncidentKey::parse(value).ok_or_else(|| IngestError::DuplicateList {
                origin: origin.to_string(),
                line,
                message: format!("missing {role} id"),
            })
        };
        pairs.push(DuplicatePair::new(
            parse(kept, "kept")?,
            parse(absorbed, "absorbed")?,
        ));
    }
    debug!(origin, pairs = pairs.len(), "read duplicate list");
    Ok(pairs)
}

fn locate_columns(headers: &StringRecord) -> (usize, usize) {
    let normalized: Vec<String> = headers.iter().map(snake_case_header).collect();
    let find = |names: &[&str]| {
        normalized
            .iter()
            .position(|header| names.contains(&header.as_str()))
    };
    match (find(KEPT_HEADERS), find(ABSORBED_HEADERS)) {
        (Some(kept), Some(absorbed)) if kept != absorbed => (kept, absorbed),
        _ => (0, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_named_columns_in_any_order() {
        let text = "Duplicate ID,Kept ID\n4,1\n\n,\n0007,3.0\n";
        let pairs = read_duplicate_pairs_from_reader(text.as_bytes(), "<test>").unwrap();
        assert_eq!(
            pairs,
            vec![
                DuplicatePair::new(IncidentKey::Numeric(1), IncidentKey::Numeric(4)),
                DuplicatePair::new(IncidentKey::Numeric(3), IncidentKey::Numeric(7)),
            ]
        );
    }

    #[test]
    fn falls_back_to_positional_columns() {
        let text = "a,b\n10,11\n";
        let pairs = read_duplicate_pairs_from_reader(text.as_bytes(), "<test>").unwrap();
        assert_eq!(
            pairs,
            vec![DuplicatePair::new(IncidentKey::Numeric(10), IncidentKey::Numeric(11))]
        );
    }

    #[test]
    fn rejects_half_blank_rows() {
        let text = "kept,absorbed\n1,2\n3,\n";
        let err = read_duplicate_pairs_from_reader(text.as_bytes(), "dups.csv").unwrap_err();
        match err {
            IngestError::DuplicateList { line, message, .. } => {
                assert_eq!(line, 3);
                assert_eq!(message, "missing absorbed id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
