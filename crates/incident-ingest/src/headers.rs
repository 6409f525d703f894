//! Header cleanup applied before mapping.

use std::collections::{BTreeMap, BTreeSet};

use incident_model::HeaderStyle;

/// Trims, drops a byte-order mark, and collapses inner whitespace.
pub fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cases and replaces every run of non-alphanumeric characters with `_`.
///
/// `"Date of Incident (Year)"` becomes `"date_of_incident_year"`.
pub fn snake_case_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in normalize_header(raw).chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(ch);
        } else {
            pending_separator = true;
        }
    }
    out
}

/// Suffixes repeated headers with `_1`, `_2`, … in order of appearance.
pub fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: BTreeSet<String> = headers.iter().cloned().collect();
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut result = Vec::with_capacity(headers.len());
    for header in headers {
        let count = seen.entry(header.clone()).or_insert(0);
        if *count == 0 {
            *count = 1;
            result.push(header);
            continue;
        }
        let mut candidate = format!("{header}_{count}");
        while taken.contains(&candidate) {
            *count += 1;
            candidate = format!("{header}_{count}");
        }
        *count += 1;
        taken.insert(candidate.clone());
        result.push(candidate);
    }
    result
}

pub(crate) fn apply_style(raw: &str, style: HeaderStyle) -> String {
    match style {
        HeaderStyle::Verbatim => normalize_header(raw),
        HeaderStyle::SnakeCase => snake_case_header(raw),
    }
}
