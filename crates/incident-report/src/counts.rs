use std::collections::BTreeMap;

use incident_core::MasterTable;

/// Label used for blank cells in value counts.
pub const MISSING_LABEL: &str = "missing";

/// The `n` most frequent values of `column`, most frequent first; ties are
/// broken alphabetically. Blank cells count as [`MISSING_LABEL`]. Unknown
/// columns yield an empty list.
pub fn top_counts(table: &MasterTable, column: &str, n: usize) -> Vec<(String, usize)> {
    if !table.columns().iter().any(|name| name.as_str() == column) {
        return Vec::new();
    }
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in table.records() {
        let value = table
            .cell(record, column)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| MISSING_LABEL.to_string());
        *counts.entry(value).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
    ranked.truncate(n);
    ranked
}
