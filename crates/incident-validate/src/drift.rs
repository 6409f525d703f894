use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a rename suggestion.
pub const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Returns the absent expected column most similar to `column`, if any scores
/// at least [`SUGGESTION_THRESHOLD`]. Ties go to the alphabetically first name.
pub fn suggest_column<'a>(column: &str, candidates: &BTreeSet<&'a str>) -> Option<&'a str> {
    let needle = normalize(column);
    let mut best: Option<(&'a str, f64)> = None;
    for &candidate in candidates {
        let score = jaro_winkler::similarity(needle.chars(), normalize(candidate).chars());
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_renamed_columns() {
        let candidates = BTreeSet::from(["Risk Domain", "Incident ID"]);
        assert_eq!(suggest_column("Risk_Domain ", &candidates), Some("Risk Domain"));
        assert_eq!(suggest_column("IncidentId", &candidates), Some("Incident ID"));
    }

    #[test]
    fn ignores_unrelated_columns() {
        let candidates = BTreeSet::from(["Risk Domain"]);
        assert_eq!(suggest_column("Notes", &candidates), None);
        assert_eq!(suggest_column("Notes", &BTreeSet::new()), None);
    }
}
