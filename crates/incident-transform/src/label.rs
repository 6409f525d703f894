//! Categorical label cleanup.

use std::sync::LazyLock;

use incident_model::RawValue;
use regex::Regex;

use crate::Normalized;

/// Matches `"1. Bias"`, `"2.3. Misuse"`, `"7.3 > Harm"`, `"4) Other"`,
/// `"7 - Harm"`, `"1: Label"`.
///
/// The separator must be followed by whitespace. A number followed only by
/// whitespace is not an ordinal, so `"3 Mile Island"`, `"1.5 Tons"` and
/// `"3-D printing"` are kept as they are.
static ORDINAL_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+(?:\.\d+)*\s*[.):>\-]\s+(?P<label>\S.*)$").ok()
});

/// Removes a leading ordinal prefix. Values without one are returned trimmed.
pub fn strip_ordinal_prefix(value: &str) -> &str {
    let trimmed = value.trim();
    ORDINAL_PREFIX
        .as_ref()
        .and_then(|pattern| pattern.captures(trimmed))
        .and_then(|captures| captures.name("label"))
        .map(|label| label.as_str().trim_end())
        .unwrap_or(trimmed)
}

pub fn normalize_label(raw: &RawValue) -> Normalized {
    if raw.is_blank() {
        return Normalized::Blank;
    }
    let text = raw.to_text();
    let stripped = strip_ordinal_prefix(&text);
    if stripped.is_empty() {
        return Normalized::Blank;
    }
    Normalized::Value(stripped.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_numbered_prefixes() {
        assert_eq!(strip_ordinal_prefix("1. Bias"), "Bias");
        assert_eq!(strip_ordinal_prefix("2.3. Misinformation"), "Misinformation");
        assert_eq!(strip_ordinal_prefix("7.3 > Lack of robustness"), "Lack of robustness");
        assert_eq!(strip_ordinal_prefix("4) Other"), "Other");
        assert_eq!(strip_ordinal_prefix("7 - Socioeconomic harm"), "Socioeconomic harm");
        assert_eq!(strip_ordinal_prefix("  12: Privacy  "), "Privacy");
    }

    #[test]
    fn leaves_plain_labels_alone() {
        assert_eq!(strip_ordinal_prefix("Bias"), "Bias");
        assert_eq!(strip_ordinal_prefix("3 Mile Island"), "3 Mile Island");
        assert_eq!(strip_ordinal_prefix("2019"), "2019");
        assert_eq!(strip_ordinal_prefix("1."), "1.");
    }

    #[test]
    fn keeps_labels_that_start_with_numbers() {
        assert_eq!(strip_ordinal_prefix("3-D printing"), "3-D printing");
        assert_eq!(strip_ordinal_prefix("2020-01 Outage"), "2020-01 Outage");
        assert_eq!(strip_ordinal_prefix("1.5 Tons"), "1.5 Tons");
        assert_eq!(strip_ordinal_prefix("2.3 Misinformation"), "2.3 Misinformation");
        assert_eq!(strip_ordinal_prefix("24/7 monitoring"), "24/7 monitoring");
    }

    #[test]
    fn stripping_is_idempotent() {
        for label in ["1. Bias", "Bias", "2.1. Fraud", "1.5 Tons", "3-D printing"] {
            let once = strip_ordinal_prefix(label);
            assert_eq!(strip_ordinal_prefix(once), once);
        }
    }

    #[test]
    fn blank_labels_stay_blank() {
        assert_eq!(normalize_label(&RawValue::Blank), Normalized::Blank);
        assert_eq!(
            normalize_label(&RawValue::Text("1. Bias".into())),
            Normalized::Value("Bias".into())
        );
    }
}
