//! Numeric normalization utilities.

use incident_model::RawValue;

use crate::Normalized;

/// Parses a number, tolerating surrounding whitespace and thousands separators.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Renders a number without trailing zeros (`10.0` → `10`, `3.50` → `3.5`).
pub fn format_numeric(value: f64) -> String {
    if value == 0.0 {
        // Avoid rendering negative zero.
        return "0".to_string();
    }
    value.to_string()
}

pub fn normalize_numeric(raw: &RawValue) -> Normalized {
    match raw {
        RawValue::Blank => Normalized::Blank,
        RawValue::Number(number) if number.is_nan() => Normalized::Blank,
        RawValue::Number(number) if number.is_finite() => Normalized::Value(format_numeric(*number)),
        RawValue::Number(number) => Normalized::Unparseable(number.to_string()),
        RawValue::Date(date) => Normalized::Unparseable(date.format("%Y-%m-%d").to_string()),
        RawValue::Text(text) if text.trim().is_empty() => Normalized::Blank,
        RawValue::Text(text) => match parse_numeric(text) {
            Some(number) => Normalized::Value(format_numeric(number)),
            None => Normalized::Unparseable(text.trim().to_string()),
        },
    }
}
