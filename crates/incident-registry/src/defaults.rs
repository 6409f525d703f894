//! Built-in defaults applied when the registry does not override them.

use std::collections::BTreeMap;

/// Raw strings that mean "no value" in the upstream extracts.
pub const DEFAULT_BLANK_TOKENS: &[&str] = &["nan", "NaN", "null", "NULL", "None"];

/// Name of the built-in yes/no/maybe code table.
pub const TRI_STATE_TABLE: &str = "tri_state";

const TRI_STATE_ALIASES: &[(&str, &str)] = &[
    ("yes", "yes"),
    ("no", "no"),
    ("maybe", "maybe"),
    ("true", "yes"),
    ("false", "no"),
    ("y", "yes"),
    ("n", "no"),
];

/// Code tables available without any configuration. Alias keys are lower-case.
pub fn builtin_code_tables() -> BTreeMap<String, BTreeMap<String, String>> {
    let tri_state = TRI_STATE_ALIASES
        .iter()
        .map(|(alias, canonical)| ((*alias).to_string(), (*canonical).to_string()))
        .collect();
    BTreeMap::from([(TRI_STATE_TABLE.to_string(), tri_state)])
}
