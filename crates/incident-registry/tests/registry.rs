//! Configuration validation tests for the schema registry.

use std::fs;

use incident_registry::{ConfigError, SchemaRegistry};

fn registry(body: &str) -> Result<SchemaRegistry, ConfigError> {
    SchemaRegistry::from_toml_str(body)
}

const FIELDS: &str = r#"
key = "incident_id"
priority = ["aiid", "gmf"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "title"
type = "text"

[[fields]]
name = "ai_goal"
type = "label"
"#;

#[test]
fn rejects_incompatible_declared_types_for_one_field() {
    let body = r#"
key = "incident_id"
priority = ["aiid"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "notes"
type = "text"
combine = "join"

[sources.aiid]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "note_date", field = "notes", type = "date" },
    { raw = "note_count", field = "notes", type = "numeric" },
]
"#;
    let err = registry(body).unwrap_err();
    assert!(
        matches!(err, ConfigError::IncompatibleTypes { ref field, .. } if field == "notes"),
        "{err}"
    );
}

#[test]
fn rejects_declared_type_that_contradicts_field() {
    let body = r#"
key = "incident_id"
priority = ["aiid"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "incident_date"
type = "date"

[sources.aiid]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "date", field = "incident_date", type = "numeric" },
]
"#;
    assert!(matches!(
        registry(body).unwrap_err(),
        ConfigError::DeclaredTypeMismatch { .. }
    ));
}

#[test]
fn rejects_field_absent_from_every_source() {
    let body = format!(
        r#"{FIELDS}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "title" }},
]

[sources.gmf]
columns = [{{ raw = "Incident ID", field = "incident_id" }}]
"#
    );
    let err = registry(&body).unwrap_err();
    assert!(matches!(err, ConfigError::UnsourcedField { ref field } if field == "ai_goal"));
}

#[test]
fn rejects_shared_field_without_combine_rule() {
    let body = format!(
        r#"{FIELDS}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "title" }},
]

[sources.gmf]
columns = [
    {{ raw = "Incident ID", field = "incident_id" }},
    {{ raw = "Known AI Goal", field = "ai_goal" }},
    {{ raw = "Potential AI Goal", field = "ai_goal" }},
]
"#
    );
    assert!(matches!(
        registry(&body).unwrap_err(),
        ConfigError::MissingCombineRule { count: 2, .. }
    ));
}

#[test]
fn rejects_mapping_to_unknown_field() {
    let body = format!(
        r#"{FIELDS}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "headline" }},
]

[sources.gmf]
columns = [{{ raw = "Incident ID", field = "incident_id" }}]
"#
    );
    assert!(matches!(
        registry(&body).unwrap_err(),
        ConfigError::UnknownField { .. }
    ));
}

#[test]
fn rejects_source_without_key() {
    let body = format!(
        r#"{FIELDS}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "title" }},
]

[sources.gmf]
columns = [{{ raw = "Known AI Goal", field = "ai_goal" }}]
"#
    );
    assert!(matches!(
        registry(&body).unwrap_err(),
        ConfigError::KeyNotMapped { ref source_name, .. } if source_name == "gmf"
    ));
}

#[test]
fn rejects_duplicate_raw_column() {
    let body = format!(
        r#"{FIELDS}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "incident_id", field = "title" }},
]

[sources.gmf]
columns = [
    {{ raw = "Incident ID", field = "incident_id" }},
    {{ raw = "Known AI Goal", field = "ai_goal" }},
]
"#
    );
    assert!(matches!(
        registry(&body).unwrap_err(),
        ConfigError::DuplicateRawColumn { .. }
    ));
}

#[test]
fn rejects_incomplete_priority_order() {
    let body = r#"
key = "incident_id"
priority = ["aiid"]

[[fields]]
name = "incident_id"
type = "text"

[sources.aiid]
columns = [{ raw = "incident_id", field = "incident_id" }]

[sources.gmf]
columns = [{ raw = "Incident ID", field = "incident_id" }]
"#;
    assert!(matches!(
        registry(body).unwrap_err(),
        ConfigError::UnprioritizedSource { ref source_name } if source_name == "gmf"
    ));

    let duplicated = body.replace(r#"priority = ["aiid"]"#, r#"priority = ["aiid", "gmf", "aiid"]"#);
    assert!(matches!(
        registry(&duplicated).unwrap_err(),
        ConfigError::DuplicatePrioritySource { .. }
    ));

    let unknown = body.replace(r#"priority = ["aiid"]"#, r#"priority = ["aiid", "gmf", "mit"]"#);
    assert!(matches!(
        registry(&unknown).unwrap_err(),
        ConfigError::UnknownPrioritySource { .. }
    ));
}

#[test]
fn rejects_unknown_code_table_and_field_type() {
    let body = r#"
key = "incident_id"
priority = ["aiid"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "intent"
type = "code"
codes = "intent"

[sources.aiid]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "Intent", field = "intent" },
]
"#;
    assert!(matches!(
        registry(body).unwrap_err(),
        ConfigError::UnknownCodeTable { .. }
    ));

    let bad_type = body.replace(r#"type = "code""#, r#"type = "blob""#);
    assert!(matches!(
        registry(&bad_type).unwrap_err(),
        ConfigError::UnknownFieldType { .. }
    ));
}

#[test]
fn rejects_date_parts_on_text_field() {
    let body = r#"
key = "incident_id"
priority = ["cset"]

[[fields]]
name = "incident_id"
type = "text"

[[fields]]
name = "title"
type = "text"

[sources.cset]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { parts = { year = "y", month = "m" }, field = "title" },
]
"#;
    assert!(matches!(
        registry(body).unwrap_err(),
        ConfigError::PartsOnNonDateField { .. }
    ));
}

#[test]
fn reports_toml_errors_with_origin() {
    let err = registry("key = ").unwrap_err();
    assert!(matches!(err, ConfigError::Toml { ref origin, .. } if origin == "<inline>"));
}

fn two_source_body(extra: &str) -> String {
    format!(
        r#"{FIELDS}
{extra}
[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "title" }},
]

[sources.gmf]
columns = [
    {{ raw = "Incident ID", field = "incident_id" }},
    {{ raw = "Known AI Goal", field = "ai_goal" }},
]
"#
    )
}

#[test]
fn fingerprint_digests_the_registry_contents() {
    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    let first = registry(&two_source_body("")).expect("registry");
    let again = registry(&two_source_body("")).expect("registry");
    let changed = registry(&two_source_body("[codes.tri_state]\n\"unclear\" = \"maybe\"\n"))
        .expect("registry");

    let fingerprint = first.fingerprint();
    assert_eq!(fingerprint.len(), 64);
    assert!(fingerprint.chars().all(|ch| ch.is_ascii_hexdigit()));
    assert_ne!(fingerprint, EMPTY_SHA256);
    assert_eq!(fingerprint, again.fingerprint());
    assert_ne!(fingerprint, changed.fingerprint());
}

#[test]
fn loads_registry_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("registry.toml");
    let body = format!(
        r#"{FIELDS}
[codes.tri_state]
"unclear" = "maybe"

[sources.aiid]
columns = [
    {{ raw = "incident_id", field = "incident_id" }},
    {{ raw = "title", field = "title" }},
]

[sources.gmf]
columns = [
    {{ raw = "Incident ID", field = "incident_id" }},
    {{ raw = "Known AI Goal", field = "ai_goal" }},
]
"#
    );
    fs::write(&path, body).expect("write registry");
    let registry = SchemaRegistry::load(&path).expect("load registry");
    let tri_state = registry.code_table("tri_state").expect("tri_state");
    assert_eq!(tri_state.get("unclear").map(String::as_str), Some("maybe"));
    assert_eq!(tri_state.get("y").map(String::as_str), Some("yes"));

    let missing = SchemaRegistry::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));
}
