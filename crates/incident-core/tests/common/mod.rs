#![allow(dead_code)]

use incident_model::{DuplicatePair, IncidentKey, RawValue, SourceName, SourceTable};
use incident_registry::SchemaRegistry;

pub const REGISTRY: &str = r#"
key = "incident_id"
priority = ["s1", "s2", "s3"]

[[fields]]
name = "incident_id"
type = "text"
required = true

[[fields]]
name = "title"
type = "text"

[[fields]]
name = "incident_date"
type = "date"

[[fields]]
name = "sector"
type = "label"

[[fields]]
name = "ai_system"
type = "code"
codes = "tri_state"

[[fields]]
name = "injuries"
type = "numeric"

[sources.s1]
columns = [
    { raw = "id", field = "incident_id" },
    { raw = "title", field = "title" },
    { raw = "date", field = "incident_date" },
]

[sources.s2]
header_style = "snake_case"
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "sector", field = "sector" },
    { parts = { year = "year", month = "month", day = "day" }, field = "incident_date" },
]

[sources.s3]
columns = [
    { raw = "Incident ID", field = "incident_id" },
    { raw = "Sector", field = "sector" },
    { raw = "AI System", field = "ai_system" },
    { raw = "Injuries", field = "injuries" },
]
"#;

pub fn registry() -> SchemaRegistry {
    SchemaRegistry::from_toml_str(REGISTRY).expect("test registry")
}

pub fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> SourceTable {
    let mut table = SourceTable::new(
        SourceName::new(name).expect("source name"),
        columns.iter().map(|column| (*column).to_string()).collect(),
    )
    .expect("table");
    for row in rows {
        table
            .push_row(row.iter().map(|cell| RawValue::text(*cell)).collect())
            .expect("row");
    }
    table
}

pub fn key(value: u64) -> IncidentKey {
    IncidentKey::Numeric(value)
}

pub fn pair(kept: u64, absorbed: u64) -> DuplicatePair {
    DuplicatePair::new(key(kept), key(absorbed))
}

/// Sources with keys {1,2,3}, {2,3,4}, {3,4,5}.
pub fn scenario_tables() -> Vec<SourceTable> {
    vec![
        table(
            "s1",
            &["id", "title", "date"],
            &[
                &["1", "Chatbot insults user", "2019-03-05"],
                &["2", "Loan model bias", "March 2020"],
                &["3", "Drone misfire", "not a date"],
            ],
        ),
        table(
            "s2",
            &["incident_id", "sector", "year", "month", "day"],
            &[
                &["2", "1. Finance", "2020.0", "3", ""],
                &["3", "2. Defense", "2021", "Jan", "7"],
                &["4", "3. Healthcare", "2018", "", ""],
            ],
        ),
        table(
            "s3",
            &["Incident ID", "Sector", "AI System", "Injuries"],
            &[
                &["3", "Defense", "Y", "2.0"],
                &["4", "Healthcare", "unclear", "0"],
                &["5", "Transport", "no", "many"],
            ],
        ),
    ]
}
