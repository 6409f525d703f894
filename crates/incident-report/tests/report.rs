use std::fs;

use incident_core::{BuildOutput, MasterTableBuilder};
use incident_model::{DuplicatePair, IncidentKey, RawValue, RunReport, SourceName, SourceTable};
use incident_registry::SchemaRegistry;
use incident_report::{
    data_dictionary, master_digest, render_dictionary_csv, render_master_csv, source_coverage,
    to_dataframe, top_counts, write_outputs,
};

const REGISTRY: &str = r#"
key = "incident_id"
priority = ["aiid", "mit"]

[[fields]]
name = "incident_id"
type = "text"
required = true
description = "Incident identifier"

[[fields]]
name = "title"
type = "text"
required = true
description = "Short title"

[[fields]]
name = "sector"
type = "label"
description = "Deployment sector"

[sources.aiid]
columns = [
    { raw = "incident_id", field = "incident_id" },
    { raw = "title", field = "title" },
]

[sources.mit]
columns = [
    { raw = "Incident ID", field = "incident_id" },
    { raw = "Title", field = "title" },
    { raw = "Sector", field = "sector" },
]
"#;

fn registry() -> SchemaRegistry {
    SchemaRegistry::from_toml_str(REGISTRY).expect("registry")
}

fn table(name: &str, columns: &[&str], rows: &[&[&str]]) -> SourceTable {
    let mut table = SourceTable::new(
        SourceName::new(name).unwrap(),
        columns.iter().map(|column| (*column).to_string()).collect(),
    )
    .unwrap();
    for row in rows {
        table
            .push_row(row.iter().map(|cell| RawValue::text(*cell)).collect())
            .unwrap();
    }
    table
}

fn build() -> BuildOutput {
    let tables = vec![
        table(
            "aiid",
            &["incident_id", "title"],
            &[&["1", "Crash"], &["2", "Leak"], &["4", "Solo"]],
        ),
        table(
            "mit",
            &["Incident ID", "Title", "Sector"],
            &[&["1", "Crash", "1. Health"], &["3", "Spoof", "Finance"]],
        ),
    ];
    let pairs = [DuplicatePair::new(
        IncidentKey::Numeric(2),
        IncidentKey::Numeric(3),
    )];
    MasterTableBuilder::new(registry())
        .build(&tables, &pairs)
        .expect("build")
}

#[test]
fn renders_data_dictionary() {
    let rendered = render_dictionary_csv(&data_dictionary(&registry())).unwrap();
    let text = String::from_utf8(rendered).unwrap();
    insta::assert_snapshot!(text, @r"
    field,type,required,description,sources
    incident_id,text,yes,Incident identifier,aiid;mit
    title,text,yes,Short title,aiid;mit
    sector,label,no,Deployment sector,mit
    ");
}

#[test]
fn renders_master_table_with_provenance_columns() {
    let output = build();
    let rendered = render_master_csv(&output.table).unwrap();
    let text = String::from_utf8(rendered.clone()).unwrap();
    insta::assert_snapshot!(text, @r"
    incident_id,title,sector,sources,merged_ids
    1,Crash,Health,aiid;mit,
    2,Leak,Finance,aiid;mit,3
    4,Solo,,aiid,
    ");
    assert_eq!(master_digest(&rendered).len(), 64);
    assert_eq!(
        master_digest(&rendered),
        master_digest(&render_master_csv(&build().table).unwrap())
    );
}

#[test]
fn computes_source_coverage() {
    let output = build();
    let sources = [SourceName::new("aiid").unwrap(), SourceName::new("mit").unwrap()];
    let coverage = source_coverage(&output.table, &sources);
    let summary: Vec<(String, String, usize, f64)> = coverage
        .iter()
        .map(|row| {
            (
                row.field.to_string(),
                row.source.to_string(),
                row.populated,
                row.percent,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("incident_id".into(), "aiid".into(), 3, 100.0),
            ("incident_id".into(), "mit".into(), 2, 66.7),
            ("title".into(), "aiid".into(), 3, 100.0),
            ("title".into(), "mit".into(), 1, 33.3),
            ("sector".into(), "aiid".into(), 0, 0.0),
            ("sector".into(), "mit".into(), 2, 66.7),
        ]
    );
}

#[test]
fn counts_top_values() {
    let output = build();
    assert_eq!(
        top_counts(&output.table, "sector", 10),
        vec![
            ("Finance".to_string(), 1),
            ("Health".to_string(), 1),
            ("missing".to_string(), 1),
        ]
    );
    assert_eq!(top_counts(&output.table, "sector", 1).len(), 1);
    assert!(top_counts(&output.table, "nope", 5).is_empty());
}

#[test]
fn builds_dataframe() {
    let output = build();
    let frame = to_dataframe(&output.table).unwrap();
    assert_eq!(frame.shape(), (3, 5));
    assert_eq!(frame.column("merged_ids").unwrap().null_count(), 2);
    assert_eq!(frame.column("sector").unwrap().null_count(), 1);
}

#[test]
fn writes_all_outputs_and_records_digest() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let mut output = build();
    let paths = write_outputs(&out, &output.table, &mut output.report, &registry()).unwrap();

    let master = fs::read(&paths.master).unwrap();
    let digest = master_digest(&master);
    assert_eq!(output.report.master_digest.as_deref(), Some(digest.as_str()));

    let json = fs::read_to_string(&paths.report).unwrap();
    let report: RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, output.report);
    assert_eq!(report.conflict_count(), 1);

    assert!(fs::read_to_string(&paths.dictionary).unwrap().starts_with("field,type"));
    assert!(fs::read_to_string(&paths.coverage).unwrap().contains("sector,mit,2,3,66.7"));
}
