mod common;

use common::{key, pair, registry, scenario_tables, table};
use incident_core::{BuildError, BuildOptions, MasterTableBuilder};
use incident_model::{FieldType, HealthFinding, IncidentKey};

#[test]
fn scenario_merges_and_deduplicates() {
    let builder = MasterTableBuilder::new(registry());
    let output = builder
        .build(&scenario_tables(), &[pair(1, 4)])
        .expect("build");
    let table = &output.table;

    let keys: Vec<&IncidentKey> = table.records().iter().map(|record| record.key()).collect();
    assert_eq!(keys, vec![&key(1), &key(2), &key(3), &key(5)]);

    let survivor = table.record(&key(1)).expect("record 1");
    assert_eq!(survivor.value("title"), Some("Chatbot insults user"));
    assert_eq!(survivor.value("incident_date"), Some("2019-03-05"));
    assert_eq!(survivor.value("sector"), Some("Healthcare"));
    assert_eq!(survivor.value("ai_system"), Some("unclear"));
    assert_eq!(survivor.value("injuries"), Some("0"));
    assert!(survivor.absorbed().contains(&key(4)));
    let sources: Vec<&str> = survivor.sources().iter().map(|s| s.as_str()).collect();
    assert_eq!(sources, vec!["s1", "s2", "s3"]);
    // The date from 4 lost against the date already held by 1.
    assert!(output.report.conflicts.iter().any(|conflict| conflict.key == key(1)
        && conflict.field.as_str() == "incident_date"
        && conflict.absorbed_key == Some(key(4))));

    assert_eq!(output.report.records_merged, 5);
    assert_eq!(output.report.records_final, 4);
    assert_eq!(output.report.dedup.absorbed, 1);
    assert!(output.report.dedup.warnings.is_empty());
}

#[test]
fn normalizes_values_and_counts_failures() {
    let output = MasterTableBuilder::new(registry())
        .build(&scenario_tables(), &[])
        .expect("build");
    let table = &output.table;

    let two = table.record(&key(2)).expect("record 2");
    assert_eq!(two.value("incident_date"), Some("2020-03"));
    assert_eq!(two.value("sector"), Some("Finance"));

    let three = table.record(&key(3)).expect("record 3");
    // Unparseable text still wins as the first non-blank value.
    assert_eq!(three.value("incident_date"), Some("not a date"));
    assert!(three.field("incident_date").unwrap().value.is_unparseable());
    assert_eq!(three.value("ai_system"), Some("yes"));
    let sector = three.field("sector").unwrap();
    assert_eq!(sector.provenance.len(), 2);

    let five = table.record(&key(5)).expect("record 5");
    assert_eq!(five.value("injuries"), Some("many"));

    let report = &output.report;
    assert_eq!(report.parse_failures.get("incident_date"), Some(&1));
    assert_eq!(report.parse_failures.get("injuries"), Some(&1));
    assert_eq!(report.parse_failure_count(), 2);
    let warning = report
        .parse_warnings
        .iter()
        .find(|warning| warning.field.as_str() == "injuries")
        .expect("injuries warning");
    assert_eq!(warning.field_type, FieldType::Numeric);
    assert_eq!(warning.key, key(5));
    assert_eq!(report.unmapped_codes["ai_system"]["unclear"], 1);
    assert_eq!(report.sources["s2"].rows_merged, 3);
    assert!(!report.registry_fingerprint.is_empty());
}

#[test]
fn higher_priority_source_wins_conflicts() {
    let tables = vec![
        table("s1", &["id", "title", "date"], &[&["7", "Triage tool", ""]]),
        table(
            "s2",
            &["incident_id", "sector", "year", "month", "day"],
            &[&["7", "Healthcare", "", "", ""]],
        ),
        table(
            "s3",
            &["Incident ID", "Sector", "AI System", "Injuries"],
            &[&["7", "Finance", "", ""]],
        ),
    ];
    let output = MasterTableBuilder::new(registry())
        .build(&tables, &[])
        .expect("build");
    let record = output.table.record(&key(7)).expect("record");
    assert_eq!(record.value("sector"), Some("Healthcare"));
    assert_eq!(output.report.conflict_count(), 1);
    let conflict = &output.report.conflicts[0];
    assert_eq!(conflict.key, key(7));
    assert_eq!(conflict.field.as_str(), "sector");
    assert_eq!(conflict.kept_source.as_str(), "s2");
    assert_eq!(conflict.rejected_source.as_str(), "s3");
    assert_eq!(conflict.rejected_value, "Finance");
}

#[test]
fn missing_required_column_blocks_the_run() {
    let mut tables = scenario_tables();
    tables[2] = table(
        "s3",
        &["ID", "Sector", "AI System", "Injuries"],
        &[&["3", "Defense", "Y", "2"]],
    );
    let err = MasterTableBuilder::new(registry())
        .build(&tables, &[])
        .unwrap_err();
    let BuildError::SchemaHealth { reports } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].source.as_str(), "s3");
    assert!(reports[0].findings().iter().any(|finding| matches!(
        finding,
        HealthFinding::MissingRequired { field, .. } if field.as_str() == "incident_id"
    )));
    assert_eq!(err.health_reports().len(), 1);
}

#[test]
fn absent_source_blocks_unless_allowed() {
    let tables: Vec<_> = scenario_tables().into_iter().take(2).collect();
    let err = MasterTableBuilder::new(registry())
        .build(&tables, &[])
        .unwrap_err();
    assert!(matches!(err, BuildError::SchemaHealth { .. }));

    let output = MasterTableBuilder::new(registry())
        .with_options(BuildOptions {
            allow_missing_sources: true,
        })
        .build(&tables, &[])
        .expect("build with missing source allowed");
    assert_eq!(output.table.len(), 4);
    assert_eq!(output.report.health_warning_count(), 1);
}

#[test]
fn unknown_and_repeated_sources_are_rejected() {
    let builder = MasterTableBuilder::new(registry());
    let stray = table("wiki", &["id"], &[&["1"]]);
    assert!(matches!(
        builder.build(&[stray], &[]),
        Err(BuildError::UnknownSource { .. })
    ));

    let mut tables = scenario_tables();
    tables.push(tables[0].clone());
    assert!(matches!(
        builder.build(&tables, &[]),
        Err(BuildError::DuplicateSource { .. })
    ));
}

#[test]
fn chained_duplicates_converge_to_one_record() {
    let tables = vec![
        table(
            "s1",
            &["id", "title", "date"],
            &[&["10", "Original", ""], &["11", "", "2020-01-01"]],
        ),
        table(
            "s2",
            &["incident_id", "sector", "year", "month", "day"],
            &[&["12", "Retail", "", "", ""]],
        ),
        table("s3", &["Incident ID", "Sector", "AI System", "Injuries"], &[]),
    ];
    let builder = MasterTableBuilder::new(registry());
    let forward = builder
        .build(&tables, &[pair(10, 11), pair(11, 12)])
        .expect("forward");
    let backward = builder
        .build(&tables, &[pair(11, 12), pair(10, 11)])
        .expect("backward");
    assert_eq!(forward.table, backward.table);
    assert_eq!(forward.table.len(), 1);
    let record = forward.table.record(&key(10)).expect("survivor");
    assert_eq!(record.value("title"), Some("Original"));
    assert_eq!(record.value("incident_date"), Some("2020-01-01"));
    assert_eq!(record.value("sector"), Some("Retail"));
    assert_eq!(record.absorbed().len(), 2);
}

#[test]
fn rebuilding_is_idempotent() {
    let builder = MasterTableBuilder::new(registry());
    let first = builder
        .build(&scenario_tables(), &[pair(1, 4)])
        .expect("first");
    let second = builder
        .build(&scenario_tables(), &[pair(1, 4)])
        .expect("second");
    assert_eq!(first.table, second.table);
    assert_eq!(first.report, second.report);
}

#[test]
fn blank_keys_are_skipped_and_counted() {
    let mut tables = scenario_tables();
    tables[0] = table(
        "s1",
        &["id", "title", "date"],
        &[&["1", "Kept", ""], &["", "No key", "2020"], &["0001", "Same key", ""]],
    );
    let output = MasterTableBuilder::new(registry())
        .build(&tables, &[])
        .expect("build");
    let summary = &output.report.sources["s1"];
    assert_eq!(summary.rows_read, 3);
    assert_eq!(summary.rows_without_key, 1);
    assert_eq!(summary.rows_merged, 2);
    // Same-source rows for one key merge in content order; the loser is a conflict.
    let record = output.table.record(&key(1)).expect("record");
    assert_eq!(record.value("title"), Some("Kept"));
    assert!(output.report.conflicts.iter().any(|conflict| {
        conflict.kept_source == conflict.rejected_source && conflict.rejected_value == "Same key"
    }));
}
