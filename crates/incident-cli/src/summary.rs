use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use incident_cli::types::BuildSummary;
use incident_model::{FindingSeverity, HealthReport, RunReport, SourceName};
use incident_report::DictionaryEntry;

/// Conflicts listed individually before the table is cut off.
const CONFLICT_ROWS: usize = 20;

pub fn print_build_summary(summary: &BuildSummary) {
    let report = &summary.report;
    if let Some(outputs) = &summary.outputs {
        println!("Master table: {}", outputs.master.display());
        println!("Run report: {}", outputs.report.display());
    } else {
        println!("Dry run: no files written");
    }
    if let Some(digest) = &report.master_digest {
        println!("Digest: {digest}");
    }
    println!("Registry: {}", report.registry_fingerprint);

    print_source_table(report);
    print_totals(report);
    print_findings(&report.health);
    print_conflicts(report);
    print_dedup_warnings(report);
    print_top_values(summary);
}

pub fn print_blocked(reports: &[HealthReport]) {
    eprintln!("Schema health check failed; nothing was merged.");
    print_findings(reports);
}

pub fn print_health(reports: &[HealthReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Status"),
        header_cell("Block"),
        header_cell("Warn"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for report in reports {
        let status = if report.has_blocking() {
            Cell::new("BLOCK")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        } else if report.is_clean() {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new("WARN").fg(Color::Yellow)
        };
        table.add_row(vec![
            source_cell(report.source.as_str()),
            status,
            count_cell(report.blocking_count(), Color::Red),
            count_cell(report.warning_count(), Color::Yellow),
        ]);
    }
    println!("{table}");
    print_findings(reports);
}

pub fn print_fields(entries: &[DictionaryEntry]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Sources"),
        header_cell("Description"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for entry in entries {
        let required = if entry.required {
            Cell::new("yes").add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        let sources: Vec<&str> = entry.sources.iter().map(SourceName::as_str).collect();
        table.add_row(vec![
            Cell::new(entry.field.as_str()).add_attribute(Attribute::Bold),
            Cell::new(entry.field_type),
            required,
            Cell::new(sources.join(", ")),
            Cell::new(&entry.description),
        ]);
    }
    println!("{table}");
}

fn print_source_table(report: &RunReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Rows"),
        header_cell("Merged"),
        header_cell("No key"),
        header_cell("Findings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for health in &report.health {
        let (read, merged, without_key) = match report.sources.get(&health.source) {
            Some(summary) => (
                Cell::new(summary.rows_read),
                Cell::new(summary.rows_merged),
                count_cell(summary.rows_without_key, Color::Yellow),
            ),
            None => (dim_cell("-"), dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            source_cell(health.source.as_str()),
            read,
            merged,
            without_key,
            count_cell(health.findings().len(), Color::Yellow),
        ]);
    }
    println!("{table}");
}

fn print_totals(report: &RunReport) {
    let mut table = Table::new();
    apply_compact_table_style(&mut table);
    let rows = [
        ("Records merged", report.records_merged, None),
        ("Records final", report.records_final, None),
        ("Duplicates absorbed", report.dedup.absorbed, None),
        ("Ids promoted", report.dedup.promoted, None),
        ("Conflicts", report.conflict_count(), Some(Color::Yellow)),
        (
            "Parse failures",
            report.parse_failure_count(),
            Some(Color::Yellow),
        ),
        (
            "Duplicate list warnings",
            report.dedup.warnings.len(),
            Some(Color::Yellow),
        ),
    ];
    for (label, value, color) in rows {
        let value_cell = match color {
            Some(color) => count_cell(value, color),
            None => Cell::new(value).add_attribute(Attribute::Bold),
        };
        table.add_row(vec![Cell::new(label), value_cell]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    println!("{table}");

    if !report.parse_failures.is_empty() {
        let parts: Vec<String> = report
            .parse_failures
            .iter()
            .map(|(field, count)| format!("{field} ({count})"))
            .collect();
        println!("Unparseable values: {}", parts.join(", "));
    }
    for (field, codes) in &report.unmapped_codes {
        let parts: Vec<String> = codes
            .iter()
            .map(|(code, count)| format!("{code:?} ({count})"))
            .collect();
        println!("Unmapped {field} codes: {}", parts.join(", "));
    }
}

fn print_findings(reports: &[HealthReport]) {
    let mut findings = Vec::new();
    for report in reports {
        for finding in report.findings() {
            findings.push((report.source.as_str(), finding));
        }
    }
    if findings.is_empty() {
        return;
    }
    findings.sort_by(|left, right| {
        left.1
            .severity()
            .cmp(&right.1.severity())
            .then_with(|| left.0.cmp(right.0))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Severity"),
        header_cell("Finding"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (source, finding) in findings {
        table.add_row(vec![
            source_cell(source),
            severity_cell(finding.severity()),
            Cell::new(finding.message()),
        ]);
    }
    println!();
    println!("Schema health:");
    println!("{table}");
}

fn print_conflicts(report: &RunReport) {
    if report.conflicts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Field"),
        header_cell("Kept"),
        header_cell("Discarded"),
    ]);
    apply_summary_table_style(&mut table);
    for conflict in report.conflicts.iter().take(CONFLICT_ROWS) {
        let key = match &conflict.absorbed_key {
            Some(absorbed) => format!("{} (from {absorbed})", conflict.key),
            None => conflict.key.to_string(),
        };
        table.add_row(vec![
            Cell::new(key),
            Cell::new(conflict.field.as_str()),
            Cell::new(format!(
                "{} [{}]",
                conflict.kept_value, conflict.kept_source
            )),
            Cell::new(format!(
                "{} [{}]",
                conflict.rejected_value, conflict.rejected_source
            ))
            .fg(Color::DarkGrey),
        ]);
    }
    println!();
    println!("Conflicts:");
    println!("{table}");
    let hidden = report.conflicts.len().saturating_sub(CONFLICT_ROWS);
    if hidden > 0 {
        println!("... and {hidden} more (see run_report.json)");
    }
}

fn print_dedup_warnings(report: &RunReport) {
    if report.dedup.warnings.is_empty() {
        return;
    }
    println!();
    println!("Duplicate list:");
    for warning in &report.dedup.warnings {
        println!("- {}", warning.message());
    }
}

fn print_top_values(summary: &BuildSummary) {
    if summary.top_values.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Top values")]);
    apply_summary_table_style(&mut table);
    for top in &summary.top_values {
        let values: Vec<String> = top
            .values
            .iter()
            .map(|(value, count)| format!("{value} ({count})"))
            .collect();
        table.add_row(vec![
            Cell::new(top.field.as_str()).add_attribute(Attribute::Bold),
            Cell::new(values.join("\n")),
        ]);
    }
    println!();
    println!("Value counts:");
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_compact_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: FindingSeverity) -> Cell {
    match severity {
        FindingSeverity::Block => Cell::new("BLOCK")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        FindingSeverity::Warn => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn source_cell(source: &str) -> Cell {
    Cell::new(source)
        .fg(Color::Green)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
