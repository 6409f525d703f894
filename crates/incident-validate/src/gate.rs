use std::collections::BTreeSet;

use incident_model::{HealthFinding, HealthReport, SourceName};

/// Outcome of checking all health reports of a run before merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateDecision {
    pub blocked: bool,
    pub blocking_sources: Vec<SourceName>,
}

/// Blocks the run when any report carries a block-level finding.
pub fn gate_reports(reports: &[HealthReport]) -> GateDecision {
    let blocking: BTreeSet<SourceName> = reports
        .iter()
        .filter(|report| report.has_blocking())
        .map(|report| report.source.clone())
        .collect();
    GateDecision {
        blocked: !blocking.is_empty(),
        blocking_sources: blocking.into_iter().collect(),
    }
}

/// Report for a configured source that was not supplied to the run.
pub fn missing_source_report(source: SourceName, blocking: bool) -> HealthReport {
    HealthReport::new(source, vec![HealthFinding::SourceNotSupplied { blocking }])
}
