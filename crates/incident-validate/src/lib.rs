//! Schema validation for raw incident sources.
//!
//! The validator compares a source's actual raw columns with what its column
//! mapping expects and returns a [`HealthReport`]. It never fails: every
//! discrepancy becomes a finding, and the caller decides whether block-level
//! findings stop the run.

#![deny(unsafe_code)]

mod drift;
mod gate;
mod validator;

pub use drift::{SUGGESTION_THRESHOLD, suggest_column};
pub use gate::{GateDecision, gate_reports, missing_source_report};
pub use validator::validate_source;
