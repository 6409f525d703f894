//! Field normalization for the incident master dataset.
//!
//! Every transform is pure: the same raw value and field type always yield the
//! same [`Normalized`] result.
//!
//! - **datetime**: multi-format date parsing to ISO 8601 with preserved precision
//! - **label**: leading ordinal prefix stripping (`"1. Bias"` → `"Bias"`)
//! - **code**: alias lookup for internal codes
//! - **numeric**: number parsing and rendering
//! - **normalizer**: dispatch per canonical field type

pub mod code;
pub mod datetime;
pub mod label;
pub mod normalized;
pub mod normalizer;
pub mod numeric;

pub use code::CodeTable;
pub use datetime::{DatePrecision, compose_date, month_number, normalize_date, parse_date_text};
pub use label::{normalize_label, strip_ordinal_prefix};
pub use normalized::Normalized;
pub use normalizer::{FieldNormalizer, normalize_text};
pub use numeric::{format_numeric, normalize_numeric, parse_numeric};
