//! Schema registry for the incident master dataset.
//!
//! The registry is configuration, not code: a TOML document declares the
//! canonical field order, the incident key, per-source column mappings, code
//! alias tables and the source priority order. Everything is validated once at
//! load time; a registry that loads is safe to hand to any number of runs.

#![deny(unsafe_code)]

pub mod config;
pub mod defaults;
pub mod error;
pub mod registry;

pub use crate::config::{ColumnConfig, DatePartsConfig, FieldConfig, RegistryConfig, SourceConfig};
pub use crate::defaults::{DEFAULT_BLANK_TOKENS, TRI_STATE_TABLE};
pub use crate::error::ConfigError;
pub use crate::registry::{DEFAULT_REGISTRY_TOML, SchemaRegistry};
