//! CLI argument definitions for `incident-master`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use incident_cli::types::{BuildRequest, CheckRequest, parse_source_arg};
use incident_ingest::SourceRequest;

#[derive(Parser)]
#[command(
    name = "incident-master",
    version,
    about = "Build the AI incident master dataset from several source extracts",
    long_about = "Validate source extracts against the schema registry, normalize their fields,\n\
                  merge them on the incident key with per-field provenance, fold known\n\
                  duplicates and write the master table with its run report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate, merge and deduplicate the sources, then write the outputs.
    Build(BuildArgs),

    /// Run the schema health check only.
    Check(CheckArgs),

    /// Print the canonical schema.
    Fields(RegistryArgs),
}

#[derive(Args)]
pub struct RegistryArgs {
    /// Schema registry TOML file (defaults to the bundled registry).
    #[arg(long = "registry", value_name = "PATH")]
    pub registry: Option<PathBuf>,
}

#[derive(Args)]
pub struct SourceArgs {
    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Source extract as NAME=PATH; repeat once per source.
    #[arg(
        long = "source",
        value_name = "NAME=PATH",
        value_parser = parse_source_arg,
        required = true
    )]
    pub sources: Vec<SourceRequest>,

    /// Treat configured sources missing from the run as a warning.
    #[arg(long = "allow-missing-sources")]
    pub allow_missing_sources: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub inputs: SourceArgs,

    /// CSV of known duplicate pairs (kept id, absorbed id).
    #[arg(long = "duplicates", value_name = "PATH")]
    pub duplicates: Option<PathBuf>,

    /// Directory receiving master.csv and the accompanying reports.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Build and summarize without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Most frequent values to list per categorical field (0 disables).
    #[arg(long = "top", value_name = "N", default_value_t = 5)]
    pub top: usize,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub inputs: SourceArgs,
}

impl BuildArgs {
    pub fn into_request(self) -> BuildRequest {
        BuildRequest {
            registry: self.inputs.registry.registry,
            sources: self.inputs.sources,
            duplicates: self.duplicates,
            output_dir: self.output_dir,
            allow_missing_sources: self.inputs.allow_missing_sources,
            dry_run: self.dry_run,
            top: self.top,
        }
    }
}

impl CheckArgs {
    pub fn into_request(self) -> CheckRequest {
        CheckRequest {
            registry: self.inputs.registry.registry,
            sources: self.inputs.sources,
            allow_missing_sources: self.inputs.allow_missing_sources,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
