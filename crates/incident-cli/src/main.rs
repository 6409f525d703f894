//! `incident-master`: builds the AI incident master dataset.

use std::io::{self, IsTerminal};
use std::process;

use clap::{ColorChoice, Parser};
use incident_cli::commands::{run_build, run_check, run_fields};
use incident_cli::logging::{LogConfig, LogFormat, init_logging};
use incident_cli::types::BuildOutcome;
use incident_model::HealthReport;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{print_blocked, print_build_summary, print_fields, print_health};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Build(args) => match run_build(&args.into_request()) {
            Ok(outcome) => {
                match &outcome {
                    BuildOutcome::Completed(summary) => print_build_summary(summary),
                    BuildOutcome::Blocked { reports } => print_blocked(reports),
                }
                outcome.exit_code()
            }
            Err(error) => report_error(&error),
        },
        Command::Check(args) => match run_check(&args.into_request()) {
            Ok(reports) => {
                print_health(&reports);
                if reports.iter().any(HealthReport::has_blocking) {
                    2
                } else {
                    0
                }
            }
            Err(error) => report_error(&error),
        },
        Command::Fields(args) => match run_fields(args.registry.as_deref()) {
            Ok(entries) => {
                print_fields(&entries);
                0
            }
            Err(error) => report_error(&error),
        },
    };
    process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Logging configuration from CLI flags. `--log-level` beats `-v`/`-q`,
/// which beat `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    let mut config = LogConfig::default()
        .with_level(level_filter)
        .with_format(format)
        .with_ansi(with_ansi)
        .with_target(format == LogFormat::Json)
        .with_timestamps(cli.log_file.is_some())
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    config
}
