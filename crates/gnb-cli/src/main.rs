//! GISAID to NCBI metadata CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use gnb_cli::logging::{LogConfig, LogFormat, init_logging};
use gnb_ingest::IngestError;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_merge_biosample, run_merge_sra, run_self_test, run_view_records};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let result = match &cli.command {
        Command::MergeBiosample(args) => run_merge_biosample(args).map(|()| true),
        Command::MergeSra(args) => run_merge_sra(args).map(|()| true),
        Command::ViewRecords(args) => run_view_records(args).map(|()| true),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        Command::Test => run_self_test(),
    };
    let exit_code = match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(error) => {
            report_error(&error);
            1
        }
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) {
    if let Some(IngestError::MissingInputs { paths }) = error.downcast_ref::<IngestError>() {
        for path in paths {
            eprintln!("File not found: {}", path.display());
        }
    } else {
        eprintln!("error: {error:#}");
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
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
    LogConfig {
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        with_ansi,
        ..LogConfig::default()
    }
    .with_level_filter(level_filter)
    .with_format(format)
    .with_log_file(cli.log_file.clone())
    .with_log_data(cli.log_data)
}
