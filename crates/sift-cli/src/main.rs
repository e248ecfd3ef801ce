//! sift CLI entry point.

use clap::{ColorChoice, Parser};
use std::io::{self, IsTerminal};

mod cli;
mod commands;
mod logging;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::{run_analyze, run_collect, run_merge, run_rules};
use crate::logging::{LogConfig, LogFormat, init_logging};
use crate::summary::{
    print_analyze_summary, print_collect_summary, print_merge_summary, print_rules_summary,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Analyze(args) => match run_analyze(&args) {
            Ok(result) => {
                print_analyze_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Merge(args) => match run_merge(&args) {
            Ok(result) => {
                print_merge_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Collect(args) => match run_collect(&args) {
            Ok(result) => {
                print_collect_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Rules(args) => match run_rules(&args) {
            Ok(result) => {
                print_rules_summary(&result);
                if result.valid == result.total { 0 } else { 1 }
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !cli.verbosity.is_present();
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
