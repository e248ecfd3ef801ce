//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sift",
    version,
    about = "Filter, merge and collect multilingual workbook data",
    long_about = "Apply named pattern rules to language-partitioned workbooks,\n\
                  merge and deduplicate workbooks from multiple sources, and\n\
                  collect social-media search results into per-language sheets."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply pattern rules to workbook data and export matching rows.
    Analyze(AnalyzeArgs),

    /// Merge workbooks from multiple sources and drop duplicate rows.
    Merge(MergeArgs),

    /// Poll the search API and export collected rows per language.
    Collect(CollectArgs),

    /// Validate the rule files in a patterns directory.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct AnalyzeArgs {
    /// Directory of input workbooks (one subdirectory of language CSVs each).
    #[arg(value_name = "INPUT_DIR", default_value = "data/input")]
    pub input_dir: PathBuf,

    /// Directory of rule JSON files.
    #[arg(long = "patterns-dir", value_name = "DIR", default_value = "data/patterns")]
    pub patterns_dir: PathBuf,

    /// Output directory for the analysis workbook.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/output")]
    pub output_dir: PathBuf,

    /// Directory for validation report logs.
    #[arg(long = "log-dir", value_name = "DIR", default_value = "data/log")]
    pub log_dir: PathBuf,
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Directory of input workbooks and loose CSV files.
    #[arg(value_name = "INPUT_DIR", default_value = "data/input")]
    pub input_dir: PathBuf,

    /// Output directory for the merged workbook.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "data/output")]
    pub output_dir: PathBuf,

    /// Skip the combined `all` sheet.
    #[arg(long = "no-all-sheet")]
    pub no_all_sheet: bool,
}

#[derive(Parser)]
pub struct CollectArgs {
    /// Override the configured tweet quota.
    #[arg(long = "max-tweets", value_name = "N")]
    pub max_tweets: Option<usize>,

    /// Override the configured output directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Directory of rule JSON files.
    #[arg(value_name = "PATTERNS_DIR", default_value = "data/patterns")]
    pub patterns_dir: PathBuf,

    /// Also write the validation report to the log directory.
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
