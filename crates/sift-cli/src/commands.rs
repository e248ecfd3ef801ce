//! Subcommand implementations.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use sift_collect::{CollectConfig, CollectSession, HttpSearchClient, UnknownGender};
use sift_core::{MatchEngine, merge_and_dedupe};
use sift_ingest::{load_language_data, load_rules, load_with_provenance};
use sift_model::RunSummary;
use sift_report::{write_analysis, write_merged, write_workbook};

use crate::cli::{AnalyzeArgs, CollectArgs, MergeArgs, RulesArgs};

/// Outcome of the analyze command, rendered by the summary printer.
pub struct AnalyzeResult {
    pub summary: RunSummary,
    pub workbook: PathBuf,
    pub report_log: PathBuf,
    pub invalid_rules: usize,
}

pub fn run_analyze(args: &AnalyzeArgs) -> Result<AnalyzeResult> {
    let loaded = load_rules(&args.patterns_dir)
        .with_context(|| format!("load rules from {}", args.patterns_dir.display()))?;
    let report_log = loaded
        .report
        .write_log(&args.log_dir)
        .context("write validation report")?;
    if loaded.rules.is_empty() {
        bail!(
            "no valid rules in {} ({} file(s) rejected)",
            args.patterns_dir.display(),
            loaded.report.total_count
        );
    }

    let data = load_language_data(&args.input_dir)
        .with_context(|| format!("load workbooks from {}", args.input_dir.display()))?;
    if data.is_empty() {
        bail!("no language sheets found in {}", args.input_dir.display());
    }

    let engine = MatchEngine::compile(&loaded.rules);
    let result = engine.apply(&data);
    let workbook =
        write_analysis(&result, &args.output_dir).context("write analysis workbook")?;

    Ok(AnalyzeResult {
        summary: result.summary(),
        workbook,
        report_log,
        invalid_rules: loaded.report.total_count - loaded.report.valid_count,
    })
}

/// Outcome of the merge command.
pub struct MergeResult {
    pub workbook: PathBuf,
    pub languages: usize,
    pub stats: sift_core::DedupeStats,
}

pub fn run_merge(args: &MergeArgs) -> Result<MergeResult> {
    let sources = load_with_provenance(&args.input_dir)
        .with_context(|| format!("load sources from {}", args.input_dir.display()))?;
    let merged = merge_and_dedupe(sources);
    if merged.languages.is_empty() {
        bail!("no language sheets found in {}", args.input_dir.display());
    }
    let workbook = write_merged(
        &merged.languages,
        &merged.combined,
        &args.output_dir,
        !args.no_all_sheet,
    )
    .context("write merged workbook")?;

    Ok(MergeResult {
        workbook,
        languages: merged.languages.len(),
        stats: merged.stats,
    })
}

/// Outcome of the collect command.
pub struct CollectResult {
    pub workbook: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub counts: Vec<(String, usize)>,
}

pub fn run_collect(args: &CollectArgs) -> Result<CollectResult> {
    let mut config = CollectConfig::from_env().context("load collect configuration")?;
    if let Some(max_tweets) = args.max_tweets {
        config.max_tweets = max_tweets;
    }
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output_dir));

    let client = HttpSearchClient::new(&config).context("build search client")?;
    let mut session = CollectSession::new(&config.backup_dir);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("spinner template"),
    );
    spinner.set_message("collecting search results");
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let outcome = sift_collect::collect(&client, &config, &mut session);
    spinner.finish_and_clear();
    let outcome = outcome.context("collect search results")?;

    let workbook = if outcome.rows.is_empty() {
        info!("no rows collected, skipping export");
        None
    } else {
        let sheets = sift_collect::group_by_language(&outcome.rows, &UnknownGender);
        Some(write_workbook(&sheets, &output_dir, "tweets").context("write collected workbook")?)
    };

    Ok(CollectResult {
        workbook,
        backup: session.backup_file().map(Into::into),
        counts: outcome.counts.into_iter().collect(),
    })
}

/// Outcome of the rules command.
pub struct RulesResult {
    pub lines: Vec<String>,
    pub valid: usize,
    pub total: usize,
    pub report_log: Option<PathBuf>,
}

pub fn run_rules(args: &RulesArgs) -> Result<RulesResult> {
    let loaded = load_rules(&args.patterns_dir)
        .with_context(|| format!("load rules from {}", args.patterns_dir.display()))?;
    let report_log = match &args.log_dir {
        Some(log_dir) => Some(
            loaded
                .report
                .write_log(log_dir)
                .context("write validation report")?,
        ),
        None => None,
    };
    Ok(RulesResult {
        lines: loaded.report.lines,
        valid: loaded.report.valid_count,
        total: loaded.report.total_count,
        report_log,
    })
}
