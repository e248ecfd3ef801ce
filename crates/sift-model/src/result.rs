#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::Row;

/// The terminal artifact of a match run.
///
/// `matches` maps rule name -> language -> matching rows in source order.
/// A (rule, language) pair with zero matches is absent from the inner map,
/// never stored as an empty collection; consumers must treat absent and
/// empty as equivalent.
#[derive(Debug, Clone, Default)]
pub struct MatchResult {
    pub matches: BTreeMap<String, BTreeMap<String, Vec<Row>>>,
    /// Per rule, the normalized columns it references, in declared order.
    /// Used only for output column ordering, not matching.
    pub column_mapping: BTreeMap<String, Vec<String>>,
    /// Column order of each language sheet, captured so exports can place
    /// non-referenced columns in their source order.
    pub data_columns: BTreeMap<String, Vec<String>>,
}

impl MatchResult {
    /// Rows matched for one rule across all languages.
    pub fn rule_total(&self, rule: &str) -> usize {
        self.matches
            .get(rule)
            .map(|langs| langs.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    /// Builds the per-run bookkeeping summary.
    pub fn summary(&self) -> RunSummary {
        let mut rules = Vec::new();
        let mut languages = std::collections::BTreeSet::new();
        let mut total_rows = 0usize;
        for (name, langs) in &self.matches {
            let mut counts = Vec::new();
            let mut rule_rows = 0usize;
            for (language, rows) in langs {
                languages.insert(language.clone());
                rule_rows += rows.len();
                counts.push(LanguageCount {
                    language: language.clone(),
                    rows: rows.len(),
                });
            }
            total_rows += rule_rows;
            rules.push(RuleSummary {
                name: name.clone(),
                total_rows: rule_rows,
                by_language: counts,
            });
        }
        RunSummary {
            total_rules: self.matches.len(),
            languages_searched: languages.into_iter().collect(),
            total_matching_rows: total_rows,
            rules,
        }
    }
}

/// Match count for one language under one rule.
#[derive(Debug, Clone)]
pub struct LanguageCount {
    pub language: String,
    pub rows: usize,
}

/// Per-rule slice of the run summary.
#[derive(Debug, Clone)]
pub struct RuleSummary {
    pub name: String,
    pub total_rows: usize,
    pub by_language: Vec<LanguageCount>,
}

/// Bookkeeping for one engine run, rendered by the CLI.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total_rules: usize,
    pub languages_searched: Vec<String>,
    pub total_matching_rows: usize,
    pub rules: Vec<RuleSummary>,
}
