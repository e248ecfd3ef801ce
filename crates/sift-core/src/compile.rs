//! Rule compilation.
//!
//! A raw rule maps column names to lists of raw tokens. Compilation
//! normalizes the column names, classifies every column into exactly one
//! condition kind by probing the shape of its first token, and parses the
//! tokens of numeric and date columns. An individual token that fails to
//! parse is dropped with a warning; it never aborts compilation.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, warn};

use sift_model::{
    CompareOp, CompiledField, CompiledRule, DateCondition, NumericCondition, RawRule, RuleToken,
};

use crate::normalize::{clean_pattern_text, normalize_column_name};

/// Leading comparison operator plus calendar date, e.g. `>2024-01-01`.
static DATE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>=]\d{4}-\d{2}-\d{2}").expect("date token regex"));

/// Leading comparison operator plus digits, e.g. `>1000`.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>=]\d+").expect("numeric token regex"));

/// Classifies one rule column by its token list.
///
/// The kind is decided by the first token: a date shape wins over the
/// numeric shape (every date token also starts with an operator and
/// digits), an all-boolean list is a boolean field, everything else is a
/// string field. Returns `None` for an empty token list; such a column is
/// skipped entirely.
pub fn classify_field(tokens: &[RuleToken]) -> Option<CompiledField> {
    let first = tokens.first()?;
    let probe = first.render();
    if DATE_TOKEN.is_match(&probe) {
        return Some(CompiledField::Date(parse_date_conditions(tokens)));
    }
    if NUMERIC_TOKEN.is_match(&probe) {
        return Some(CompiledField::Numeric(parse_numeric_conditions(tokens)));
    }
    if tokens.iter().all(RuleToken::is_bool) {
        let accepted = tokens
            .iter()
            .filter_map(|token| match token {
                RuleToken::Bool(value) => Some(*value),
                _ => None,
            })
            .collect();
        return Some(CompiledField::Boolean(accepted));
    }
    let cleaned = tokens
        .iter()
        .map(|token| clean_pattern_text(&token.render()))
        .collect();
    Some(CompiledField::String(cleaned))
}

/// Compiles a set of raw rules, keyed by rule name.
///
/// When two rules share a name the later one wins, matching the source
/// mapping semantics.
pub fn compile_rules(rules: &[RawRule]) -> BTreeMap<String, CompiledRule> {
    let mut compiled = BTreeMap::new();
    for rule in rules {
        compiled.insert(rule.name.clone(), compile_rule(rule));
    }
    compiled
}

fn compile_rule(rule: &RawRule) -> CompiledRule {
    let mut out = CompiledRule {
        name: rule.name.clone(),
        ..CompiledRule::default()
    };
    for (column, tokens) in &rule.pattern {
        let Some(field) = classify_field(tokens) else {
            continue;
        };
        let normalized = normalize_column_name(column);
        match field {
            CompiledField::String(patterns) => {
                out.string_fields.insert(normalized.clone(), patterns);
            }
            CompiledField::Numeric(conditions) => {
                out.numeric_fields.insert(normalized.clone(), conditions);
            }
            CompiledField::Date(conditions) => {
                out.date_fields.insert(normalized.clone(), conditions);
            }
            CompiledField::Boolean(accepted) => {
                out.boolean_fields.insert(normalized.clone(), accepted);
            }
        }
        out.columns.push(normalized);
    }
    debug!(
        rule = %rule.name,
        string = out.string_fields.len(),
        numeric = out.numeric_fields.len(),
        date = out.date_fields.len(),
        boolean = out.boolean_fields.len(),
        "compiled rule"
    );
    out
}

/// Splits a token into `(operator, rest)`, defaulting to equality when no
/// leading operator is present.
fn split_operator(token: &str) -> (CompareOp, &str) {
    let mut chars = token.chars();
    match chars.next().and_then(CompareOp::from_char) {
        Some(op) => (op, chars.as_str()),
        None => (CompareOp::Eq, token),
    }
}

fn parse_numeric_conditions(tokens: &[RuleToken]) -> Vec<NumericCondition> {
    let mut conditions = Vec::new();
    for token in tokens {
        let raw = token.render();
        let (op, rest) = split_operator(raw.trim());
        match rest.parse::<f64>() {
            Ok(value) => conditions.push(NumericCondition { op, value }),
            Err(error) => {
                warn!(token = %raw, %error, "dropping unparsable numeric condition");
            }
        }
    }
    conditions
}

fn parse_date_conditions(tokens: &[RuleToken]) -> Vec<DateCondition> {
    let mut conditions = Vec::new();
    for token in tokens {
        let raw = token.render();
        let (op, rest) = split_operator(raw.trim());
        match NaiveDate::parse_from_str(rest, "%Y-%m-%d") {
            Ok(value) => conditions.push(DateCondition { op, value }),
            Err(error) => {
                warn!(token = %raw, %error, "dropping unparsable date condition");
            }
        }
    }
    conditions
}
