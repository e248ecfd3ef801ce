//! Match orchestration across rules and language partitions.

use std::collections::BTreeMap;

use tracing::{debug, info};

use sift_model::{CompiledRule, MatchResult, RawRule, Sheet};

use crate::compile::compile_rules;
use crate::matcher::row_matches;

/// Applies a rule set to language-partitioned data.
///
/// Rules are compiled once per engine and reused across runs; the compiled
/// form is never mutated, only replaced by building a fresh engine.
pub struct MatchEngine {
    compiled: BTreeMap<String, CompiledRule>,
}

impl MatchEngine {
    /// Compiles the rule set. One compilation per rule name; a later rule
    /// with the same name replaces the earlier one.
    pub fn compile(rules: &[RawRule]) -> Self {
        let compiled = compile_rules(rules);
        info!(rules = compiled.len(), "compiled rule set");
        Self { compiled }
    }

    pub fn compiled_rules(&self) -> &BTreeMap<String, CompiledRule> {
        &self.compiled
    }

    /// Evaluates every row of every language against every rule.
    ///
    /// Rows are retained in source order and never mutated. A (rule,
    /// language) pair with zero matches is omitted from the result.
    pub fn apply(&self, data: &BTreeMap<String, Sheet>) -> MatchResult {
        let mut result = MatchResult::default();

        for rule in self.compiled.values() {
            result
                .column_mapping
                .insert(rule.name.clone(), rule.columns.clone());
        }
        for (language, sheet) in data {
            result
                .data_columns
                .insert(language.clone(), sheet.columns.clone());
        }

        for (language, sheet) in data {
            info!(%language, rows = sheet.len(), "matching language partition");
            for rule in self.compiled.values() {
                let matching: Vec<_> = sheet
                    .rows
                    .iter()
                    .filter(|row| row_matches(row, rule))
                    .cloned()
                    .collect();
                debug!(rule = %rule.name, %language, matches = matching.len(), "rule applied");
                if matching.is_empty() {
                    continue;
                }
                result
                    .matches
                    .entry(rule.name.clone())
                    .or_default()
                    .insert(language.clone(), matching);
            }
        }

        info!(
            rules_with_matches = result.matches.len(),
            "pattern application completed"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_model::{CellValue, Row, RuleToken};

    fn sheet(language: &str, columns: &[&str], rows: &[&[&str]]) -> Sheet {
        let columns: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
        let mut sheet = Sheet::new(language, columns.clone());
        for values in rows {
            let mut row = Row::new();
            for (column, value) in columns.iter().zip(values.iter()) {
                row.set(column.clone(), CellValue::from_csv_field(value));
            }
            sheet.push_row(row);
        }
        sheet
    }

    fn rules() -> Vec<RawRule> {
        vec![RawRule {
            name: "medios".to_string(),
            pattern: vec![(
                "foro".to_string(),
                vec![RuleToken::Text("cnn".to_string())],
            )],
        }]
    }

    #[test]
    fn retains_matching_rows_in_source_order() {
        let mut data = BTreeMap::new();
        data.insert(
            "es".to_string(),
            sheet(
                "es",
                &["foro", "mensaje"],
                &[
                    &["CNN", "Hola mundo"],
                    &["bbc", "bye"],
                    &["cnn news", "saludos"],
                ],
            ),
        );
        let engine = MatchEngine::compile(&rules());
        let result = engine.apply(&data);
        let rows = &result.matches["medios"]["es"];
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get("mensaje"),
            Some(&CellValue::Text("Hola mundo".to_string()))
        );
        assert_eq!(
            rows[1].get("mensaje"),
            Some(&CellValue::Text("saludos".to_string()))
        );
    }

    #[test]
    fn empty_results_are_absent_not_empty() {
        let mut data = BTreeMap::new();
        data.insert(
            "en".to_string(),
            sheet("en", &["foro", "mensaje"], &[&["bbc", "bye"]]),
        );
        let engine = MatchEngine::compile(&rules());
        let result = engine.apply(&data);
        assert!(result.matches.get("medios").is_none());
        assert_eq!(result.rule_total("medios"), 0);
    }

    #[test]
    fn column_mapping_keeps_declared_order() {
        let raw = vec![RawRule {
            name: "orden".to_string(),
            pattern: vec![
                ("mensaje".to_string(), vec![RuleToken::Text("x".into())]),
                ("foro".to_string(), vec![RuleToken::Text("y".into())]),
            ],
        }];
        let engine = MatchEngine::compile(&raw);
        let result = engine.apply(&BTreeMap::new());
        assert_eq!(result.column_mapping["orden"], vec!["mensaje", "foro"]);
    }
}
