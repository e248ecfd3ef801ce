//! Analysis workbook export.
//!
//! One workbook directory per run: a `Summary` sheet first, then one sheet
//! per rule holding that rule's matching rows across all languages. The
//! rule's referenced columns come first in declared order, remaining data
//! columns follow in source order, and every row carries its `_language`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use sift_model::{CellValue, MatchResult, Row};

use crate::common::{create_workbook_dir, sanitize_sheet_name, write_csv_sheet};

/// Writes the analysis workbook and returns its directory.
pub fn write_analysis(result: &MatchResult, output_dir: &Path) -> Result<PathBuf> {
    let workbook = create_workbook_dir(output_dir, "analysis")?;

    write_summary_sheet(result, &workbook)?;

    for (rule_name, languages) in &result.matches {
        if languages.is_empty() {
            warn!(rule = %rule_name, "no results for rule, skipping sheet");
            continue;
        }
        let mut rows: Vec<Row> = Vec::new();
        for (language, matched) in languages {
            for row in matched {
                let mut stamped = row.clone();
                if stamped.get("_language").is_none() {
                    stamped.set("_language", CellValue::Text(language.clone()));
                }
                rows.push(stamped);
            }
        }
        let columns = sheet_columns(result, rule_name, languages.keys());
        let sheet_path = workbook.join(format!("{}.csv", sanitize_sheet_name(rule_name)));
        write_csv_sheet(&sheet_path, &columns, &rows)?;
        info!(rule = %rule_name, rows = rows.len(), sheet = %sheet_path.display(), "wrote rule sheet");
    }

    info!(workbook = %workbook.display(), "analysis workbook written");
    Ok(workbook)
}

/// Referenced columns first (those present in the data), then the rest of
/// each matched language's columns in source order, `_language` last when
/// not already present.
fn sheet_columns<'a>(
    result: &MatchResult,
    rule_name: &str,
    languages: impl Iterator<Item = &'a String>,
) -> Vec<String> {
    let mut data_columns: Vec<String> = Vec::new();
    for language in languages {
        if let Some(columns) = result.data_columns.get(language) {
            for column in columns {
                if !data_columns.contains(column) {
                    data_columns.push(column.clone());
                }
            }
        }
    }

    let mut ordered = Vec::new();
    if let Some(referenced) = result.column_mapping.get(rule_name) {
        for column in referenced {
            if data_columns.contains(column) && !ordered.contains(column) {
                ordered.push(column.clone());
            }
        }
    }
    for column in data_columns {
        if !ordered.contains(&column) {
            ordered.push(column);
        }
    }
    if !ordered.iter().any(|column| column == "_language") {
        ordered.push("_language".to_string());
    }
    ordered
}

fn write_summary_sheet(result: &MatchResult, workbook: &Path) -> Result<()> {
    let summary = result.summary();
    let columns = vec![
        "Pattern Name".to_string(),
        "Total Matches".to_string(),
        "Languages".to_string(),
        "Rows by Language".to_string(),
    ];
    let mut rows = Vec::new();
    for rule in &summary.rules {
        let languages: Vec<&str> = rule
            .by_language
            .iter()
            .map(|count| count.language.as_str())
            .collect();
        let by_language: Vec<String> = rule
            .by_language
            .iter()
            .map(|count| format!("{}: {}", count.language, count.rows))
            .collect();
        let mut row = Row::new();
        row.set("Pattern Name", CellValue::Text(rule.name.clone()));
        row.set("Total Matches", CellValue::Number(rule.total_rows as f64));
        row.set("Languages", CellValue::Text(languages.join(", ")));
        row.set("Rows by Language", CellValue::Text(by_language.join("; ")));
        rows.push(row);
    }
    write_csv_sheet(&workbook.join("Summary.csv"), &columns, &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn result_with_one_rule() -> MatchResult {
        let mut result = MatchResult::default();
        let mut row = Row::new();
        row.set("foro", CellValue::Text("cnn".to_string()));
        row.set("mensaje", CellValue::Text("hola".to_string()));
        result
            .matches
            .entry("medios".to_string())
            .or_default()
            .insert("es".to_string(), vec![row]);
        result
            .column_mapping
            .insert("medios".to_string(), vec!["foro".to_string()]);
        result.data_columns.insert(
            "es".to_string(),
            vec!["mensaje".to_string(), "foro".to_string()],
        );
        result
    }

    #[test]
    fn referenced_columns_come_first() {
        let result = result_with_one_rule();
        let columns = sheet_columns(
            &result,
            "medios",
            result.matches["medios"].keys(),
        );
        assert_eq!(columns, vec!["foro", "mensaje", "_language"]);
    }

    #[test]
    fn workbook_holds_summary_and_rule_sheets() {
        let result = result_with_one_rule();
        let out = TempDir::new().unwrap();
        let workbook = write_analysis(&result, out.path()).unwrap();

        let summary = std::fs::read_to_string(workbook.join("Summary.csv")).unwrap();
        assert!(summary.contains("medios"));
        assert!(summary.contains("es: 1"));

        let sheet = std::fs::read_to_string(workbook.join("medios.csv")).unwrap();
        let mut lines = sheet.lines();
        assert_eq!(lines.next().unwrap(), "foro,mensaje,_language");
        assert_eq!(lines.next().unwrap(), "cnn,hola,es");
    }
}
