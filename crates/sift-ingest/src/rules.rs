//! Rule-file loading and structural validation.
//!
//! Each rule lives in its own JSON file inside the patterns directory:
//! a `name` string and a `pattern` object mapping column names to lists of
//! raw condition tokens. Files under an `examples/` subdirectory are
//! templates and are never loaded. A malformed file is rejected on its own
//! with a reason in the validation report; loading always continues with
//! the remaining files.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use sift_model::{RawRule, RuleToken};

use crate::error::{IngestError, Result};

/// Outcome of loading one patterns directory.
#[derive(Debug, Clone)]
pub struct LoadedRules {
    pub rules: Vec<RawRule>,
    pub report: ValidationReport,
}

/// Per-file validation outcomes, one line each.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub lines: Vec<String>,
    pub valid_count: usize,
    pub total_count: usize,
}

impl ValidationReport {
    fn record_valid(&mut self, name: &str, columns: usize) {
        self.valid_count += 1;
        self.lines.push(format!("valid: {name}, {columns} columns"));
    }

    fn record_invalid(&mut self, filename: &str, reasons: &[String]) {
        self.lines
            .push(format!("invalid: {filename}: {}", reasons.join(", ")));
    }

    /// Persists the report as a timestamped log artifact and returns its
    /// path.
    pub fn write_log(&self, log_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(log_dir).map_err(|source| IngestError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = log_dir.join(format!("analysis_{timestamp}.log"));
        let mut contents = String::new();
        contents.push_str(&format!(
            "Pattern validation report - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        contents.push_str(&format!("Total files processed: {}\n", self.total_count));
        contents.push_str(&format!("Valid patterns: {}\n", self.valid_count));
        contents.push_str(&format!(
            "Invalid patterns: {}\n\n",
            self.total_count - self.valid_count
        ));
        for line in &self.lines {
            contents.push_str(line);
            contents.push('\n');
        }
        std::fs::write(&path, contents).map_err(|source| IngestError::Io {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), "validation report written");
        Ok(path)
    }
}

/// Loads every rule file in the patterns directory.
///
/// An unreadable or missing directory is fatal (nothing to run against);
/// individual bad files are not.
pub fn load_rules(patterns_dir: &Path) -> Result<LoadedRules> {
    if !patterns_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: patterns_dir.to_path_buf(),
        });
    }
    let mut rules = Vec::new();
    let mut report = ValidationReport::default();

    for path in rule_files(patterns_dir)? {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();
        report.total_count += 1;

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(file = %filename, %error, "could not read rule file");
                report.record_invalid(&filename, &[format!("unreadable file: {error}")]);
                continue;
            }
        };
        let value: Value = match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(error) => {
                report.record_invalid(&filename, &[format!("invalid JSON: {error}")]);
                continue;
            }
        };
        match parse_rule(&value, &filename) {
            Ok(rule) => {
                report.record_valid(&rule.name, rule.pattern.len());
                rules.push(rule);
            }
            Err(reasons) => {
                report.record_invalid(&filename, &reasons);
            }
        }
    }
    info!(
        valid = report.valid_count,
        total = report.total_count,
        "rule loading completed"
    );
    Ok(LoadedRules { rules, report })
}

fn rule_files(patterns_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(patterns_dir).map_err(|source| IngestError::DirectoryRead {
        path: patterns_dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: patterns_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && is_json {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Validates and converts one parsed rule document.
///
/// A missing `name` falls back to the file stem; `pattern` must be an
/// object and every column's value must be a list. Tokens other than
/// strings, numbers and booleans invalidate their column.
fn parse_rule(value: &Value, filename: &str) -> std::result::Result<RawRule, Vec<String>> {
    let mut reasons = Vec::new();

    let Some(object) = value.as_object() else {
        return Err(vec!["document must be an object".to_string()]);
    };

    let name = match object.get("name") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => {
            reasons.push("'name' field must be a string".to_string());
            String::new()
        }
        None => filename.trim_end_matches(".json").to_string(),
    };

    let pattern = match object.get("pattern") {
        Some(Value::Object(map)) => map,
        Some(_) => {
            reasons.push("'pattern' field must be an object".to_string());
            return Err(reasons);
        }
        None => {
            reasons.push("missing 'pattern' field".to_string());
            return Err(reasons);
        }
    };

    let mut columns = Vec::new();
    for (column, tokens) in pattern {
        let Some(list) = tokens.as_array() else {
            reasons.push(format!("field '{column}' must be a list"));
            continue;
        };
        let mut parsed = Vec::new();
        let mut bad_token = false;
        for token in list {
            match token {
                Value::String(text) => parsed.push(RuleToken::Text(text.clone())),
                Value::Bool(flag) => parsed.push(RuleToken::Bool(*flag)),
                Value::Number(number) => {
                    parsed.push(RuleToken::Number(number.as_f64().unwrap_or(0.0)));
                }
                _ => {
                    reasons.push(format!("field '{column}' holds an unsupported value"));
                    bad_token = true;
                    break;
                }
            }
        }
        if !bad_token {
            columns.push((column.clone(), parsed));
        }
    }

    if reasons.is_empty() {
        Ok(RawRule {
            name,
            pattern: columns,
        })
    } else {
        Err(reasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn name_falls_back_to_file_stem() {
        let value: Value = serde_json::from_str(r#"{"pattern": {"foro": ["cnn"]}}"#).unwrap();
        let rule = parse_rule(&value, "medios.json").unwrap();
        assert_eq!(rule.name, "medios");
    }

    #[test]
    fn pattern_must_be_an_object_of_lists() {
        let value: Value =
            serde_json::from_str(r#"{"name": "x", "pattern": {"foro": "cnn"}}"#).unwrap();
        let reasons = parse_rule(&value, "x.json").unwrap_err();
        assert!(reasons[0].contains("must be a list"));

        let value: Value = serde_json::from_str(r#"{"name": "x", "pattern": []}"#).unwrap();
        assert!(parse_rule(&value, "x.json").is_err());
    }

    #[test]
    fn declared_column_order_is_preserved() {
        let value: Value = serde_json::from_str(
            r#"{"name": "x", "pattern": {"mensaje": ["hola"], "foro": ["cnn"]}}"#,
        )
        .unwrap();
        let rule = parse_rule(&value, "x.json").unwrap();
        let columns: Vec<&str> = rule.pattern.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(columns, vec!["mensaje", "foro"]);
    }

    #[test]
    fn bad_files_are_reported_and_loading_continues() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("good.json"),
            r#"{"name": "medios", "pattern": {"foro": ["cnn"], "seguidores": [">1000"]}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(
            dir.path().join("bad_shape.json"),
            r#"{"name": "x", "pattern": {"foro": "cnn"}}"#,
        )
        .unwrap();

        let loaded = load_rules(dir.path()).unwrap();
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.report.valid_count, 1);
        assert_eq!(loaded.report.total_count, 3);
        assert!(
            loaded
                .report
                .lines
                .iter()
                .any(|line| line == "valid: medios, 2 columns")
        );
        assert!(loaded.report.lines.iter().any(|line| line.starts_with("invalid:")));
    }

    #[test]
    fn report_log_is_written() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("r.json"),
            r#"{"name": "r", "pattern": {}}"#,
        )
        .unwrap();
        let loaded = load_rules(dir.path()).unwrap();
        let log_dir = dir.path().join("log");
        let path = loaded.report.write_log(&log_dir).unwrap();
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.contains("Valid patterns: 1"));
        assert!(contents.contains("valid: r, 0 columns"));
    }
}
