//! Shared helpers for workbook export.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use sift_model::Row;

/// Characters a sheet identifier may not contain.
const INVALID_SHEET_CHARS: [char; 7] = ['\\', '/', '*', '?', ':', '[', ']'];

/// Maximum sheet identifier length.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Sanitizes a sheet identifier: invalid characters become underscores and
/// long names are truncated with an ellipsis marker. An empty result falls
/// back to `unknown`.
pub fn sanitize_sheet_name(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|ch| {
            if INVALID_SHEET_CHARS.contains(&ch) {
                '_'
            } else {
                ch
            }
        })
        .collect();
    if sanitized.chars().count() > MAX_SHEET_NAME_LEN {
        sanitized = sanitized.chars().take(MAX_SHEET_NAME_LEN - 3).collect();
        sanitized.push_str("...");
    }
    if sanitized.is_empty() {
        sanitized.push_str("unknown");
    }
    sanitized
}

/// Timestamp fragment used in artifact names.
pub fn artifact_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Creates a timestamped workbook directory under the output root.
pub fn create_workbook_dir(output_dir: &Path, prefix: &str) -> Result<PathBuf> {
    let dir = output_dir.join(format!("{prefix}_{}", artifact_timestamp()));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create workbook directory: {}", dir.display()))?;
    Ok(dir)
}

/// Writes one sheet as a CSV file: header row then rows in order, empty
/// fields for missing cells or absent columns.
pub fn write_csv_sheet(path: &Path, columns: &[String], rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create sheet: {}", path.display()))?;
    writer
        .write_record(columns)
        .with_context(|| format!("write header: {}", path.display()))?;
    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .and_then(sift_model::CellValue::render)
                    .unwrap_or_default()
            })
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("write row: {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush sheet: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_characters_are_replaced() {
        assert_eq!(sanitize_sheet_name("es/en"), "es_en");
        assert_eq!(sanitize_sheet_name("a:b*c?"), "a_b_c_");
    }

    #[test]
    fn long_names_are_truncated_with_marker() {
        let name = "x".repeat(40);
        let sanitized = sanitize_sheet_name(&name);
        assert_eq!(sanitized.chars().count(), 31);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn empty_names_fall_back() {
        assert_eq!(sanitize_sheet_name(""), "unknown");
    }
}
