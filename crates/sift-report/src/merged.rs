//! Merged workbook export.
//!
//! One sheet per language plus an `all` sheet with every row. Column order
//! comes from the first language sheet, data columns first and provenance
//! columns last, so merged workbooks read the same regardless of source
//! count.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use sift_model::{PROVENANCE_COLUMNS, Row, Sheet, is_provenance_column};

use crate::common::{create_workbook_dir, sanitize_sheet_name, write_csv_sheet};

/// Writes merged language partitions and returns the workbook directory.
pub fn write_merged(
    languages: &BTreeMap<String, Sheet>,
    combined: &[Row],
    output_dir: &Path,
    include_all_sheet: bool,
) -> Result<PathBuf> {
    let workbook = create_workbook_dir(output_dir, "merged")?;
    let columns = column_order(languages);

    for (language, sheet) in languages {
        if sheet.is_empty() {
            warn!(%language, "language has no rows, skipping sheet");
            continue;
        }
        let path = workbook.join(format!("{}.csv", sanitize_sheet_name(language)));
        write_csv_sheet(&path, &columns, &sheet.rows)?;
        info!(%language, rows = sheet.len(), "wrote merged language sheet");
    }

    if include_all_sheet {
        write_csv_sheet(&workbook.join("all.csv"), &columns, combined)?;
        info!(rows = combined.len(), "wrote all sheet");
    }

    info!(workbook = %workbook.display(), "merged workbook written");
    Ok(workbook)
}

/// Data columns of the first language sheet in their source order, then the
/// provenance columns.
fn column_order(languages: &BTreeMap<String, Sheet>) -> Vec<String> {
    let mut ordered: Vec<String> = Vec::new();
    if let Some(first) = languages.values().next() {
        for column in &first.columns {
            if !is_provenance_column(column) && !ordered.contains(column) {
                ordered.push(column.clone());
            }
        }
    }
    for column in PROVENANCE_COLUMNS {
        ordered.push(column.to_string());
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_model::CellValue;
    use tempfile::TempDir;

    fn sheet(language: &str) -> Sheet {
        let mut sheet = Sheet::new(
            language,
            vec![
                "foro".to_string(),
                "mensaje".to_string(),
                "_source_file".to_string(),
            ],
        );
        let mut row = Row::new();
        row.set("foro", CellValue::Text("cnn".to_string()));
        row.set("mensaje", CellValue::Text("hola".to_string()));
        row.set("_source_file", CellValue::Text("a".to_string()));
        sheet.push_row(row);
        sheet
    }

    #[test]
    fn provenance_columns_go_last() {
        let languages = BTreeMap::from([("es".to_string(), sheet("es"))]);
        let columns = column_order(&languages);
        assert_eq!(columns[0], "foro");
        assert_eq!(columns[1], "mensaje");
        let tail: Vec<&str> = columns[columns.len() - 4..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tail, PROVENANCE_COLUMNS);
    }

    #[test]
    fn workbook_holds_language_and_all_sheets() {
        let languages = BTreeMap::from([("es".to_string(), sheet("es"))]);
        let combined: Vec<Row> = languages["es"].rows.clone();
        let out = TempDir::new().unwrap();
        let workbook = write_merged(&languages, &combined, out.path(), true).unwrap();

        assert!(workbook.join("es.csv").exists());
        let all = std::fs::read_to_string(workbook.join("all.csv")).unwrap();
        assert!(all.lines().next().unwrap().starts_with("foro,mensaje,_source_file"));
        assert_eq!(all.lines().count(), 2);
    }
}
