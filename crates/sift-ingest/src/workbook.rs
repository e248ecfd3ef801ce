//! Workbook discovery and per-language loading.
//!
//! A workbook is a directory of CSV sheets, one per language tag
//! (`es.csv`, `en.csv`, ...). An `all` sheet, when present, is a derived
//! aggregate and is skipped on ingest. The analyze flow stacks workbooks
//! into one partition per language; the merge flow additionally stamps
//! provenance columns so duplicates can be traced back to their source.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use sift_core::normalize_column_name;
use sift_model::{CellValue, Sheet};

use crate::csv_table::read_sheet;
use crate::error::{IngestError, Result};

/// One discovered input source: a workbook directory or a bare CSV file.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Directory containing one CSV per language sheet.
    Workbook(PathBuf),
    /// Single CSV file with no language split.
    LooseCsv(PathBuf),
}

impl InputSource {
    pub fn path(&self) -> &Path {
        match self {
            InputSource::Workbook(path) | InputSource::LooseCsv(path) => path,
        }
    }
}

/// Lists input sources in a directory, sorted by name.
///
/// Subdirectories that contain at least one CSV are workbooks; top-level
/// CSV files are loose sources.
pub fn discover_sources(input_dir: &Path) -> Result<Vec<InputSource>> {
    if !input_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: input_dir.to_path_buf(),
        });
    }
    let mut sources = Vec::new();
    for entry in read_dir_sorted(input_dir)? {
        if entry.is_dir() {
            if !list_csv_files(&entry)?.is_empty() {
                sources.push(InputSource::Workbook(entry));
            }
        } else if has_csv_extension(&entry) {
            sources.push(InputSource::LooseCsv(entry));
        }
    }
    if sources.is_empty() {
        return Err(IngestError::NoInputFiles {
            path: input_dir.to_path_buf(),
        });
    }
    Ok(sources)
}

fn read_dir_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        paths.push(entry.path());
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(paths)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_dir_sorted(dir)?
        .into_iter()
        .filter(|path| path.is_file() && has_csv_extension(path))
        .collect())
}

fn sheet_language(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Reads every language sheet of one workbook, skipping the `all` sheet.
pub fn read_workbook(dir: &Path) -> Result<BTreeMap<String, Sheet>> {
    let mut sheets = BTreeMap::new();
    for path in list_csv_files(dir)? {
        let language = sheet_language(&path);
        if language.eq_ignore_ascii_case("all") {
            continue;
        }
        let sheet = read_sheet(&path, &language)?;
        if sheet.is_empty() {
            warn!(%language, workbook = %dir.display(), "language sheet is empty, skipping");
            continue;
        }
        info!(%language, rows = sheet.len(), workbook = %dir.display(), "read language sheet");
        sheets.insert(language, sheet);
    }
    Ok(sheets)
}

/// Loads all workbooks of an input directory into one partition per
/// language, for the analyze flow.
///
/// Column names are normalized on ingest and the first workbook fixes the
/// expected schema per language; a later sheet whose normalized columns
/// disagree is skipped with a warning rather than aborting the load.
pub fn load_language_data(input_dir: &Path) -> Result<BTreeMap<String, Sheet>> {
    let sources = discover_sources(input_dir)?;
    let mut data: BTreeMap<String, Sheet> = BTreeMap::new();

    for source in &sources {
        let sheets = match source {
            InputSource::Workbook(dir) => read_workbook(dir)?,
            InputSource::LooseCsv(path) => {
                let mut sheets = BTreeMap::new();
                let sheet = read_sheet(path, "unknown")?;
                if !sheet.is_empty() {
                    sheets.insert("unknown".to_string(), sheet);
                }
                sheets
            }
        };
        for (language, sheet) in sheets {
            let normalized = normalize_sheet_columns(sheet);
            match data.entry(language) {
                Entry::Occupied(mut entry) => {
                    if entry.get().columns != normalized.columns {
                        warn!(
                            language = %entry.key(),
                            source = %source.path().display(),
                            "columns do not match expected schema after normalization, skipping"
                        );
                        continue;
                    }
                    entry.get_mut().rows.extend(normalized.rows);
                }
                Entry::Vacant(entry) => {
                    entry.insert(normalized);
                }
            }
        }
    }
    Ok(data)
}

/// Loads all sources with provenance columns stamped on every row, for the
/// merge flow.
///
/// Returns one sheet map per source, preserving source order so the merger
/// can keep first occurrences stable.
pub fn load_with_provenance(input_dir: &Path) -> Result<Vec<BTreeMap<String, Sheet>>> {
    let sources = discover_sources(input_dir)?;
    let mut loaded = Vec::new();

    for source in &sources {
        let mut sheets = match source {
            InputSource::Workbook(dir) => read_workbook(dir)?,
            InputSource::LooseCsv(path) => {
                let mut sheets = BTreeMap::new();
                let sheet = read_sheet(path, "unknown")?;
                if !sheet.is_empty() {
                    sheets.insert("unknown".to_string(), sheet);
                }
                sheets
            }
        };
        let source_name = source
            .path()
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();
        let source_path = source.path().display().to_string();
        for (language, sheet) in &mut sheets {
            let sheet_name = match source {
                InputSource::Workbook(_) => language.clone(),
                InputSource::LooseCsv(_) => "N/A".to_string(),
            };
            stamp_provenance(sheet, &source_name, &source_path, language, &sheet_name);
        }
        loaded.push(sheets);
    }
    Ok(loaded)
}

fn stamp_provenance(
    sheet: &mut Sheet,
    source_file: &str,
    source_path: &str,
    language: &str,
    sheet_name: &str,
) {
    for column in sift_model::PROVENANCE_COLUMNS {
        if !sheet.columns.iter().any(|existing| existing == column) {
            sheet.columns.push(column.to_string());
        }
    }
    for row in &mut sheet.rows {
        row.set("_source_file", CellValue::Text(source_file.to_string()));
        row.set("_source_path", CellValue::Text(source_path.to_string()));
        row.set("_language", CellValue::Text(language.to_string()));
        row.set("_sheet_name", CellValue::Text(sheet_name.to_string()));
    }
}

fn normalize_sheet_columns(sheet: Sheet) -> Sheet {
    let columns: Vec<String> = sheet
        .columns
        .iter()
        .map(|column| normalize_column_name(column))
        .collect();
    let mut normalized = Sheet::new(sheet.language.clone(), columns);
    for row in sheet.rows {
        let mut new_row = sift_model::Row::new();
        for (column, value) in row.cells {
            new_row.set(normalize_column_name(&column), value);
        }
        normalized.push_row(new_row);
    }
    normalized
}
