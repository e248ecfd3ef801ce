//! CSV sheet reading.

use std::path::Path;

use csv::ReaderBuilder;

use sift_model::{CellValue, Row, Sheet};

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> &str {
    raw.trim().trim_matches('\u{feff}')
}

/// Reads one language sheet from a CSV file.
///
/// The first record is the header row. Header names are whitespace-collapsed
/// and BOM-stripped but otherwise kept verbatim; the matcher owns
/// case/accent-insensitive comparison. Fully empty records are skipped.
pub fn read_sheet(path: &Path, language: &str) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();

    let mut sheet = Sheet::new(language, headers.clone());
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (idx, column) in headers.iter().enumerate() {
            let raw = record.get(idx).map(normalize_cell).unwrap_or("");
            row.set(column.clone(), CellValue::from_csv_field(raw));
        }
        sheet.push_row(row);
    }
    Ok(sheet)
}
