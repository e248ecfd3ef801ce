//! Generic per-language workbook export.
//!
//! Used by the collect flow: each sheet is written as-is with its own
//! column set, one CSV per language.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};

use sift_model::Sheet;

use crate::common::{create_workbook_dir, sanitize_sheet_name, write_csv_sheet};

/// Writes one sheet per language under a `<prefix>_<timestamp>/` directory.
pub fn write_workbook(
    sheets: &BTreeMap<String, Sheet>,
    output_dir: &Path,
    prefix: &str,
) -> Result<PathBuf> {
    let workbook = create_workbook_dir(output_dir, prefix)?;
    for (language, sheet) in sheets {
        if sheet.is_empty() {
            warn!(%language, "sheet has no rows, skipping");
            continue;
        }
        let path = workbook.join(format!("{}.csv", sanitize_sheet_name(language)));
        write_csv_sheet(&path, &sheet.columns, &sheet.rows)?;
        info!(%language, rows = sheet.len(), "wrote sheet");
    }
    info!(workbook = %workbook.display(), "workbook written");
    Ok(workbook)
}
