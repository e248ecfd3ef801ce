//! Multi-source merge and first-occurrence deduplication.
//!
//! Rows loaded from several workbooks are concatenated per language in
//! source order; exact duplicates are detected on a fingerprint of the data
//! cells (provenance columns excluded) and only the first occurrence is
//! kept.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use sha2::{Digest, Sha256};
use tracing::info;

use sift_model::{Row, Sheet, is_provenance_column};

/// Counters from one merge-and-dedupe pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupeStats {
    pub initial_rows: usize,
    pub final_rows: usize,
    pub duplicates_removed: usize,
}

/// Merged, deduplicated language partitions plus the combined sheet.
#[derive(Debug, Clone)]
pub struct MergedData {
    pub languages: BTreeMap<String, Sheet>,
    /// Every language's rows concatenated, deduplicated globally.
    pub combined: Vec<Row>,
    pub stats: DedupeStats,
}

/// Fingerprint of a row's data cells, ignoring provenance columns.
///
/// Cells are hashed in column order with NUL separators so that
/// ("a", "b|c") and ("a|b", "c") do not collide.
fn row_fingerprint(row: &Row) -> String {
    let mut hasher = Sha256::new();
    for (column, value) in &row.cells {
        if is_provenance_column(column) {
            continue;
        }
        hasher.update(column.as_bytes());
        hasher.update([0u8]);
        if let Some(rendered) = value.render() {
            hasher.update(rendered.as_bytes());
        }
        hasher.update([0u8]);
    }
    hex::encode(hasher.finalize())
}

/// Drops duplicate rows in place, keeping the first occurrence.
pub fn dedupe_rows(rows: &mut Vec<Row>) -> DedupeStats {
    let initial_rows = rows.len();
    let mut seen = BTreeSet::new();
    rows.retain(|row| seen.insert(row_fingerprint(row)));
    let final_rows = rows.len();
    DedupeStats {
        initial_rows,
        final_rows,
        duplicates_removed: initial_rows - final_rows,
    }
}

/// Merges sheets from multiple sources and deduplicates.
///
/// Sources are visited in order; within a language, rows keep their source
/// order. Each language partition is deduplicated on its own, and the
/// combined sheet is deduplicated across languages. The reported stats
/// cover the combined pass.
pub fn merge_and_dedupe(sources: Vec<BTreeMap<String, Sheet>>) -> MergedData {
    let mut languages: BTreeMap<String, Sheet> = BTreeMap::new();
    let mut combined: Vec<Row> = Vec::new();

    for source in sources {
        for (language, sheet) in source {
            combined.extend(sheet.rows.iter().cloned());
            match languages.entry(language) {
                Entry::Occupied(mut entry) => {
                    let merged = entry.get_mut();
                    for column in &sheet.columns {
                        if !merged.columns.contains(column) {
                            merged.columns.push(column.clone());
                        }
                    }
                    merged.rows.extend(sheet.rows);
                }
                Entry::Vacant(entry) => {
                    entry.insert(sheet);
                }
            }
        }
    }

    for sheet in languages.values_mut() {
        dedupe_rows(&mut sheet.rows);
    }
    let stats = dedupe_rows(&mut combined);
    info!(
        initial = stats.initial_rows,
        kept = stats.final_rows,
        removed = stats.duplicates_removed,
        "merge and dedupe completed"
    );

    MergedData {
        languages,
        combined,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_model::CellValue;

    fn row(cells: Vec<(&str, &str)>) -> Row {
        let mut row = Row::new();
        for (column, value) in cells {
            row.set(column, CellValue::Text(value.to_string()));
        }
        row
    }

    fn sheet(language: &str, rows: Vec<Row>) -> Sheet {
        let mut sheet = Sheet::new(language, vec!["foro".to_string(), "mensaje".to_string()]);
        for row in rows {
            sheet.push_row(row);
        }
        sheet
    }

    #[test]
    fn duplicates_differing_only_in_provenance_collapse() {
        let first = sheet(
            "es",
            vec![row(vec![
                ("foro", "cnn"),
                ("mensaje", "hola"),
                ("_source_file", "a.csv"),
            ])],
        );
        let second = sheet(
            "es",
            vec![
                row(vec![
                    ("foro", "cnn"),
                    ("mensaje", "hola"),
                    ("_source_file", "b.csv"),
                ]),
                row(vec![
                    ("foro", "bbc"),
                    ("mensaje", "bye"),
                    ("_source_file", "b.csv"),
                ]),
            ],
        );
        let merged = merge_and_dedupe(vec![
            BTreeMap::from([("es".to_string(), first)]),
            BTreeMap::from([("es".to_string(), second)]),
        ]);

        let rows = &merged.languages["es"].rows;
        assert_eq!(rows.len(), 2);
        // First occurrence kept: provenance points at the first source.
        assert_eq!(
            rows[0].get("_source_file"),
            Some(&CellValue::Text("a.csv".to_string()))
        );
        assert_eq!(merged.stats.duplicates_removed, 1);
    }

    #[test]
    fn first_occurrence_keeps_relative_order() {
        let mut rows = vec![
            row(vec![("foro", "a"), ("mensaje", "1")]),
            row(vec![("foro", "b"), ("mensaje", "2")]),
            row(vec![("foro", "a"), ("mensaje", "1")]),
            row(vec![("foro", "c"), ("mensaje", "3")]),
        ];
        let stats = dedupe_rows(&mut rows);
        assert_eq!(stats.final_rows, 3);
        assert_eq!(
            rows[1].get("mensaje"),
            Some(&CellValue::Text("2".to_string()))
        );
        assert_eq!(
            rows[2].get("mensaje"),
            Some(&CellValue::Text("3".to_string()))
        );
    }

    #[test]
    fn distinct_rows_survive() {
        let mut rows = vec![
            row(vec![("foro", "a")]),
            row(vec![("foro", "b")]),
        ];
        let stats = dedupe_rows(&mut rows);
        assert_eq!(stats.duplicates_removed, 0);
        assert_eq!(rows.len(), 2);
    }
}
