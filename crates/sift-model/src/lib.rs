//! Data model for the sift workbook analyzer.
//!
//! This crate defines the closed cell/row/sheet types shared by the ingest,
//! matching and export stages, plus the rule types (raw and compiled) and
//! the match result artifact. It carries no I/O.

#![deny(unsafe_code)]

mod cell;
mod result;
mod rule;
mod table;

pub use cell::CellValue;
pub use result::{LanguageCount, MatchResult, RuleSummary, RunSummary};
pub use rule::{
    CompareOp, CompiledField, CompiledRule, DateCondition, NumericCondition, RawRule, RuleToken,
};
pub use table::{Row, Sheet};

/// Provenance columns stamped by the merge loader and ignored by
/// deduplication and schema comparisons.
pub const PROVENANCE_COLUMNS: [&str; 4] =
    ["_source_file", "_source_path", "_language", "_sheet_name"];

/// Returns true for column names that carry provenance metadata rather
/// than source data.
pub fn is_provenance_column(name: &str) -> bool {
    PROVENANCE_COLUMNS.contains(&name)
}
