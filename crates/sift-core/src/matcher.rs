//! Row-against-rule evaluation.
//!
//! A row matches a rule when every column the rule references is present in
//! the row (under case/accent-insensitive name equality) and at least one
//! condition of each referenced column holds: disjunction within a column,
//! conjunction across columns. A rule that references no columns matches
//! every row; that vacuous truth is documented behavior, not an accident.

use std::collections::BTreeMap;

use tracing::warn;

use sift_model::{CellValue, CompiledRule, Row};

use crate::conditions::{boolean_matches, date_matches, numeric_matches, string_matches};
use crate::normalize::normalize_column_name;

/// Decides whether one row satisfies one compiled rule.
///
/// A referenced column absent from the row short-circuits to false: a rule
/// naming a column the data does not have can never match. The miss is an
/// expected outcome and is logged as a warning, not an error.
pub fn row_matches(row: &Row, rule: &CompiledRule) -> bool {
    let lookup = normalized_lookup(row);

    for (column, patterns) in &rule.string_fields {
        match find_cell(&lookup, column, &rule.name) {
            Some(cell) if string_matches(cell, patterns) => {}
            Some(_) => return false,
            None => return false,
        }
    }
    for (column, conditions) in &rule.numeric_fields {
        match find_cell(&lookup, column, &rule.name) {
            Some(cell) if numeric_matches(cell, conditions) => {}
            Some(_) => return false,
            None => return false,
        }
    }
    for (column, conditions) in &rule.date_fields {
        match find_cell(&lookup, column, &rule.name) {
            Some(cell) if date_matches(cell, conditions) => {}
            Some(_) => return false,
            None => return false,
        }
    }
    for (column, accepted) in &rule.boolean_fields {
        match find_cell(&lookup, column, &rule.name) {
            Some(cell) if boolean_matches(cell, accepted) => {}
            Some(_) => return false,
            None => return false,
        }
    }
    true
}

/// Indexes the row's cells by normalized column name.
fn normalized_lookup(row: &Row) -> BTreeMap<String, &CellValue> {
    let mut lookup = BTreeMap::new();
    for (name, value) in &row.cells {
        lookup.insert(normalize_column_name(name), value);
    }
    lookup
}

fn find_cell<'row>(
    lookup: &BTreeMap<String, &'row CellValue>,
    column: &str,
    rule_name: &str,
) -> Option<&'row CellValue> {
    let found = lookup.get(column).copied();
    if found.is_none() {
        warn!(rule = %rule_name, %column, "rule column not present in row");
    }
    found
}
