#![deny(unsafe_code)]

use std::collections::BTreeMap;

use crate::CellValue;

/// One data row: column name to cell value.
///
/// Column names are stored as the source produced them; case/accent
/// insensitive lookup happens in the matcher, not here.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    /// Cell lookup treating an absent column the same as a missing cell.
    pub fn cell_or_missing(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&CellValue::Missing)
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// A language partition: the rows of one language sheet plus the column
/// order the sheet declared.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Sheet {
    pub language: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(language: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            language: language.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
