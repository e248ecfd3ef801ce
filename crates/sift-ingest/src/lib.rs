//! Input-side collaborators: CSV sheet reading, workbook discovery and
//! rule-file loading.

#![deny(unsafe_code)]

pub mod csv_table;
pub mod error;
pub mod rules;
pub mod workbook;

pub use csv_table::read_sheet;
pub use error::{IngestError, Result};
pub use rules::{LoadedRules, ValidationReport, load_rules};
pub use workbook::{
    InputSource, discover_sources, load_language_data, load_with_provenance, read_workbook,
};
