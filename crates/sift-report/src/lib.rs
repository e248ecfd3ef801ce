//! Output-side collaborators: workbook export for analysis results, merged
//! data and collected rows.

#![deny(unsafe_code)]

pub mod analysis;
pub mod common;
pub mod merged;
pub mod workbook;

pub use analysis::write_analysis;
pub use common::{artifact_timestamp, sanitize_sheet_name, write_csv_sheet};
pub use merged::write_merged;
pub use workbook::write_workbook;
