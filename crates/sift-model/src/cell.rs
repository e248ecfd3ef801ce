#![deny(unsafe_code)]

use chrono::NaiveDate;

/// A single cell value.
///
/// The variant set is closed on purpose: every value that flows through the
/// matcher is one of these five shapes, and each target kind has exactly one
/// coercion function. Coercions accept nothing beyond what they document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// Builds a cell from a raw CSV field: empty after trimming means missing.
    pub fn from_csv_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Text rendering used for string comparison and export.
    ///
    /// Missing cells have no rendering. Integral numbers render without a
    /// fractional part.
    pub fn render(&self) -> Option<String> {
        match self {
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(value) => Some(format_number(*value)),
            CellValue::Bool(value) => Some(value.to_string()),
            CellValue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
            CellValue::Missing => None,
        }
    }

    /// Coerces to a floating value for numeric conditions.
    ///
    /// Accepts numbers, numeric text and booleans (1.0 / 0.0); anything else
    /// is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Text(text) => text.trim().parse::<f64>().ok(),
            CellValue::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            CellValue::Date(_) | CellValue::Missing => None,
        }
    }

    /// Coerces to a calendar date for date conditions.
    ///
    /// Accepts date cells and text in `YYYY-MM-DD` form only. The narrow
    /// format contract is deliberate; other date renderings do not match.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(date) => Some(*date),
            CellValue::Text(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok(),
            CellValue::Number(_) | CellValue::Bool(_) | CellValue::Missing => None,
        }
    }

    /// Coerces to a boolean for boolean conditions.
    ///
    /// Text coerces to true iff its lowercase form is one of
    /// `true`, `1`, `yes`, `verdadero` (any other text is false, not an
    /// error); numbers are true when nonzero. Dates and missing cells do
    /// not coerce.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(value) => Some(*value),
            CellValue::Text(text) => {
                let lower = text.trim().to_lowercase();
                Some(matches!(lower.as_str(), "true" | "1" | "yes" | "verdadero"))
            }
            CellValue::Number(value) => Some(*value != 0.0),
            CellValue::Date(_) | CellValue::Missing => None,
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
