#![deny(unsafe_code)]

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// One raw condition token as authored in a rule file.
///
/// Tokens are either literal booleans or strings; numeric JSON values are
/// kept as numbers so classification can tell a genuine boolean list from a
/// stringified one.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RuleToken {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RuleToken {
    pub fn is_bool(&self) -> bool {
        matches!(self, RuleToken::Bool(_))
    }

    /// String rendering used to probe a token's shape during classification.
    pub fn render(&self) -> String {
        match self {
            RuleToken::Bool(value) => value.to_string(),
            RuleToken::Number(value) => {
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    format!("{}", *value as i64)
                } else {
                    value.to_string()
                }
            }
            RuleToken::Text(text) => text.clone(),
        }
    }
}

/// A named rule as loaded from a rule file: column name to a non-empty list
/// of raw condition tokens, in declared order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RawRule {
    pub name: String,
    pub pattern: Vec<(String, Vec<RuleToken>)>,
}

/// Comparison operator for numeric and date conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CompareOp {
    Lt,
    Gt,
    Eq,
}

impl CompareOp {
    /// Parses a leading operator character; `None` for anything else.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '<' => Some(CompareOp::Lt),
            '>' => Some(CompareOp::Gt),
            '=' => Some(CompareOp::Eq),
            _ => None,
        }
    }

    /// Applies the operator with the cell value on the left-hand side.
    pub fn compare<T: PartialOrd>(self, cell: T, condition: T) -> bool {
        match self {
            CompareOp::Lt => cell < condition,
            CompareOp::Gt => cell > condition,
            CompareOp::Eq => cell == condition,
        }
    }
}

/// One numeric condition: operator plus threshold.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NumericCondition {
    pub op: CompareOp,
    pub value: f64,
}

/// One date condition: operator plus calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DateCondition {
    pub op: CompareOp,
    pub value: NaiveDate,
}

/// Classification result for one rule column.
///
/// A column lands in exactly one variant, decided by the shape of its first
/// raw token.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledField {
    String(Vec<String>),
    Numeric(Vec<NumericCondition>),
    Date(Vec<DateCondition>),
    Boolean(Vec<bool>),
}

/// The typed, pre-classified form of a rule, ready for repeated evaluation.
///
/// Invariant: a column appears in exactly one of the four buckets, and
/// `columns` lists every referenced column (normalized) in declared order.
#[derive(Debug, Clone, Default)]
pub struct CompiledRule {
    pub name: String,
    pub string_fields: BTreeMap<String, Vec<String>>,
    pub numeric_fields: BTreeMap<String, Vec<NumericCondition>>,
    pub date_fields: BTreeMap<String, Vec<DateCondition>>,
    pub boolean_fields: BTreeMap<String, Vec<bool>>,
    pub columns: Vec<String>,
}

impl CompiledRule {
    /// True when the rule references no columns at all; such a rule matches
    /// every row (vacuous conjunction).
    pub fn is_vacuous(&self) -> bool {
        self.columns.is_empty()
    }
}
