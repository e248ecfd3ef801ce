//! Per-kind condition evaluators.
//!
//! Each evaluator answers one question: does this cell satisfy at least one
//! entry of this column's condition list? Missing cells never satisfy
//! anything, and a cell that does not coerce to the condition kind is a
//! plain non-match, not an error.

use sift_model::{CellValue, DateCondition, NumericCondition};

use crate::normalize::normalize_for_comparison;

/// Word-overlap score above which two folded strings count as similar.
///
/// Kept at the observed production value; loosening or tightening it
/// changes which rows match and is asserted against in tests.
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// True when the cell satisfies any of the string patterns.
///
/// Both sides are folded at comparison time. A pattern holds when either
/// folded side contains the other, or the Jaccard word overlap exceeds the
/// similarity threshold.
pub fn string_matches(cell: &CellValue, patterns: &[String]) -> bool {
    let Some(raw) = cell.render() else {
        return false;
    };
    let cell_text = normalize_for_comparison(&raw);
    patterns.iter().any(|pattern| {
        let pattern_text = normalize_for_comparison(pattern);
        pattern_text.contains(&cell_text)
            || cell_text.contains(&pattern_text)
            || jaccard_word_similarity(&pattern_text, &cell_text) > SIMILARITY_THRESHOLD
    })
}

/// Jaccard similarity over whitespace-split word sets, in `[0, 1]`.
///
/// Zero when either side has no words.
pub fn jaccard_word_similarity(left: &str, right: &str) -> f64 {
    let left_words: std::collections::BTreeSet<&str> = left.split_whitespace().collect();
    let right_words: std::collections::BTreeSet<&str> = right.split_whitespace().collect();
    if left_words.is_empty() || right_words.is_empty() {
        return 0.0;
    }
    let intersection = left_words.intersection(&right_words).count();
    let union = left_words.union(&right_words).count();
    intersection as f64 / union as f64
}

/// True when the cell coerces to a number and satisfies any condition.
pub fn numeric_matches(cell: &CellValue, conditions: &[NumericCondition]) -> bool {
    let Some(value) = cell.as_number() else {
        return false;
    };
    conditions
        .iter()
        .any(|condition| condition.op.compare(value, condition.value))
}

/// True when the cell coerces to a calendar date and satisfies any
/// condition, under calendar-date ordering.
pub fn date_matches(cell: &CellValue, conditions: &[DateCondition]) -> bool {
    let Some(value) = cell.as_date() else {
        return false;
    };
    conditions
        .iter()
        .any(|condition| condition.op.compare(value, condition.value))
}

/// True when the cell coerces to a boolean that is in the accepted set.
pub fn boolean_matches(cell: &CellValue, accepted: &[bool]) -> bool {
    let Some(value) = cell.as_bool() else {
        return false;
    };
    accepted.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use sift_model::CompareOp;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn string_match_is_accent_and_case_insensitive() {
        let patterns = vec!["cafe".to_string()];
        assert!(string_matches(&text("Café"), &patterns));
        assert!(string_matches(&text("mi cafe favorito"), &patterns));
        assert!(!string_matches(&text("te"), &patterns));
        assert!(!string_matches(&CellValue::Missing, &patterns));
    }

    #[test]
    fn string_match_accepts_containment_in_either_direction() {
        // Pattern longer than the cell: the cell is a substring of the pattern.
        let patterns = vec!["cnn international news".to_string()];
        assert!(string_matches(&text("CNN"), &patterns));
    }

    #[test]
    fn string_match_uses_word_overlap_above_the_threshold() {
        // 3 shared words of 4 total: 0.75 > 0.7.
        let patterns = vec!["noticias de ultima hora".to_string()];
        assert!(string_matches(&text("hora ultima noticias"), &patterns));
        // 2 shared of 4: 0.5, and neither side contains the other.
        assert!(!string_matches(&text("otras noticias de hoy"), &patterns));
    }

    #[test]
    fn jaccard_edges() {
        assert_eq!(jaccard_word_similarity("", "hola"), 0.0);
        assert_eq!(jaccard_word_similarity("hola mundo", "hola mundo"), 1.0);
    }

    #[test]
    fn numeric_match_rejects_non_numbers() {
        let conditions = vec![NumericCondition {
            op: CompareOp::Gt,
            value: 1000.0,
        }];
        assert!(numeric_matches(&CellValue::Number(1500.0), &conditions));
        assert!(numeric_matches(&text("1500"), &conditions));
        assert!(!numeric_matches(&CellValue::Number(999.0), &conditions));
        assert!(!numeric_matches(&text("n/a"), &conditions));
        assert!(!numeric_matches(&CellValue::Missing, &conditions));
    }

    #[test]
    fn date_match_orders_by_calendar_day() {
        let conditions = vec![DateCondition {
            op: CompareOp::Gt,
            value: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }];
        assert!(date_matches(&text("2024-06-15"), &conditions));
        assert!(!date_matches(&text("2023-12-31"), &conditions));
        assert!(!date_matches(&text("June 15, 2024"), &conditions));
    }

    #[test]
    fn boolean_match_checks_set_membership() {
        let accepted = vec![true];
        assert!(boolean_matches(&CellValue::Bool(true), &accepted));
        assert!(boolean_matches(&text("verdadero"), &accepted));
        assert!(boolean_matches(&CellValue::Number(3.0), &accepted));
        assert!(!boolean_matches(&text("no"), &accepted));
        assert!(!boolean_matches(&CellValue::Missing, &accepted));
    }

    proptest! {
        #[test]
        fn jaccard_stays_in_unit_interval(a in "[a-z ]{0,40}", b in "[a-z ]{0,40}") {
            let score = jaccard_word_similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
