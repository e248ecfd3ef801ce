//! Text canonicalization for comparison.
//!
//! Row values and rule patterns come from spreadsheets authored in several
//! Greco-Roman languages, so equality is decided on a folded form: accents
//! stripped, a fixed punctuation set removed, case ignored. Folding is pure
//! and total; every input (including empty text) has a folded form.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Punctuation removed before comparison.
const STRIPPED_SYMBOLS: [char; 15] = [
    '.', ',', '!', '?', ';', ':', '(', ')', '[', ']', '{', '}', '"', '\'', '-',
];

/// Folds text for accent- and case-insensitive comparison.
///
/// Steps, in order: trim, canonical decomposition (NFD), drop combining
/// marks, strip the fixed punctuation set, lowercase. Idempotent.
pub fn normalize_for_comparison(text: &str) -> String {
    let stripped: String = text
        .trim()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .filter(|ch| !STRIPPED_SYMBOLS.contains(ch))
        .collect();
    stripped.to_lowercase()
}

/// Cleans a rule-authored pattern value: trim plus punctuation strip only.
///
/// Accent removal and lowercasing are deferred to comparison time, so the
/// stored pattern keeps its authored casing.
pub fn clean_pattern_text(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|ch| !STRIPPED_SYMBOLS.contains(ch))
        .collect()
}

/// Exact post-normalization synonyms for column names.
///
/// Maps spreadsheet header variants onto the canonical snake_case names the
/// collect exporter writes, and the display forms of the provenance columns
/// back onto their underscore names.
const COLUMN_SYNONYMS: [(&str, &str); 12] = [
    ("tweet id", "tweet_id"),
    ("tweet_id", "tweet_id"),
    ("usuario nombre", "usuario_nombre"),
    ("usuario genero", "usuario_genero"),
    ("tipo de verificacion", "tipo_de_verificacion"),
    ("public metrics dump", "public_metrics_dump"),
    ("user dump", "user_dump"),
    ("tweet dump", "tweet_dump"),
    ("source file", "_source_file"),
    ("source path", "_source_path"),
    ("sheet name", "_sheet_name"),
    ("language", "_language"),
];

/// Canonicalizes a column name for matching.
///
/// Accents are stripped and case folded so rule columns and data columns
/// agree regardless of which side was pre-normalized; internal whitespace
/// runs collapse to a single space; the synonym table applies to exact
/// post-normalization matches only.
pub fn normalize_column_name(name: &str) -> String {
    let folded: String = name
        .trim()
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .collect::<String>()
        .to_lowercase();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    for (variant, canonical) in COLUMN_SYNONYMS {
        if collapsed == variant {
            return canonical.to_string();
        }
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn folds_accents_case_and_punctuation() {
        assert_eq!(normalize_for_comparison("Café!"), "cafe");
        assert_eq!(normalize_for_comparison("  HELLO, World.  "), "hello world");
        assert_eq!(normalize_for_comparison(""), "");
    }

    #[test]
    fn pattern_cleaning_keeps_case_and_accents() {
        assert_eq!(clean_pattern_text("  Café! "), "Café");
        assert_eq!(clean_pattern_text("(cnn)"), "cnn");
    }

    #[test]
    fn column_names_collapse_whitespace_and_fold() {
        assert_eq!(normalize_column_name("  Foro "), "foro");
        assert_eq!(normalize_column_name("Tipo de  Verificación"), "tipo_de_verificacion");
        assert_eq!(normalize_column_name("Tweet ID"), "tweet_id");
        assert_eq!(normalize_column_name("Language"), "_language");
        assert_eq!(normalize_column_name("Mensaje"), "mensaje");
    }

    proptest! {
        #[test]
        fn folding_is_idempotent(text in "\\PC{0,64}") {
            let once = normalize_for_comparison(&text);
            prop_assert_eq!(normalize_for_comparison(&once), once.clone());
        }

        #[test]
        fn folded_text_never_carries_stripped_symbols(text in "\\PC{0,64}") {
            let folded = normalize_for_comparison(&text);
            prop_assert!(!folded.chars().any(|ch| STRIPPED_SYMBOLS.contains(&ch)));
        }
    }
}
