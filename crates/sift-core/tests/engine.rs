//! End-to-end engine behavior over small in-memory partitions.

use std::collections::BTreeMap;

use sift_core::MatchEngine;
use sift_core::normalize::normalize_for_comparison;
use sift_model::{CellValue, RawRule, Row, RuleToken, Sheet};

fn text_rule(name: &str, pattern: Vec<(&str, Vec<&str>)>) -> RawRule {
    RawRule {
        name: name.to_string(),
        pattern: pattern
            .into_iter()
            .map(|(column, values)| {
                (
                    column.to_string(),
                    values
                        .into_iter()
                        .map(|value| RuleToken::Text(value.to_string()))
                        .collect(),
                )
            })
            .collect(),
    }
}

fn sheet(language: &str, columns: &[&str], rows: &[&[&str]]) -> Sheet {
    let columns: Vec<String> = columns.iter().map(|c| (*c).to_string()).collect();
    let mut sheet = Sheet::new(language, columns.clone());
    for values in rows {
        let mut row = Row::new();
        for (column, value) in columns.iter().zip(values.iter()) {
            row.set(column.clone(), CellValue::from_csv_field(value));
        }
        sheet.push_row(row);
    }
    sheet
}

#[test]
fn normalization_examples_hold() {
    assert_eq!(normalize_for_comparison("Café!"), "cafe");
    assert_eq!(normalize_for_comparison("  HELLO, World.  "), "hello world");
    let folded = normalize_for_comparison("¡Atención, señores!");
    assert_eq!(normalize_for_comparison(&folded), folded);
}

#[test]
fn forum_rule_matches_first_and_third_row() {
    let mut data = BTreeMap::new();
    data.insert(
        "es".to_string(),
        sheet(
            "es",
            &["foro", "mensaje"],
            &[
                &["CNN", "Hola mundo"],
                &["bbc", "bye"],
                &["cnn news", "saludos"],
            ],
        ),
    );
    let rules = vec![text_rule("medios", vec![("foro", vec!["cnn"])])];
    let result = MatchEngine::compile(&rules).apply(&data);

    let rows = &result.matches["medios"]["es"];
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].get("mensaje"),
        Some(&CellValue::Text("Hola mundo".to_string()))
    );
    assert_eq!(
        rows[1].get("mensaje"),
        Some(&CellValue::Text("saludos".to_string()))
    );
}

#[test]
fn numeric_and_date_rules_compare_coerced_values() {
    let mut data = BTreeMap::new();
    data.insert(
        "es".to_string(),
        sheet(
            "es",
            &["seguidores", "fecha"],
            &[
                &["1500", "2024-06-15"],
                &["999", "2023-12-31"],
                &["n/a", "2024-06-15"],
            ],
        ),
    );
    let rules = vec![
        text_rule("populares", vec![("seguidores", vec![">1000"])]),
        text_rule("recientes", vec![("fecha", vec![">2024-01-01"])]),
    ];
    let result = MatchEngine::compile(&rules).apply(&data);

    assert_eq!(result.matches["populares"]["es"].len(), 1);
    let recientes = &result.matches["recientes"]["es"];
    assert_eq!(recientes.len(), 2);
}

#[test]
fn rule_naming_absent_column_never_matches() {
    let mut data = BTreeMap::new();
    data.insert(
        "es".to_string(),
        sheet(
            "es",
            &["foro", "mensaje"],
            &[&["cnn", "hola"], &["cnn", "adios"]],
        ),
    );
    let rules = vec![text_rule(
        "huerfana",
        vec![("cuenta", vec!["cnn"]), ("foro", vec!["cnn"])],
    )];
    let result = MatchEngine::compile(&rules).apply(&data);
    assert!(result.matches.is_empty());
}

#[test]
fn empty_pattern_matches_every_row() {
    let mut data = BTreeMap::new();
    data.insert(
        "en".to_string(),
        sheet("en", &["foro"], &[&["cnn"], &["bbc"]]),
    );
    let rules = vec![text_rule("todo", Vec::new())];
    let result = MatchEngine::compile(&rules).apply(&data);
    assert_eq!(result.matches["todo"]["en"].len(), 2);
}

#[test]
fn accented_cell_matches_unaccented_pattern() {
    let mut data = BTreeMap::new();
    data.insert(
        "es".to_string(),
        sheet(
            "es",
            &["foro"],
            &[&["Café"], &["mi cafe favorito"], &["te"]],
        ),
    );
    let rules = vec![text_rule("cafes", vec![("foro", vec!["cafe"])])];
    let result = MatchEngine::compile(&rules).apply(&data);
    assert_eq!(result.matches["cafes"]["es"].len(), 2);
}

#[test]
fn summary_counts_rules_languages_and_rows() {
    let mut data = BTreeMap::new();
    data.insert(
        "es".to_string(),
        sheet("es", &["foro"], &[&["cnn"], &["bbc"]]),
    );
    data.insert("en".to_string(), sheet("en", &["foro"], &[&["cnn news"]]));
    let rules = vec![text_rule("medios", vec![("foro", vec!["cnn"])])];
    let result = MatchEngine::compile(&rules).apply(&data);

    let summary = result.summary();
    assert_eq!(summary.total_rules, 1);
    assert_eq!(summary.languages_searched, vec!["en", "es"]);
    assert_eq!(summary.total_matching_rows, 2);
    assert_eq!(summary.rules[0].total_rows, 2);
}
