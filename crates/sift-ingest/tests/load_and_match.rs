//! Load rules and workbooks from disk, then run the engine over them.

use sift_core::MatchEngine;
use sift_ingest::{load_language_data, load_rules};
use tempfile::TempDir;

#[test]
fn rules_and_workbooks_round_trip_through_the_engine() {
    let root = TempDir::new().unwrap();

    let patterns = root.path().join("patterns");
    std::fs::create_dir_all(&patterns).unwrap();
    std::fs::write(
        patterns.join("medios.json"),
        r#"{"name": "medios", "pattern": {"Foro": ["cnn"]}}"#,
    )
    .unwrap();

    let input = root.path().join("input");
    let workbook = input.join("enero");
    std::fs::create_dir_all(&workbook).unwrap();
    std::fs::write(
        workbook.join("es.csv"),
        "Foro,Mensaje\nCNN,Hola mundo\nbbc,bye\ncnn news,saludos\n",
    )
    .unwrap();
    std::fs::write(workbook.join("en.csv"), "Foro,Mensaje\nreuters,hi\n").unwrap();

    let loaded = load_rules(&patterns).unwrap();
    assert_eq!(loaded.report.valid_count, 1);

    let data = load_language_data(&input).unwrap();
    assert_eq!(data.len(), 2);

    let result = MatchEngine::compile(&loaded.rules).apply(&data);
    assert_eq!(result.matches["medios"]["es"].len(), 2);
    // No matches in "en": the pair is absent, not empty.
    assert!(!result.matches["medios"].contains_key("en"));
}
