//! Console summaries rendered with `comfy-table`.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{AnalyzeResult, CollectResult, MergeResult, RulesResult};

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn apply_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn print_analyze_summary(result: &AnalyzeResult) {
    println!("Output: {}", result.workbook.display());
    println!("Validation report: {}", result.report_log.display());
    if result.invalid_rules > 0 {
        println!("Rejected rule files: {}", result.invalid_rules);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rule"),
        header_cell("Languages"),
        header_cell("Matches"),
    ]);
    apply_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);

    for rule in &result.summary.rules {
        let languages: Vec<String> = rule
            .by_language
            .iter()
            .map(|count| format!("{} ({})", count.language, count.rows))
            .collect();
        table.add_row(vec![
            Cell::new(&rule.name),
            Cell::new(languages.join(", ")),
            Cell::new(rule.total_rows),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.summary.languages_searched.join(", ")),
        Cell::new(result.summary.total_matching_rows).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_merge_summary(result: &MergeResult) {
    println!("Output: {}", result.workbook.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Languages"), Cell::new(result.languages)]);
    table.add_row(vec![
        Cell::new("Rows loaded"),
        Cell::new(result.stats.initial_rows),
    ]);
    table.add_row(vec![
        Cell::new("Rows kept"),
        Cell::new(result.stats.final_rows),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        Cell::new(result.stats.duplicates_removed).fg(Color::Yellow),
    ]);
    println!("{table}");
}

pub fn print_collect_summary(result: &CollectResult) {
    if let Some(workbook) = &result.workbook {
        println!("Output: {}", workbook.display());
    }
    if let Some(backup) = &result.backup {
        println!("Backup: {}", backup.display());
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Language"), header_cell("Collected")]);
    apply_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (language, count) in &result.counts {
        table.add_row(vec![Cell::new(language), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn print_rules_summary(result: &RulesResult) {
    for line in &result.lines {
        println!("{line}");
    }
    println!("{}/{} rule file(s) valid", result.valid, result.total);
    if let Some(path) = &result.report_log {
        println!("Validation report: {}", path.display());
    }
}
