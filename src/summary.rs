use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::archive;
use crate::commands::generate::GenerateOutcome;
use crate::model::{AssignmentConfig, ConfigField, Outline};
use crate::subparts::parse_subparts;
use crate::validate::{ConfigReport, OutlineReport, EXPECTED_TOTAL};

pub fn print_config(config: &AssignmentConfig) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for field in ConfigField::ALL {
        let value = config.get(field);
        let value_cell = if value.trim().is_empty() && ConfigField::REQUIRED.contains(&field) {
            Cell::new("(missing)").fg(Color::Red)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(field.key()), value_cell]);
    }
    println!("{table}");
    println!("Archive: {}", archive::archive_name(config));
}

pub fn print_questions(outline: &Outline) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Marks"),
        header_cell("Parts"),
        header_cell("Subparts"),
    ]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    for (index, question) in outline.questions().iter().enumerate() {
        let parts = question.part_list();
        let subparts = match parse_subparts(&question.subparts, &parts) {
            Ok(map) if map.is_empty() => dim_cell("-"),
            Ok(_) => Cell::new(&question.subparts),
            Err(_) => Cell::new(&question.subparts).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&question.marks),
            Cell::new(parts.join(", ")),
            subparts,
        ]);
    }
    println!("{table}");
    println!("Total marks: {}/{EXPECTED_TOTAL}", outline.total_marks());
}

/// Prints every error and warning. Returns whether generation may proceed.
pub fn print_reports(config: &ConfigReport, outline: &OutlineReport) -> bool {
    for error in config.errors.iter().chain(&outline.errors) {
        eprintln!("error: {error}");
    }
    for warning in &outline.warnings {
        eprintln!("warning: {warning}");
    }

    let valid = config.is_valid() && outline.is_valid();
    if valid {
        println!(
            "Ready to generate ({} marks, {} warning(s))",
            outline.total_marks,
            outline.warnings.len()
        );
    }
    valid
}

pub fn print_generated(outcome: &GenerateOutcome) {
    println!(
        "Wrote {} ({} files, {} bytes)",
        outcome.archive_path.display(),
        outcome.files.len(),
        outcome.archive_bytes
    );
    if let Some(dir) = &outcome.extracted_to {
        println!("Extracted to {}", dir.display());
    }
    for warning in &outcome.warnings {
        eprintln!("warning: {warning}");
    }
    println!("Suggested Overleaf project name: {}", outcome.project_name);
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}
