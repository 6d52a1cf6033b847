use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use e2b_cli::types::{FileOutcome, FileStatus, RunSummary, ValidationOutcome};

pub fn print_summary(summary: &RunSummary) {
    println!("Input: {}", summary.input_dir.display());
    if summary.dry_run {
        println!("Dry run: no files written");
    } else {
        println!("Output: {}", summary.output_dir.display());
        println!("Quarantine: {}", summary.error_dir.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Report ID"),
        header_cell("Status"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_errors = 0usize;
    let mut total_warnings = 0usize;
    for outcome in &summary.files {
        total_errors += outcome.errors.len();
        total_warnings += outcome.warnings.len();
        table.add_row(vec![
            Cell::new(file_name(outcome)),
            report_cell(outcome.report_id.as_deref()),
            status_cell(outcome.status),
            count_cell(outcome.errors.len(), Color::Red),
            count_cell(outcome.warnings.len(), Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} converted, {} rejected, {} failed",
            summary.converted, summary.rejected, summary.failed
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}%", summary.success_rate)).add_attribute(Attribute::Bold),
        count_cell(total_errors, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    let problems: Vec<&FileOutcome> = summary
        .files
        .iter()
        .filter(|outcome| !outcome.errors.is_empty())
        .collect();
    if !problems.is_empty() {
        eprintln!("Errors:");
        for outcome in problems {
            for error in &outcome.errors {
                eprintln!("- {}: {error}", file_name(outcome));
            }
        }
    }
}

pub fn print_validation(outcomes: &[ValidationOutcome]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Report ID"),
        header_cell("Valid"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut messages = Vec::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => {
                table.add_row(vec![
                    Cell::new(&outcome.file_id),
                    report_cell(Some(&result.report_id)),
                    valid_cell(result.is_valid),
                    count_cell(result.error_count(), Color::Red),
                    count_cell(result.warning_count(), Color::Yellow),
                ]);
                for error in &result.errors {
                    messages.push((outcome.file_id.as_str(), "ERROR", error.as_str()));
                }
                for warning in &result.warnings {
                    messages.push((outcome.file_id.as_str(), "WARN", warning.as_str()));
                }
            }
            Err(error) => {
                table.add_row(vec![
                    Cell::new(&outcome.file_id),
                    dim_cell("-"),
                    status_cell(FileStatus::Failed),
                    count_cell(1, Color::Red),
                    dim_cell("-"),
                ]);
                messages.push((outcome.file_id.as_str(), "ERROR", error.as_str()));
            }
        }
    }
    println!("{table}");

    if messages.is_empty() {
        return;
    }
    let mut issues = Table::new();
    issues.set_header(vec![
        header_cell("File"),
        header_cell("Severity"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut issues);
    align_column(&mut issues, 1, CellAlignment::Center);
    for (file_id, severity, message) in messages {
        let severity_cell = if severity == "ERROR" {
            Cell::new(severity).fg(Color::Red)
        } else {
            Cell::new(severity).fg(Color::Yellow)
        };
        issues.add_row(vec![Cell::new(file_id), severity_cell, Cell::new(message)]);
    }
    println!();
    println!("Issues:");
    println!("{issues}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn file_name(outcome: &FileOutcome) -> String {
    outcome
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| outcome.file_id.clone())
}

fn report_cell(report_id: Option<&str>) -> Cell {
    match report_id {
        Some(id) => Cell::new(id)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn status_cell(status: FileStatus) -> Cell {
    let color = match status {
        FileStatus::Converted => Color::Green,
        FileStatus::Rejected => Color::Yellow,
        FileStatus::Failed => Color::Red,
    };
    Cell::new(status.as_str().to_uppercase())
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn valid_cell(valid: bool) -> Cell {
    if valid {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("✗")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
