use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color,
    ContentArrangement, Table,
};
use yansi::Paint;

use crossbench::evaluator::RunSummary;
use crossbench::summary::ModelSummary;

/// Map an accuracy percentage to its display color.
fn accuracy_color(accuracy: f64) -> Color {
    if accuracy >= 75.0 {
        Color::Green
    } else if accuracy >= 50.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Create a right-aligned accuracy Cell, colored when the terminal allows it.
fn accuracy_cell(accuracy: f64) -> Cell {
    let cell = Cell::new(format!("{accuracy:.2}%")).set_alignment(CellAlignment::Right);
    if yansi::is_enabled() {
        cell.fg(accuracy_color(accuracy))
    } else {
        cell
    }
}

fn count_cell(n: usize) -> Cell {
    Cell::new(n).set_alignment(CellAlignment::Right)
}

/// Comparison table of finished runs.
pub fn summary_table(rows: &[ModelSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("MODEL").add_attribute(Attribute::Bold),
            Cell::new("PROVIDER").add_attribute(Attribute::Bold),
            Cell::new("ACCURACY").add_attribute(Attribute::Bold),
            Cell::new("CORRECT").add_attribute(Attribute::Bold),
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
        ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.model),
            Cell::new(&row.provider),
            accuracy_cell(row.accuracy),
            count_cell(row.correct_answers),
            count_cell(row.total_questions),
        ]);
    }
    table
}

/// Final per-model report printed after a run.
pub fn print_run_summary(summary: &RunSummary) {
    let report = &summary.report;
    println!();
    println!("{}", format!("Results for {}:", report.model).bold());
    println!("Accuracy: {:.2}%", report.accuracy);
    println!("Total questions: {}", report.total_questions);
    println!("Correct answers: {}", report.correct_answers);
    if summary.skipped_batches > 0 {
        println!(
            "{}",
            format!("Skipped batches: {}", summary.skipped_batches).yellow()
        );
    }
    println!("Detailed results saved to: {}", summary.artifact.display());
}
