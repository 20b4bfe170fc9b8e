use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dff_filter::{ConditionOutcome, FilterOutput, FilterReport};
use dff_model::{ColumnKind, ColumnSchema};

/// Prints the per-condition table to stderr; stdout carries the TSV.
pub fn print_summary(output: &FilterOutput) {
    eprintln!(
        "Rows kept: {} ({} columns)",
        output.dataset.row_count(),
        output.dataset.column_count()
    );
    if let Some(source) = output.dataset.source() {
        eprintln!("Table: {}", source.display());
    }
    eprintln!("{}", summary_table(&output.report));
}

pub fn summary_table(report: &FilterReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Condition"),
        header_cell("Status"),
        header_cell("Before"),
        header_cell("After"),
        header_cell("Removed"),
    ]);
    apply_table_style(&mut table);
    for index in [0, 3, 4, 5] {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 2, CellAlignment::Center);

    let mut total_removed = 0usize;
    for (index, entry) in report.entries.iter().enumerate() {
        let row = match &entry.outcome {
            ConditionOutcome::Applied {
                rows_before,
                rows_after,
            } => {
                let removed = rows_before - rows_after;
                total_removed += removed;
                vec![
                    Cell::new(index + 1),
                    Cell::new(&entry.condition),
                    Cell::new("applied").fg(Color::Green),
                    Cell::new(rows_before),
                    Cell::new(rows_after),
                    removed_cell(removed),
                ]
            }
            ConditionOutcome::Skipped { column } => vec![
                Cell::new(index + 1),
                Cell::new(&entry.condition),
                Cell::new(format!("skipped: no column {column}")).fg(Color::Yellow),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
            ],
        };
        table.add_row(row);
    }
    table.add_row(vec![
        dim_cell(""),
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} applied, {} skipped",
            report.applied_count(),
            report.skipped_count()
        )),
        dim_cell("-"),
        dim_cell("-"),
        removed_cell(total_removed).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Schema catalogue, numeric columns first.
pub fn column_table(schema: &ColumnSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Kind")]);
    apply_table_style(&mut table);
    let numeric = schema.numeric_columns().map(|name| (name, ColumnKind::Numeric));
    let text = schema.text_columns().map(|name| (name, ColumnKind::Text));
    for (name, kind) in numeric.chain(text) {
        let kind_cell = match kind {
            ColumnKind::Numeric => Cell::new(kind.as_str()).fg(Color::Blue),
            ColumnKind::Text => Cell::new(kind.as_str()),
        };
        table.add_row(vec![Cell::new(name), kind_cell]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn removed_cell(removed: usize) -> Cell {
    if removed > 0 {
        Cell::new(removed).fg(Color::Red)
    } else {
        dim_cell(removed)
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
