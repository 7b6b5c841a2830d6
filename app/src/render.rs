//! FILENAME: app/src/render.rs
// PURPOSE: Plain-text rendering of comparison tables for the terminal.
// CONTEXT: Integers get thousands separators, percentages two decimals and a
//          percent sign. Keys are left-aligned, figures right-aligned.

use comparison_engine::{ColumnKind, ComparisonReport, ComparisonTable, TableValue};
use engine::{format_integer, format_percent_points};

pub fn format_value(value: &TableValue) -> String {
    match value {
        TableValue::Empty => String::new(),
        TableValue::Text(s) => s.clone(),
        TableValue::Integer(n) => format_integer(*n),
        TableValue::Percent(p) => format_percent_points(*p),
    }
}

/// Renders one table with a title line and aligned columns.
pub fn render_table(table: &ComparisonTable) -> String {
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(format_value).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.header.chars().count()).collect();
    for row in &body {
        for (col, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(col) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = format!("== {} ==\n", table.name);
    let headers: Vec<String> = table.columns.iter().map(|c| c.header.clone()).collect();
    push_line(&mut out, table, &widths, &headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(rule.join("  ").trim_end());
    out.push('\n');
    for row in &body {
        push_line(&mut out, table, &widths, row);
    }
    out
}

fn push_line(out: &mut String, table: &ComparisonTable, widths: &[usize], cells: &[String]) {
    let padded: Vec<String> = table
        .columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(col, (column, width))| {
            let cell = cells.get(col).map(String::as_str).unwrap_or("");
            match column.kind {
                ColumnKind::Key => format!("{:<width$}", cell, width = *width),
                ColumnKind::Integer | ColumnKind::Percent => format!("{:>width$}", cell, width = *width),
            }
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// Renders every built table in export order.
pub fn render_report(report: &ComparisonReport) -> String {
    let mut out = format!(
        "Comparing {} (previous) with {} (current)\n",
        report.labels.previous, report.labels.current
    );
    for table in report.tables() {
        out.push('\n');
        out.push_str(&render_table(table));
    }
    out
}

/// One line per failed level, e.g. "Error in State comparison: ...".
pub fn render_failures(report: &ComparisonReport) -> Vec<String> {
    report
        .failures()
        .into_iter()
        .map(|(level, err)| format!("Error in {} comparison: {}", level, err))
        .collect()
}
