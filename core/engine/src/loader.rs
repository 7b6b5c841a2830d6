//! FILENAME: core/engine/src/loader.rs
//! PURPOSE: Dataset Loader - reads one sheet of a period into a normalized `Table`.
//! CONTEXT: Source exports often end with a summary row whose first cell says
//! "TOTAL". That row is metadata, not an observation, and is removed here
//! before anything is aggregated. No other row filtering happens.

use log::debug;
use crate::cell::CellValue;
use crate::error::LoadError;
use crate::source::DatasetSource;
use crate::table::Table;

/// Marker found in the first column of a trailing summary row.
pub const TOTAL_MARKER: &str = "TOTAL";

/// Loads `sheet_name` from `source`, dropping a trailing TOTAL row.
/// Every column in `required_columns` must be present in the header row.
pub fn load(
    source: &mut dyn DatasetSource,
    sheet_name: &str,
    required_columns: &[&str],
) -> Result<Table, LoadError> {
    load_with_marker(source, sheet_name, required_columns, TOTAL_MARKER)
}

/// Same as [`load`] with a caller-supplied summary-row marker.
pub fn load_with_marker(
    source: &mut dyn DatasetSource,
    sheet_name: &str,
    required_columns: &[&str],
    total_marker: &str,
) -> Result<Table, LoadError> {
    let mut table = source.read_sheet(sheet_name)?;

    for column in required_columns {
        if !table.has_column(column) {
            return Err(LoadError::MissingColumn {
                sheet: sheet_name.to_string(),
                column: column.to_string(),
            });
        }
    }

    let stripped = strip_total_row(&mut table, total_marker);
    debug!(
        "loaded sheet '{}': {} rows{}",
        sheet_name,
        table.row_count(),
        if stripped { " (trailing TOTAL row dropped)" } else { "" }
    );

    Ok(table)
}

/// Returns true if the row's first cell, trimmed, equals `marker` ignoring case.
pub fn is_total_row(row: &[CellValue], marker: &str) -> bool {
    match row.first() {
        Some(CellValue::Text(s)) => s.trim().eq_ignore_ascii_case(marker.trim()),
        _ => false,
    }
}

/// Removes the last row if it is a TOTAL row. Only the last row is inspected.
pub fn strip_total_row(table: &mut Table, marker: &str) -> bool {
    let is_total = table
        .last_row()
        .map(|row| is_total_row(row, marker))
        .unwrap_or(false);
    if is_total {
        table.pop_row();
    }
    is_total
}
