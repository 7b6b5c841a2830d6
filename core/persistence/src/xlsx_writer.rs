//! FILENAME: core/persistence/src/xlsx_writer.rs
//! Writes comparison tables as single-sheet XLSX workbooks.

use std::path::Path;
use comparison_engine::{ColumnKind, ComparisonTable, TableValue};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use crate::PersistenceError;

/// Excel number format of whole-unit columns.
pub const INTEGER_FORMAT: &str = "#,##0";

/// Percentage columns hold percentage points (50.0 means 50%), so the
/// percent sign is a literal rather than Excel's x100 `%` format.
pub const PERCENT_FORMAT: &str = "0.00\"%\"";

const MAX_SHEET_NAME: usize = 31;
const MIN_COLUMN_WIDTH: usize = 10;

/// Serializes one table into an in-memory workbook.
pub fn table_to_xlsx(table: &ComparisonTable) -> Result<Vec<u8>, PersistenceError> {
    let mut workbook = Workbook::new();
    write_table(workbook.add_worksheet(), table)?;
    Ok(workbook.save_to_buffer()?)
}

pub fn save_table_xlsx(table: &ComparisonTable, path: &Path) -> Result<(), PersistenceError> {
    let mut workbook = Workbook::new();
    write_table(workbook.add_worksheet(), table)?;
    workbook.save(path)?;
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &ComparisonTable) -> Result<(), PersistenceError> {
    worksheet.set_name(sheet_name(&table.name))?;

    let header_format = Format::new().set_bold();
    for (col, column) in table.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, &column.header, &header_format)?;
        let width = column.header.chars().count().max(MIN_COLUMN_WIDTH) + 2;
        worksheet.set_column_width(col, width as f64)?;
    }

    let formats: Vec<ColumnFormats> = table.columns.iter().map(|c| ColumnFormats::new(c.kind)).collect();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let xlsx_row = row_idx as u32 + 1;
        for (col, (value, formats)) in row.cells.iter().zip(&formats).enumerate() {
            let col = col as u16;
            let format = if row.is_total { &formats.bold } else { &formats.plain };
            match value {
                TableValue::Empty => {}
                TableValue::Text(s) => {
                    worksheet.write_string_with_format(xlsx_row, col, s, format)?;
                }
                TableValue::Integer(n) => {
                    worksheet.write_number_with_format(xlsx_row, col, *n as f64, format)?;
                }
                TableValue::Percent(p) => {
                    worksheet.write_number_with_format(xlsx_row, col, *p, format)?;
                }
            }
        }
    }

    Ok(())
}

/// Plain and TOTAL-row formats of one column.
struct ColumnFormats {
    plain: Format,
    bold: Format,
}

impl ColumnFormats {
    fn new(kind: ColumnKind) -> Self {
        let plain = match kind {
            ColumnKind::Key => Format::new(),
            ColumnKind::Integer => Format::new().set_num_format(INTEGER_FORMAT),
            ColumnKind::Percent => Format::new().set_num_format(PERCENT_FORMAT),
        };
        ColumnFormats {
            bold: plain.clone().set_bold(),
            plain,
        }
    }
}

/// Excel caps sheet names at 31 characters.
fn sheet_name(name: &str) -> String {
    name.chars().take(MAX_SHEET_NAME).collect()
}
