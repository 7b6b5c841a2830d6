//! FILENAME: core/persistence/src/xlsx_reader.rs
//! Reads period workbooks through calamine and exposes them as a
//! `DatasetSource`. The first row of each sheet is its header row.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use log::debug;
use engine::{CellValue, DatasetSource, LoadError, Table};
use crate::PersistenceError;

/// An XLSX workbook opened as one period's dataset.
pub struct XlsxSource<RS: Read + Seek> {
    identifier: Option<String>,
    workbook: Xlsx<RS>,
}

impl XlsxSource<BufReader<File>> {
    /// Opens a workbook on disk. The file name becomes the identifier.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        let workbook: Xlsx<_> = open_workbook(path)?;
        let identifier = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        debug!("opened workbook {}", path.display());
        Ok(XlsxSource { identifier, workbook })
    }
}

impl XlsxSource<Cursor<Vec<u8>>> {
    /// Opens a workbook held in memory, e.g. an uploaded file.
    pub fn from_bytes(bytes: Vec<u8>, identifier: Option<&str>) -> Result<Self, PersistenceError> {
        let workbook = Xlsx::new(Cursor::new(bytes))?;
        Ok(XlsxSource {
            identifier: identifier.map(|s| s.to_string()),
            workbook,
        })
    }
}

impl<RS: Read + Seek> DatasetSource for XlsxSource<RS> {
    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Table, LoadError> {
        if !self.workbook.sheet_names().iter().any(|name| name == sheet_name) {
            return Err(LoadError::SheetNotFound {
                source_name: self
                    .identifier
                    .clone()
                    .unwrap_or_else(|| "<workbook>".to_string()),
                sheet: sheet_name.to_string(),
            });
        }

        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| LoadError::Source(e.to_string()))?;
        Ok(range_to_table(sheet_name, &range))
    }
}

/// Converts a worksheet range into a `Table`. Fully blank rows are dropped.
fn range_to_table(name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .unwrap_or_default();

    let mut table = Table::new(name, headers);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(to_cell_value).collect();
        if cells.iter().all(CellValue::is_empty) {
            continue;
        }
        table.push_row(cells);
    }
    table
}

fn to_cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
