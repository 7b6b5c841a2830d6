//! FILENAME: core/engine/src/table.rs
//! PURPOSE: In-memory representation of one sheet of a period's dataset.
//! CONTEXT: A `Table` is a header row plus dense data rows of `CellValue`.
//! Columns are addressed by header name; the first column is the one the
//! loader inspects for a trailing TOTAL marker.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// A named sheet: header names plus data rows.
/// Row and column indices are 0-based and exclude the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Sheet name the table was read from.
    pub name: String,

    /// Column headers, in source order.
    pub headers: Vec<String>,

    /// Data rows. Rows shorter than `headers` are treated as padded with `Empty`.
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    /// Creates a new, empty table with the given headers.
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Table {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Convenience constructor used by fixtures: headers from string slices.
    pub fn with_headers(name: impl Into<String>, headers: &[&str]) -> Self {
        Self::new(name, headers.iter().map(|h| h.to_string()).collect())
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds a column by header name. Header whitespace is ignored.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Retrieves a cell. Missing trailing cells read as `Empty`.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Iterates the values of one column, top to bottom.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }

    pub fn last_row(&self) -> Option<&Vec<CellValue>> {
        self.rows.last()
    }

    pub fn pop_row(&mut self) -> Option<Vec<CellValue>> {
        self.rows.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::with_headers("WITH 6010", &["REGION", " VOLUME ", "VALUE"]);
        table.push_row(vec![CellValue::text("LA"), 10.0.into(), 100.0.into()]);
        table.push_row(vec![CellValue::text("OG")]);
        table
    }

    #[test]
    fn column_lookup_ignores_header_whitespace() {
        let table = sample();
        assert_eq!(table.column_index("VOLUME"), Some(1));
        assert_eq!(table.column_index("STATE"), None);
    }

    #[test]
    fn short_rows_read_as_empty() {
        let table = sample();
        assert_eq!(table.cell(1, 2), &CellValue::Empty);
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
    }

    #[test]
    fn column_values_cover_every_row() {
        let table = sample();
        let values: Vec<_> = table.column_values(1).cloned().collect();
        assert_eq!(values, vec![CellValue::Number(10.0), CellValue::Empty]);
    }
}
