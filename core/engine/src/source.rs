//! FILENAME: core/engine/src/source.rs
//! PURPOSE: The seam between file-format readers and the comparison pipeline.
//! CONTEXT: A period's dataset is anything that can list and read named sheets.
//! `persistence::XlsxSource` implements this for workbooks; `MemorySource`
//! serves tables already held in memory (tests, embedding callers).

use std::collections::HashMap;
use crate::error::LoadError;
use crate::table::Table;

/// A period's raw dataset, exposing named sheets.
pub trait DatasetSource {
    /// Identifier of the source (typically the uploaded file name).
    /// Used only to derive the period's display label.
    fn identifier(&self) -> Option<&str>;

    /// Names of all sheets available in the source.
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one sheet. The first row of the sheet becomes the table headers.
    fn read_sheet(&mut self, sheet_name: &str) -> Result<Table, LoadError>;
}

/// A dataset whose sheets are already materialized as `Table`s.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    identifier: Option<String>,
    order: Vec<String>,
    sheets: HashMap<String, Table>,
}

impl MemorySource {
    pub fn new(identifier: Option<&str>) -> Self {
        MemorySource {
            identifier: identifier.map(|s| s.to_string()),
            order: Vec::new(),
            sheets: HashMap::new(),
        }
    }

    /// Adds (or replaces) a sheet, keyed by the table's name.
    pub fn insert(&mut self, table: Table) {
        if !self.sheets.contains_key(&table.name) {
            self.order.push(table.name.clone());
        }
        self.sheets.insert(table.name.clone(), table);
    }

    pub fn with_sheet(mut self, table: Table) -> Self {
        self.insert(table);
        self
    }
}

impl DatasetSource for MemorySource {
    fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.order.clone()
    }

    fn read_sheet(&mut self, sheet_name: &str) -> Result<Table, LoadError> {
        self.sheets
            .get(sheet_name)
            .cloned()
            .ok_or_else(|| LoadError::SheetNotFound {
                source_name: self.identifier.clone().unwrap_or_else(|| "<memory>".to_string()),
                sheet: sheet_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_of_sheets() {
        let source = MemorySource::new(Some("WEEK_4 export.xlsx"))
            .with_sheet(Table::with_headers("WITH 6010", &["VOLUME"]))
            .with_sheet(Table::with_headers("WITHOUT 6010", &["VOLUME"]));
        assert_eq!(source.sheet_names(), vec!["WITH 6010", "WITHOUT 6010"]);
        assert_eq!(source.identifier(), Some("WEEK_4 export.xlsx"));
    }

    #[test]
    fn missing_sheet_is_reported() {
        let mut source = MemorySource::new(None);
        let err = source.read_sheet("WITH 6010").unwrap_err();
        assert_eq!(
            err,
            LoadError::SheetNotFound {
                source_name: "<memory>".to_string(),
                sheet: "WITH 6010".to_string(),
            }
        );
    }
}
