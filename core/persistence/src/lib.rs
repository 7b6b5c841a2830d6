//! FILENAME: core/persistence/src/lib.rs
//! Persistence Module
//!
//! Reads period workbooks (XLSX, via calamine) into the dataset model and
//! writes comparison tables back out as XLSX files and a ZIP bundle.

mod bundle;
mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use bundle::{BundleEntry, ExportBundle, DEFAULT_ARCHIVE_NAME};
pub use error::PersistenceError;
pub use xlsx_reader::XlsxSource;
pub use xlsx_writer::{save_table_xlsx, table_to_xlsx, INTEGER_FORMAT, PERCENT_FORMAT};
