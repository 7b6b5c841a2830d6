//! FILENAME: core/persistence/src/bundle.rs
//! Export bundle: every successfully built table as `<name>.xlsx`, packed
//! into one ZIP archive.

use std::fs::{self, File};
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use comparison_engine::{ComparisonReport, ComparisonTable};
use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};
use crate::xlsx_writer::table_to_xlsx;
use crate::PersistenceError;

/// Archive name used when the caller does not pick one.
pub const DEFAULT_ARCHIVE_NAME: &str = "all_tables.zip";

/// One exported workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleEntry {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The exported workbooks of one report, in export order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBundle {
    entries: Vec<BundleEntry>,
}

impl ExportBundle {
    pub fn from_tables<'a>(
        tables: impl IntoIterator<Item = &'a ComparisonTable>,
    ) -> Result<Self, PersistenceError> {
        let mut entries = Vec::new();
        for table in tables {
            entries.push(BundleEntry {
                file_name: format!("{}.xlsx", table.name),
                bytes: table_to_xlsx(table)?,
            });
        }
        Ok(ExportBundle { entries })
    }

    /// Bundles the tables of the levels that succeeded. Failed levels
    /// contribute no file.
    pub fn from_report(report: &ComparisonReport) -> Result<Self, PersistenceError> {
        Self::from_tables(report.tables())
    }

    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.file_name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the archive into any seekable writer.
    pub fn write_zip<W: Write + Seek>(&self, writer: W) -> Result<W, PersistenceError> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for entry in &self.entries {
            zip.start_file(entry.file_name.as_str(), options)?;
            zip.write_all(&entry.bytes)?;
        }
        Ok(zip.finish()?)
    }

    pub fn to_zip_bytes(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(self.write_zip(Cursor::new(Vec::new()))?.into_inner())
    }

    /// Writes the archive to `path`. An empty bundle is an error, so no
    /// archive without tables is ever produced.
    pub fn write_to(&self, path: &Path) -> Result<(), PersistenceError> {
        if self.is_empty() {
            return Err(PersistenceError::EmptyBundle(path.display().to_string()));
        }
        self.write_zip(File::create(path)?)?;
        info!("wrote {} tables to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Writes each workbook as its own file under `dir`.
    pub fn write_files(&self, dir: &Path) -> Result<Vec<PathBuf>, PersistenceError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let path = dir.join(&entry.file_name);
            fs::write(&path, &entry.bytes)?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}
