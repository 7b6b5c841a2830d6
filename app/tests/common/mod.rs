//! FILENAME: tests/common/mod.rs
//! Test harness and fixtures for weekly-compare integration tests.
//! Workbooks are written with rust_xlsxwriter into a temporary directory
//! and read back through the real XLSX source.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use app_lib::{Args, LogLevel};
use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

/// (REGION, BANK, STATE, VOLUME, VALUE)
pub type Txn<'a> = (&'a str, &'a str, &'a str, f64, f64);

pub const HEADERS: [&str; 5] = ["REGION", "BANK", "STATE", "VOLUME", "VALUE"];

/// Test harness owning a scratch directory for inputs and outputs.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        TestHarness {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Writes a workbook with WITH 6010 / WITHOUT 6010 sheets, each ending in
    /// a TOTAL summary row like the source exports.
    pub fn workbook(&self, file_name: &str, with: &[Txn], without: &[Txn]) -> PathBuf {
        self.workbook_with_sheets(file_name, &[("WITH 6010", with), ("WITHOUT 6010", without)])
    }

    pub fn workbook_with_sheets(&self, file_name: &str, sheets: &[(&str, &[Txn])]) -> PathBuf {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            for (col, header) in HEADERS.iter().enumerate() {
                sheet.write_string(0, col as u16, *header).unwrap();
            }

            let mut row_idx = 1u32;
            for (region, bank, state, volume, value) in rows.iter() {
                for (col, text) in [region, bank, state].iter().enumerate() {
                    if !text.is_empty() {
                        sheet.write_string(row_idx, col as u16, **text).unwrap();
                    }
                }
                sheet.write_number(row_idx, 3, *volume).unwrap();
                sheet.write_number(row_idx, 4, *value).unwrap();
                row_idx += 1;
            }

            let volume: f64 = rows.iter().map(|r| r.3).sum();
            let value: f64 = rows.iter().map(|r| r.4).sum();
            sheet.write_string(row_idx, 0, "TOTAL").unwrap();
            sheet.write_number(row_idx, 3, volume).unwrap();
            sheet.write_number(row_idx, 4, value).unwrap();
        }

        let path = self.path(file_name);
        workbook.save(&path).unwrap();
        path
    }

    /// Arguments for a quiet run writing into the scratch directory.
    pub fn args(&self, previous: Option<&Path>, current: Option<&Path>) -> Args {
        Args {
            previous: previous.map(Path::to_path_buf),
            current: current.map(Path::to_path_buf),
            out: self.path("all_tables.zip"),
            out_dir: None,
            config: None,
            log_level: LogLevel::Off,
            log_file: None,
            quiet: true,
        }
    }
}

/// Week 4 / week 5 fixture pair used across tests.
pub fn sample_weeks(harness: &TestHarness) -> (PathBuf, PathBuf) {
    let previous = harness.workbook(
        "week_4 export.xlsx",
        &[
            ("LA", "X", "LA", 100.0, 1000.0),
            ("LA", "Y", "LA", 40.0, 400.0),
            ("OG", "X", "OG", 10.0, 0.0),
        ],
        &[("LA", "X", "LA", 80.0, 800.0)],
    );
    let current = harness.workbook(
        "week_5 export.xlsx",
        &[
            ("LA", "X", "LA", 150.0, 900.0),
            ("LA", "Y", "LA", 40.0, 500.0),
            ("OG", "Y", "OG", 20.0, 300.0),
        ],
        &[("LA", "X", "LA", 90.0, 700.0)],
    );
    (previous, current)
}
