//! FILENAME: app/src/commands.rs
// PURPOSE: The operations the CLI performs: compare two workbooks and
//          export the resulting tables.

use std::path::{Path, PathBuf};
use comparison_engine::{build_report, ComparisonConfig, ComparisonError, ComparisonReport, Period};
use engine::DatasetSource;
use persistence::{ExportBundle, XlsxSource};
use crate::error::AppError;
use crate::{log_enter, log_exit, log_info};

/// Opens a period workbook; `None` passes through as a missing input.
fn open_source(path: Option<&Path>) -> Result<Option<XlsxSource<std::io::BufReader<std::fs::File>>>, AppError> {
    path.map(|p| {
        XlsxSource::open(p).map_err(|source| AppError::Open {
            path: p.to_path_buf(),
            source,
        })
    })
    .transpose()
}

/// Compares two workbooks on disk. A missing path is reported as a
/// missing input before anything is read.
pub fn compare_files(
    previous: Option<&Path>,
    current: Option<&Path>,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, AppError> {
    log_enter!("CMD", "compare_files", "previous={:?} current={:?}", previous, current);

    for (path, period) in [(previous, Period::Previous), (current, Period::Current)] {
        if path.is_none() {
            return Err(ComparisonError::MissingInput(period).into());
        }
    }

    let mut previous = open_source(previous)?;
    let mut current = open_source(current)?;
    let report = build_report(
        previous.as_mut().map(|s| s as &mut dyn DatasetSource),
        current.as_mut().map(|s| s as &mut dyn DatasetSource),
        config,
    )?;

    log_exit!(
        "CMD",
        "compare_files",
        "{} tables, {} failed levels",
        report.tables().len(),
        report.failures().len()
    );
    Ok(report)
}

/// Files written by one export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub archive: PathBuf,
    pub files: Vec<String>,
    pub written: Vec<PathBuf>,
}

/// Writes the ZIP bundle to `archive` and, when `out_dir` is given, each
/// workbook individually. Fails when no level produced a table; the error
/// then carries every level's failure message.
pub fn export_report(
    report: &ComparisonReport,
    archive: &Path,
    out_dir: Option<&Path>,
) -> Result<ExportSummary, AppError> {
    let bundle = ExportBundle::from_report(report)?;
    if bundle.is_empty() {
        return Err(AppError::NothingToExport {
            failures: crate::render::render_failures(report),
        });
    }

    bundle.write_to(archive)?;
    let written = match out_dir {
        Some(dir) => bundle.write_files(dir)?,
        None => Vec::new(),
    };
    log_info!("CMD", "exported {} tables to {}", bundle.entries().len(), archive.display());

    Ok(ExportSummary {
        archive: archive.to_path_buf(),
        files: bundle.file_names().iter().map(|s| s.to_string()).collect(),
        written,
    })
}
