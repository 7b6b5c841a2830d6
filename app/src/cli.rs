//! FILENAME: app/src/cli.rs
// PURPOSE: Command-line arguments of `weekly-compare`.

use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use persistence::DEFAULT_ARCHIVE_NAME;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "weekly-compare",
    about = "Compare two weekly transaction workbooks by sheet, region, bank and state."
)]
pub struct Args {
    /// Workbook of the previous period.
    #[arg(long)]
    pub previous: Option<PathBuf>,

    /// Workbook of the current period.
    #[arg(long)]
    pub current: Option<PathBuf>,

    /// ZIP archive receiving one XLSX file per table.
    #[arg(long, default_value = DEFAULT_ARCHIVE_NAME)]
    pub out: PathBuf,

    /// Also write each table as its own XLSX file into this directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// JSON file overriding sheet names, headers and state names.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Mirror log lines into this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Do not print the tables.
    #[arg(long, short)]
    pub quiet: bool,
}
