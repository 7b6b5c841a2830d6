//! FILENAME: app/src/error.rs

use std::path::PathBuf;
use comparison_engine::ComparisonError;
use persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        source: PersistenceError,
    },

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error("Export failed: {0}")]
    Export(#[from] PersistenceError),

    #[error("Every comparison level failed; nothing to export\n{}", .failures.join("\n"))]
    NothingToExport { failures: Vec<String> },

    #[error("Could not write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
