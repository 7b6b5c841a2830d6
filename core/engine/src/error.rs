//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Sheet '{sheet}' not found in {source_name}")]
    SheetNotFound { source_name: String, sheet: String },

    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },

    #[error("Could not read source: {0}")]
    Source(String),
}
