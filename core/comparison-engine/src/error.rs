//! FILENAME: core/comparison-engine/src/error.rs

use engine::LoadError;
use thiserror::Error;
use crate::definition::Period;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComparisonError {
    #[error("No dataset supplied for the {0} period")]
    MissingInput(Period),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingDimension { sheet: String, column: String },

    #[error("Sheet '{sheet}', column '{column}', data row {data_row}: expected a number, found {found}")]
    NonNumeric {
        sheet: String,
        column: String,
        data_row: usize,
        found: String,
    },
}
