//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the dataset layer.
//! CONTEXT: Re-exports the table model, the source seam, the loader and the
//! small label/category utilities consumed by the comparison engine.

pub mod category;
pub mod cell;
pub mod error;
pub mod label;
pub mod loader;
pub mod number_format;
pub mod schema;
pub mod source;
pub mod table;

// Re-export commonly used types at the crate root
pub use category::{fill_missing, CategoryMap, UNKNOWN_CATEGORY};
pub use cell::CellValue;
pub use error::LoadError;
pub use label::{resolve_label, CURRENT_FALLBACK, PREVIOUS_FALLBACK};
pub use loader::{is_total_row, load, load_with_marker, strip_total_row, TOTAL_MARKER};
pub use number_format::{format_decimal, format_integer, format_percent_points, round_to, to_whole_units};
pub use schema::{DatasetSchema, Dimension, Measure};
pub use source::{DatasetSource, MemorySource};
pub use table::Table;
