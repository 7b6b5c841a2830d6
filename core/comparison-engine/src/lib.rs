//! FILENAME: core/comparison-engine/src/lib.rs
//! Period comparison subsystem.
//!
//! This crate compares two snapshots of the same transaction dataset at
//! several granularities. It depends on `engine` for the table model, the
//! dataset source seam and the loader.
//!
//! Layers:
//! - `definition`: Serializable configuration (what a comparison run IS)
//! - `engine`: Aggregate, join and delta pipeline (HOW we calculate)
//! - `view`: Output tables with TOTAL rows and chart series (WHAT we display)
//! - `report`: Per-level orchestration with isolated failures

pub mod definition;
pub mod engine;
pub mod error;
pub mod report;
pub mod view;

pub use definition::*;
pub use engine::{
    compare_tables, compute_deltas, delta, join, percent_change, AggregateRow, Aggregator,
    ComparisonRow, ComparisonSet, Delta, GroupKey, JoinedRow, JoinedTable, PeriodPair,
};
pub use error::ComparisonError;
pub use report::*;
pub use view::*;
