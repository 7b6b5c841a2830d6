//! FILENAME: core/comparison-engine/src/engine.rs
//! Comparison Engine - The calculation core shared by every comparison level.
//!
//! Algorithm:
//! 1. Aggregate: group each period's rows by the level's dimension keys and
//!    sum VOLUME and VALUE per group
//! 2. Join: full outer join of both periods on the key; a key missing on one
//!    side gets zero measures there, then measures are rounded to whole units
//! 3. Deltas: DIFF = current - previous, % = DIFF / previous * 100 rounded
//!    to two decimals, or 0 when the previous value is exactly zero
//!
//! Output rows are ordered by key so the same inputs always produce the
//! same table.

use std::collections::BTreeMap;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use engine::{
    fill_missing, round_to, to_whole_units, CategoryMap, CellValue, DatasetSchema, Dimension,
    Measure, Table,
};
use crate::definition::PeriodLabels;
use crate::error::ComparisonError;

// ============================================================================
// ROW TYPES
// ============================================================================

/// Values of the dimension keys for one group, in dimension order.
/// Empty for whole-sheet aggregation.
pub type GroupKey = SmallVec<[String; 2]>;

/// One group of a single period: the key and its summed measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub volume: f64,
    pub value: f64,
}

impl AggregateRow {
    pub fn measure(&self, measure: Measure) -> f64 {
        match measure {
            Measure::Volume => self.volume,
            Measure::Value => self.value,
        }
    }
}

/// A measure in both periods, in whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPair {
    pub previous: i64,
    pub current: i64,
}

/// One key after the outer join, before deltas are derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub key: GroupKey,
    pub volume: PeriodPair,
    pub value: PeriodPair,
}

/// Difference between periods and its percentage of the previous value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub diff: i64,
    pub percent: f64,
}

/// A joined key with both deltas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub key: GroupKey,
    pub volume: PeriodPair,
    pub value: PeriodPair,
    pub volume_delta: Delta,
    pub value_delta: Delta,
}

impl ComparisonRow {
    pub fn pair(&self, measure: Measure) -> PeriodPair {
        match measure {
            Measure::Volume => self.volume,
            Measure::Value => self.value,
        }
    }

    pub fn delta(&self, measure: Measure) -> Delta {
        match measure {
            Measure::Volume => self.volume_delta,
            Measure::Value => self.value_delta,
        }
    }
}

/// Output of the joiner: rows plus what they were keyed and labelled by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedTable {
    pub dimensions: Vec<Dimension>,
    pub labels: PeriodLabels,
    pub rows: Vec<JoinedRow>,
}

/// Output of the delta calculator; the input of every table view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSet {
    pub dimensions: Vec<Dimension>,
    pub labels: PeriodLabels,
    pub rows: Vec<ComparisonRow>,
}

// ============================================================================
// AGGREGATOR
// ============================================================================

/// Groups a loaded sheet by dimension keys and sums its measures.
pub struct Aggregator<'a> {
    schema: &'a DatasetSchema,
    unknown: &'a str,
    state_names: Option<&'a CategoryMap>,
}

impl<'a> Aggregator<'a> {
    pub fn new(schema: &'a DatasetSchema, unknown: &'a str) -> Self {
        Aggregator {
            schema,
            unknown,
            state_names: None,
        }
    }

    /// Translates STATE codes through `names` before grouping.
    pub fn with_state_names(mut self, names: &'a CategoryMap) -> Self {
        self.state_names = Some(names);
        self
    }

    /// Groups `table` by `dimensions`, summing VOLUME and VALUE per group.
    ///
    /// With no dimensions the whole table collapses into exactly one row,
    /// even when it has no data rows. Missing key values become the unknown
    /// label. Empty measure cells count as zero; any other non-numeric
    /// measure cell fails the aggregation.
    pub fn aggregate(
        &self,
        table: &Table,
        dimensions: &[Dimension],
    ) -> Result<Vec<AggregateRow>, ComparisonError> {
        let key_columns = dimensions
            .iter()
            .map(|dim| {
                let column = self.schema.dimension_column(*dim);
                table
                    .column_index(column)
                    .map(|idx| (*dim, idx))
                    .ok_or_else(|| ComparisonError::MissingDimension {
                        sheet: table.name.clone(),
                        column: column.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let volume_col = self.measure_index(table, Measure::Volume)?;
        let value_col = self.measure_index(table, Measure::Value)?;

        let mut groups: FxHashMap<GroupKey, (f64, f64)> = FxHashMap::default();
        if dimensions.is_empty() {
            groups.insert(GroupKey::new(), (0.0, 0.0));
        }

        for row in 0..table.row_count() {
            let key: GroupKey = key_columns
                .iter()
                .map(|(dim, col)| self.key_value(*dim, table.cell(row, *col)))
                .collect();

            let volume = self.measure_value(table, row, volume_col, Measure::Volume)?;
            let value = self.measure_value(table, row, value_col, Measure::Value)?;

            let entry = groups.entry(key).or_insert((0.0, 0.0));
            entry.0 += volume;
            entry.1 += value;
        }

        let mut rows: Vec<AggregateRow> = groups
            .into_iter()
            .map(|(key, (volume, value))| AggregateRow { key, volume, value })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        debug!(
            "aggregated sheet '{}' by {:?}: {} rows -> {} groups",
            table.name,
            dimensions,
            table.row_count(),
            rows.len()
        );
        Ok(rows)
    }

    fn measure_index(&self, table: &Table, measure: Measure) -> Result<usize, ComparisonError> {
        let column = self.schema.measure_column(measure);
        table.column_index(column).ok_or_else(|| {
            ComparisonError::Load(engine::LoadError::MissingColumn {
                sheet: table.name.clone(),
                column: column.to_string(),
            })
        })
    }

    /// Normalizes a key cell: missing -> unknown label, then STATE mapping.
    fn key_value(&self, dimension: Dimension, cell: &CellValue) -> String {
        let raw = if cell.is_empty() {
            None
        } else {
            Some(cell.display_value())
        };
        let filled = fill_missing(raw, self.unknown);
        match (dimension, self.state_names) {
            (Dimension::State, Some(names)) => names.map_category(&filled),
            _ => filled,
        }
    }

    fn measure_value(
        &self,
        table: &Table,
        row: usize,
        col: usize,
        measure: Measure,
    ) -> Result<f64, ComparisonError> {
        match table.cell(row, col) {
            CellValue::Number(n) => Ok(*n),
            CellValue::Empty => Ok(0.0),
            other => Err(ComparisonError::NonNumeric {
                sheet: table.name.clone(),
                column: self.schema.measure_column(measure).to_string(),
                data_row: row + 1,
                found: format!("{} {:?}", other.kind(), other.display_value()),
            }),
        }
    }
}

// ============================================================================
// PERIOD JOINER
// ============================================================================

/// Full outer join of two periods' aggregates on their keys.
///
/// Every key present in either period appears exactly once. The side a key
/// is missing from contributes zero measures; that defaulting happens in one
/// place (`zero_filled`) right after the join. Summed measures are then
/// rounded to whole units.
pub fn join(
    previous: &[AggregateRow],
    current: &[AggregateRow],
    dimensions: &[Dimension],
    labels: &PeriodLabels,
) -> JoinedTable {
    let mut sides: BTreeMap<&GroupKey, (Option<&AggregateRow>, Option<&AggregateRow>)> =
        BTreeMap::new();
    for row in previous {
        sides.entry(&row.key).or_default().0 = Some(row);
    }
    for row in current {
        sides.entry(&row.key).or_default().1 = Some(row);
    }

    let rows: Vec<JoinedRow> = sides
        .into_iter()
        .map(|(key, (prev, curr))| {
            let (prev_volume, prev_value) = zero_filled(prev);
            let (curr_volume, curr_value) = zero_filled(curr);
            JoinedRow {
                key: key.clone(),
                volume: PeriodPair {
                    previous: to_whole_units(prev_volume),
                    current: to_whole_units(curr_volume),
                },
                value: PeriodPair {
                    previous: to_whole_units(prev_value),
                    current: to_whole_units(curr_value),
                },
            }
        })
        .collect();

    debug!(
        "joined {} previous and {} current groups into {} keys",
        previous.len(),
        current.len(),
        rows.len()
    );

    JoinedTable {
        dimensions: dimensions.to_vec(),
        labels: labels.clone(),
        rows,
    }
}

/// Measures of one side of the join; an absent side is all zeros.
fn zero_filled(side: Option<&AggregateRow>) -> (f64, f64) {
    side.map(|row| (row.volume, row.value)).unwrap_or((0.0, 0.0))
}

// ============================================================================
// DELTA CALCULATOR
// ============================================================================

/// Percentage change of `diff` relative to `base`, rounded to two decimals.
/// A zero base yields exactly 0; a negative base divides normally.
pub fn percent_change(diff: i64, base: i64) -> f64 {
    if base == 0 {
        return 0.0;
    }
    let percent = round_to(diff as f64 / base as f64 * 100.0, 2);
    if percent.is_finite() { percent } else { 0.0 }
}

/// Delta between periods: always current minus previous, clamped to the
/// `i64` range.
pub fn delta(pair: PeriodPair) -> Delta {
    let diff = pair.current.saturating_sub(pair.previous);
    Delta {
        diff,
        percent: percent_change(diff, pair.previous),
    }
}

/// Derives VOLUME/VALUE differences and percentage changes for every row.
pub fn compute_deltas(joined: JoinedTable) -> ComparisonSet {
    let rows = joined
        .rows
        .into_iter()
        .map(|row| ComparisonRow {
            volume_delta: delta(row.volume),
            value_delta: delta(row.value),
            key: row.key,
            volume: row.volume,
            value: row.value,
        })
        .collect();

    ComparisonSet {
        dimensions: joined.dimensions,
        labels: joined.labels,
        rows,
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs the shared pipeline for one sheet pair: aggregate both periods,
/// outer-join them and derive deltas.
pub fn compare_tables(
    aggregator: &Aggregator<'_>,
    previous: &Table,
    current: &Table,
    dimensions: &[Dimension],
    labels: &PeriodLabels,
) -> Result<ComparisonSet, ComparisonError> {
    let previous_groups = aggregator.aggregate(previous, dimensions)?;
    let current_groups = aggregator.aggregate(current, dimensions)?;
    let joined = join(&previous_groups, &current_groups, dimensions, labels);
    Ok(compute_deltas(joined))
}
