//! FILENAME: core/comparison-engine/src/view.rs
//! Comparison View - Presentable output tables.
//!
//! This module turns a `ComparisonSet` into the tables consumers render or
//! export. Cells stay typed (integer / percentage / text); formatting is the
//! consumer's job. It also owns the TOTAL-row appender and the long-form
//! series used for bar charts.

use serde::{Deserialize, Serialize};
use engine::{Dimension, Measure};
use crate::definition::{Period, PeriodLabels};
use crate::engine::{ComparisonRow, ComparisonSet};

/// Key-column text of the synthetic summary row.
pub const TOTAL_LABEL: &str = "TOTAL";

// ============================================================================
// TABLE MODEL
// ============================================================================

/// How a column's values are typed and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Dimension key or sheet name.
    Key,
    /// Whole-unit volume/value or difference.
    Integer,
    /// Percentage points with two decimals.
    Percent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    pub header: String,
    pub kind: ColumnKind,
}

impl TableColumn {
    pub fn key(header: impl Into<String>) -> Self {
        TableColumn { header: header.into(), kind: ColumnKind::Key }
    }

    pub fn integer(header: impl Into<String>) -> Self {
        TableColumn { header: header.into(), kind: ColumnKind::Integer }
    }

    pub fn percent(header: impl Into<String>) -> Self {
        TableColumn { header: header.into(), kind: ColumnKind::Percent }
    }
}

/// A single cell of an output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableValue {
    Empty,
    Text(String),
    Integer(i64),
    Percent(f64),
}

impl TableValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TableValue::Integer(n) => Some(*n as f64),
            TableValue::Percent(p) => Some(*p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableValue>,
    /// Whether this is the synthetic TOTAL row.
    pub is_total: bool,
}

/// A named output table, e.g. "region_differences".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub name: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn new(name: impl Into<String>, columns: Vec<TableColumn>) -> Self {
        ComparisonTable {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<TableValue>) {
        self.rows.push(TableRow { cells, is_total: false });
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.header == header)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Rows other than the synthetic TOTAL row.
    pub fn data_rows(&self) -> impl Iterator<Item = &TableRow> + '_ {
        self.rows.iter().filter(|r| !r.is_total)
    }

    pub fn total_row(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.is_total)
    }

    /// Looks a cell up by row index and header.
    pub fn value(&self, row: usize, header: &str) -> Option<&TableValue> {
        let col = self.column_index(header)?;
        self.rows.get(row)?.cells.get(col)
    }

    /// Finds the first data row whose first column equals `key`.
    pub fn find_row(&self, key: &str) -> Option<&TableRow> {
        self.data_rows()
            .find(|r| matches!(r.cells.first(), Some(TableValue::Text(k)) if k == key))
    }
}

// ============================================================================
// TOTAL-ROW APPENDER
// ============================================================================

/// Appends a TOTAL row summing each of `summable_columns` over all
/// existing non-total rows.
///
/// The first key column reads "TOTAL"; other key columns and columns not
/// listed are left empty. Percentage columns are summed as plain numbers,
/// not recomputed from the summed differences.
pub fn append_total(mut table: ComparisonTable, summable_columns: &[&str]) -> ComparisonTable {
    let first_key = table.columns.iter().position(|c| c.kind == ColumnKind::Key);

    let cells = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, column)| {
            if Some(col) == first_key {
                return TableValue::Text(TOTAL_LABEL.to_string());
            }
            if !summable_columns.contains(&column.header.as_str()) {
                return TableValue::Empty;
            }
            let values = table.data_rows().filter_map(|r| r.cells.get(col));
            match column.kind {
                ColumnKind::Integer => TableValue::Integer(
                    values
                        .filter_map(|v| match v {
                            TableValue::Integer(n) => Some(*n),
                            _ => None,
                        })
                        .fold(0i64, i64::saturating_add),
                ),
                ColumnKind::Percent => {
                    TableValue::Percent(values.filter_map(TableValue::as_f64).sum())
                }
                ColumnKind::Key => TableValue::Empty,
            }
        })
        .collect();

    table.rows.push(TableRow { cells, is_total: true });
    table
}

// ============================================================================
// COLUMN NAMING
// ============================================================================

/// "VOLUME_WEEK_4"
pub fn period_column(measure: Measure, label: &str) -> String {
    format!("{}_{}", measure.name(), label)
}

/// "WEEK_4 VOLUME"
pub fn spaced_period_column(measure: Measure, label: &str) -> String {
    format!("{} {}", label, measure.name())
}

/// "VOL_DIFF"
pub fn diff_column(measure: Measure) -> String {
    format!("{}_DIFF", measure.short_name())
}

/// "VOL_%CHANGE"
pub fn change_column(measure: Measure) -> String {
    format!("{}_%CHANGE", measure.short_name())
}

fn key_cells(row: &ComparisonRow) -> impl Iterator<Item = TableValue> + '_ {
    row.key.iter().map(|k| TableValue::Text(k.clone()))
}

fn key_columns(dimensions: &[Dimension]) -> Vec<TableColumn> {
    dimensions.iter().map(|d| TableColumn::key(d.name())).collect()
}

// ============================================================================
// TABLE BUILDERS
// ============================================================================

/// Weekly totals: one row per sheet, each from a whole-sheet comparison.
pub fn weekly_totals_table(
    name: &str,
    sheets: &[(String, ComparisonRow)],
    labels: &PeriodLabels,
) -> ComparisonTable {
    let mut columns = vec![TableColumn::key("SHEET")];
    for measure in Measure::ALL {
        columns.push(TableColumn::integer(spaced_period_column(measure, labels.get(Period::Previous))));
        columns.push(TableColumn::integer(spaced_period_column(measure, labels.get(Period::Current))));
        columns.push(TableColumn::integer(format!("{} DIFF", measure.name())));
        columns.push(TableColumn::percent(format!("{} %", measure.name())));
    }

    let mut table = ComparisonTable::new(name, columns);
    for (sheet, row) in sheets {
        let mut cells = vec![TableValue::Text(sheet.clone())];
        for measure in Measure::ALL {
            let pair = row.pair(measure);
            let delta = row.delta(measure);
            cells.push(TableValue::Integer(pair.previous));
            cells.push(TableValue::Integer(pair.current));
            cells.push(TableValue::Integer(delta.diff));
            cells.push(TableValue::Percent(delta.percent));
        }
        table.push_row(cells);
    }
    table
}

/// Key columns, both periods' measures, diffs and percentage changes.
/// Used for the REGION + BANK comparison; no TOTAL row.
pub fn detail_table(name: &str, set: &ComparisonSet) -> ComparisonTable {
    let labels = &set.labels;
    let mut columns = key_columns(&set.dimensions);
    for period in [Period::Previous, Period::Current] {
        for measure in Measure::ALL {
            columns.push(TableColumn::integer(period_column(measure, labels.get(period))));
        }
    }
    for measure in Measure::ALL {
        columns.push(TableColumn::integer(format!("{}_DIFF", measure.name())));
    }
    for measure in Measure::ALL {
        columns.push(TableColumn::percent(format!("{}_%", measure.name())));
    }

    let mut table = ComparisonTable::new(name, columns);
    for row in &set.rows {
        let mut cells: Vec<TableValue> = key_cells(row).collect();
        cells.push(TableValue::Integer(row.volume.previous));
        cells.push(TableValue::Integer(row.value.previous));
        cells.push(TableValue::Integer(row.volume.current));
        cells.push(TableValue::Integer(row.value.current));
        cells.push(TableValue::Integer(row.volume_delta.diff));
        cells.push(TableValue::Integer(row.value_delta.diff));
        cells.push(TableValue::Percent(row.volume_delta.percent));
        cells.push(TableValue::Percent(row.value_delta.percent));
        table.push_row(cells);
    }
    table
}

/// One measure in both periods per key, with a TOTAL row.
pub fn measure_table(name: &str, set: &ComparisonSet, measure: Measure) -> ComparisonTable {
    let previous = period_column(measure, set.labels.get(Period::Previous));
    let current = period_column(measure, set.labels.get(Period::Current));

    let mut columns = key_columns(&set.dimensions);
    columns.push(TableColumn::integer(previous.clone()));
    columns.push(TableColumn::integer(current.clone()));

    let mut table = ComparisonTable::new(name, columns);
    for row in &set.rows {
        let pair = row.pair(measure);
        let mut cells: Vec<TableValue> = key_cells(row).collect();
        cells.push(TableValue::Integer(pair.previous));
        cells.push(TableValue::Integer(pair.current));
        table.push_row(cells);
    }

    append_total(table, &[previous.as_str(), current.as_str()])
}

/// Diffs and percentage changes per key, with a TOTAL row.
pub fn difference_table(name: &str, set: &ComparisonSet) -> ComparisonTable {
    let mut columns = key_columns(&set.dimensions);
    let mut summable = Vec::new();
    for measure in Measure::ALL {
        columns.push(TableColumn::integer(diff_column(measure)));
        columns.push(TableColumn::percent(change_column(measure)));
        summable.push(diff_column(measure));
        summable.push(change_column(measure));
    }

    let mut table = ComparisonTable::new(name, columns);
    for row in &set.rows {
        let mut cells: Vec<TableValue> = key_cells(row).collect();
        for measure in Measure::ALL {
            let delta = row.delta(measure);
            cells.push(TableValue::Integer(delta.diff));
            cells.push(TableValue::Percent(delta.percent));
        }
        table.push_row(cells);
    }

    let summable: Vec<&str> = summable.iter().map(|s| s.as_str()).collect();
    append_total(table, &summable)
}

// ============================================================================
// CHART SERIES
// ============================================================================

/// One bar of a grouped bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Category on the x axis (sheet, region, ...). Multi-key rows join with " / ".
    pub category: String,
    /// Series name, i.e. the source column header.
    pub metric: String,
    pub amount: f64,
}

/// Positions of the previous and current `measure` columns in a table
/// built by `weekly_totals_table`.
pub fn weekly_period_positions(measure: Measure) -> [usize; 2] {
    // SHEET, then four columns per measure.
    let first = match measure {
        Measure::Volume => 1,
        Measure::Value => 5,
    };
    [first, first + 1]
}

/// Positions of the previous and current columns in a table built by
/// `measure_table`. They follow the key columns.
pub fn measure_period_positions(table: &ComparisonTable) -> [usize; 2] {
    let keys = table.columns.iter().filter(|c| c.kind == ColumnKind::Key).count();
    [keys, keys + 1]
}

/// Reshapes the columns at `positions` into long form, one point per
/// (row, column). Columns are taken by position because the two period
/// headers may be identical. TOTAL rows are excluded; positions past the
/// last column are skipped.
pub fn chart_series(table: &ComparisonTable, positions: &[usize]) -> Vec<ChartPoint> {
    let key_cols: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == ColumnKind::Key)
        .map(|(i, _)| i)
        .collect();
    let metric_cols: Vec<(usize, &str)> = positions
        .iter()
        .filter_map(|&i| table.columns.get(i).map(|c| (i, c.header.as_str())))
        .collect();

    let mut points = Vec::new();
    for row in table.data_rows() {
        let category = key_cols
            .iter()
            .filter_map(|&i| match row.cells.get(i) {
                Some(TableValue::Text(s)) => Some(s.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" / ");
        for (col, metric) in &metric_cols {
            if let Some(amount) = row.cells.get(*col).and_then(TableValue::as_f64) {
                points.push(ChartPoint {
                    category: category.clone(),
                    metric: metric.to_string(),
                    amount,
                });
            }
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Delta, GroupKey, PeriodPair};

    fn row(key: &[&str], volume: (i64, i64), value: (i64, i64)) -> ComparisonRow {
        let volume = PeriodPair { previous: volume.0, current: volume.1 };
        let value = PeriodPair { previous: value.0, current: value.1 };
        ComparisonRow {
            key: key.iter().map(|k| k.to_string()).collect::<GroupKey>(),
            volume,
            value,
            volume_delta: crate::engine::delta(volume),
            value_delta: crate::engine::delta(value),
        }
    }

    fn region_set() -> ComparisonSet {
        ComparisonSet {
            dimensions: vec![Dimension::Region],
            labels: PeriodLabels::new("WEEK_4", "WEEK_5"),
            rows: vec![
                row(&["LA"], (100, 150), (1000, 900)),
                row(&["OG"], (0, 20), (0, 300)),
                row(&["KN"], (50, 25), (400, 500)),
            ],
        }
    }

    #[test]
    fn measure_table_total_is_column_sum() {
        let table = measure_table("region_volume", &region_set(), Measure::Volume);
        assert_eq!(table.headers(), vec!["REGION", "VOLUME_WEEK_4", "VOLUME_WEEK_5"]);

        let total = table.total_row().unwrap();
        assert_eq!(total.cells[0], TableValue::Text("TOTAL".to_string()));

        let expected: i64 = table
            .data_rows()
            .map(|r| match r.cells[2] {
                TableValue::Integer(n) => n,
                _ => 0,
            })
            .sum();
        assert_eq!(total.cells[2], TableValue::Integer(expected));
        assert_eq!(total.cells[1], TableValue::Integer(150));
    }

    #[test]
    fn difference_total_sums_row_percentages() {
        // Legacy behaviour: the TOTAL percentage is the sum of row percentages
        // (50 + 0 + -50 = 0), not the change of the summed columns (45 / 150 = 30%).
        let table = difference_table("region_differences", &region_set());
        assert_eq!(
            table.headers(),
            vec!["REGION", "VOL_DIFF", "VOL_%CHANGE", "VAL_DIFF", "VAL_%CHANGE"]
        );

        let total = table.total_row().unwrap();
        assert_eq!(total.cells[1], TableValue::Integer(45));
        assert_eq!(total.cells[2], TableValue::Percent(0.0));
        assert_eq!(total.cells[3], TableValue::Integer(300));
        assert_eq!(total.cells[4], TableValue::Percent(15.0));
    }

    #[test]
    fn append_total_ignores_existing_total_rows() {
        let table = measure_table("region_value", &region_set(), Measure::Value);
        let again = append_total(table, &["VALUE_WEEK_4"]);
        let totals: Vec<&TableRow> = again.rows.iter().filter(|r| r.is_total).collect();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[1].cells[1], TableValue::Integer(1400));
        assert_eq!(totals[1].cells[2], TableValue::Empty);
    }

    #[test]
    fn detail_table_orders_columns_by_period() {
        let set = ComparisonSet {
            dimensions: vec![Dimension::Region, Dimension::Bank],
            labels: PeriodLabels::new("WEEK_4", "WEEK_5"),
            rows: vec![row(&["LA", "X"], (100, 150), (1000, 900))],
        };
        let table = detail_table("region_bank_comparison", &set);
        assert_eq!(
            table.headers(),
            vec![
                "REGION", "BANK", "VOLUME_WEEK_4", "VALUE_WEEK_4", "VOLUME_WEEK_5",
                "VALUE_WEEK_5", "VOLUME_DIFF", "VALUE_DIFF", "VOLUME_%", "VALUE_%",
            ]
        );
        assert!(table.total_row().is_none());
        assert_eq!(table.value(0, "VALUE_%"), Some(&TableValue::Percent(-10.0)));
    }

    #[test]
    fn weekly_totals_use_spaced_headers() {
        let labels = PeriodLabels::new("WEEK_4", "WEEK_5");
        let sheets = vec![("WITH 6010".to_string(), row(&[], (10, 20), (0, 5)))];
        let table = weekly_totals_table("weekly_totals", &sheets, &labels);

        assert_eq!(table.columns[1].header, "WEEK_4 VOLUME");
        assert_eq!(table.columns[4].header, "VOLUME %");
        assert_eq!(table.value(0, "VOLUME %"), Some(&TableValue::Percent(100.0)));
        assert_eq!(table.value(0, "VALUE %"), Some(&TableValue::Percent(0.0)));
        assert_eq!(
            table.find_row("WITH 6010").map(|r| r.cells[3].clone()),
            Some(TableValue::Integer(10))
        );
    }

    #[test]
    fn chart_series_skips_total_row() {
        let table = measure_table("region_volume", &region_set(), Measure::Volume);
        let points = chart_series(&table, &[1, 2, 9]);
        assert_eq!(points.len(), 6);
        assert_eq!(
            points[0],
            ChartPoint {
                category: "LA".to_string(),
                metric: "VOLUME_WEEK_4".to_string(),
                amount: 100.0,
            }
        );
        assert!(points.iter().all(|p| p.category != "TOTAL"));
    }

    #[test]
    fn total_row_saturates_instead_of_overflowing() {
        let set = ComparisonSet {
            dimensions: vec![Dimension::Region],
            labels: PeriodLabels::new("WEEK_4", "WEEK_5"),
            rows: vec![
                row(&["LA"], (i64::MAX, 1), (0, 0)),
                row(&["OG"], (5, i64::MIN), (0, 0)),
            ],
        };
        let table = measure_table("region_volume", &set, Measure::Volume);
        let total = table.total_row().unwrap();
        assert_eq!(total.cells[1], TableValue::Integer(i64::MAX));
        assert_eq!(total.cells[2], TableValue::Integer(i64::MIN + 1));
    }

    #[test]
    fn period_positions_point_at_period_columns() {
        let sheets = vec![("WITH 6010".to_string(), row(&[], (1, 2), (3, 4)))];
        let labels = PeriodLabels::new("WEEK_4", "WEEK_5");
        let weekly = weekly_totals_table("weekly_totals", &sheets, &labels);
        let headers = weekly.headers();
        let [prev, curr] = weekly_period_positions(Measure::Value);
        assert_eq!((headers[prev], headers[curr]), ("WEEK_4 VALUE", "WEEK_5 VALUE"));
        let [prev, curr] = weekly_period_positions(Measure::Volume);
        assert_eq!((headers[prev], headers[curr]), ("WEEK_4 VOLUME", "WEEK_5 VOLUME"));

        let detail = measure_table("region_value", &region_set(), Measure::Value);
        assert_eq!(measure_period_positions(&detail), [1, 2]);
    }

    #[test]
    fn delta_type_is_copied_into_rows() {
        let r = row(&["OG"], (0, 20), (0, 300));
        assert_eq!(r.volume_delta, Delta { diff: 20, percent: 0.0 });
    }
}
