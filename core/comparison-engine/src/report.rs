//! FILENAME: core/comparison-engine/src/report.rs
//! Comparison Report - runs every comparison level over two periods.
//!
//! Each level is an isolated pipeline (load -> aggregate -> join -> deltas ->
//! totals). A level that fails keeps its error and produces no table; the
//! other levels are unaffected.

use log::{debug, warn};
use engine::{load_with_marker, DatasetSource, Measure, Table};
use crate::definition::{ComparisonConfig, ComparisonLevel, LevelDefinition, Period, PeriodLabels};
use crate::engine::{compare_tables, Aggregator, ComparisonRow, ComparisonSet};
use crate::error::ComparisonError;
use crate::view::{
    chart_series, detail_table, difference_table, measure_period_positions, measure_table,
    weekly_period_positions, weekly_totals_table, ChartPoint, ComparisonTable,
};

// Output table names; also the stems of the exported file names.
pub const WEEKLY_TOTALS: &str = "weekly_totals";
pub const REGION_BANK_COMPARISON: &str = "region_bank_comparison";
pub const REGION_VOLUME: &str = "region_volume";
pub const REGION_VALUE: &str = "region_value";
pub const REGION_DIFFERENCES: &str = "region_differences";
pub const STATE_COMPARISON: &str = "state_comparison";

/// The three region tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTables {
    pub volume: ComparisonTable,
    pub value: ComparisonTable,
    pub differences: ComparisonTable,
}

/// Result of one comparison run: one outcome per level.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub labels: PeriodLabels,
    pub weekly_totals: Result<ComparisonTable, ComparisonError>,
    pub region_bank: Result<ComparisonTable, ComparisonError>,
    pub region: Result<RegionTables, ComparisonError>,
    pub state: Result<ComparisonTable, ComparisonError>,
}

impl ComparisonReport {
    /// Successfully built tables, in export order.
    pub fn tables(&self) -> Vec<&ComparisonTable> {
        let mut tables = Vec::new();
        if let Ok(t) = &self.weekly_totals {
            tables.push(t);
        }
        if let Ok(t) = &self.region_bank {
            tables.push(t);
        }
        if let Ok(region) = &self.region {
            tables.push(&region.volume);
            tables.push(&region.value);
            tables.push(&region.differences);
        }
        if let Ok(t) = &self.state {
            tables.push(t);
        }
        tables
    }

    pub fn table(&self, name: &str) -> Option<&ComparisonTable> {
        self.tables().into_iter().find(|t| t.name == name)
    }

    /// Levels that failed, with their errors.
    pub fn failures(&self) -> Vec<(ComparisonLevel, &ComparisonError)> {
        let mut failures = Vec::new();
        if let Err(e) = &self.weekly_totals {
            failures.push((ComparisonLevel::WeeklyTotals, e));
        }
        if let Err(e) = &self.region_bank {
            failures.push((ComparisonLevel::RegionBank, e));
        }
        if let Err(e) = &self.region {
            failures.push((ComparisonLevel::Region, e));
        }
        if let Err(e) = &self.state {
            failures.push((ComparisonLevel::State, e));
        }
        failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }

    /// Bars of both periods' per-sheet totals for one measure.
    pub fn weekly_chart(&self, measure: Measure) -> Vec<ChartPoint> {
        let Ok(table) = &self.weekly_totals else {
            return Vec::new();
        };
        chart_series(table, &weekly_period_positions(measure))
    }

    /// Bars of both periods' per-region figures for one measure.
    pub fn region_chart(&self, measure: Measure) -> Vec<ChartPoint> {
        let Ok(region) = &self.region else {
            return Vec::new();
        };
        let table = match measure {
            Measure::Volume => &region.volume,
            Measure::Value => &region.value,
        };
        chart_series(table, &measure_period_positions(table))
    }
}

/// Drives the levels of one run over a pair of sources.
pub struct Comparer<'a> {
    config: &'a ComparisonConfig,
    labels: PeriodLabels,
    previous: &'a mut dyn DatasetSource,
    current: &'a mut dyn DatasetSource,
}

impl<'a> Comparer<'a> {
    pub fn new(
        config: &'a ComparisonConfig,
        previous: &'a mut dyn DatasetSource,
        current: &'a mut dyn DatasetSource,
    ) -> Self {
        let labels = PeriodLabels::resolve(previous.identifier(), current.identifier(), config);
        Comparer {
            config,
            labels,
            previous,
            current,
        }
    }

    pub fn labels(&self) -> &PeriodLabels {
        &self.labels
    }

    /// Loads one sheet from both periods.
    fn load_pair(&mut self, sheet: &str) -> Result<(Table, Table), ComparisonError> {
        let config = self.config;
        let required = config.required_columns();
        let previous = load_with_marker(&mut *self.previous, sheet, &required, &config.total_marker)?;
        let current = load_with_marker(&mut *self.current, sheet, &required, &config.total_marker)?;
        Ok((previous, current))
    }

    /// Runs the shared pipeline for one sheet of `definition`.
    pub fn compare_sheet(
        &mut self,
        definition: &LevelDefinition,
        sheet: &str,
    ) -> Result<ComparisonSet, ComparisonError> {
        let config = self.config;
        let states = config.state_names();
        let mut aggregator = Aggregator::new(&config.schema, &config.unknown_category);
        if definition.map_categories {
            aggregator = aggregator.with_state_names(&states);
        }

        let (previous, current) = self.load_pair(sheet)?;
        let set = compare_tables(
            &aggregator,
            &previous,
            &current,
            &definition.dimensions,
            &self.labels,
        )?;
        debug!("{} / '{}': {} comparison rows", definition.level, sheet, set.rows.len());
        Ok(set)
    }

    /// Runs the shared pipeline for every sheet of `definition`.
    pub fn compare_level(
        &mut self,
        definition: &LevelDefinition,
    ) -> Result<Vec<(String, ComparisonSet)>, ComparisonError> {
        let mut sets = Vec::with_capacity(definition.sheets.len());
        for sheet in &definition.sheets {
            sets.push((sheet.clone(), self.compare_sheet(definition, sheet)?));
        }
        Ok(sets)
    }

    /// Runs a level over the WITH sheet (all levels but the weekly totals).
    fn compare_with_sheet(&mut self, level: ComparisonLevel) -> Result<ComparisonSet, ComparisonError> {
        let definition = level.definition(self.config);
        let sheet = self.config.with_sheet.clone();
        self.compare_sheet(&definition, &sheet)
    }

    pub fn weekly_totals(&mut self) -> Result<ComparisonTable, ComparisonError> {
        let definition = ComparisonLevel::WeeklyTotals.definition(self.config);
        let rows: Vec<(String, ComparisonRow)> = self
            .compare_level(&definition)?
            .into_iter()
            .filter_map(|(sheet, set)| set.rows.into_iter().next().map(|row| (sheet, row)))
            .collect();
        Ok(weekly_totals_table(WEEKLY_TOTALS, &rows, &self.labels))
    }

    pub fn region_bank(&mut self) -> Result<ComparisonTable, ComparisonError> {
        let set = self.compare_with_sheet(ComparisonLevel::RegionBank)?;
        Ok(detail_table(REGION_BANK_COMPARISON, &set))
    }

    pub fn region(&mut self) -> Result<RegionTables, ComparisonError> {
        let set = self.compare_with_sheet(ComparisonLevel::Region)?;
        Ok(RegionTables {
            volume: measure_table(REGION_VOLUME, &set, Measure::Volume),
            value: measure_table(REGION_VALUE, &set, Measure::Value),
            differences: difference_table(REGION_DIFFERENCES, &set),
        })
    }

    pub fn state(&mut self) -> Result<ComparisonTable, ComparisonError> {
        let set = self.compare_with_sheet(ComparisonLevel::State)?;
        Ok(difference_table(STATE_COMPARISON, &set))
    }

    /// Runs every level, keeping each level's error to itself.
    pub fn run(mut self) -> ComparisonReport {
        let weekly_totals = log_failure(ComparisonLevel::WeeklyTotals, self.weekly_totals());
        let region_bank = log_failure(ComparisonLevel::RegionBank, self.region_bank());
        let region = log_failure(ComparisonLevel::Region, self.region());
        let state = log_failure(ComparisonLevel::State, self.state());

        ComparisonReport {
            labels: self.labels,
            weekly_totals,
            region_bank,
            region,
            state,
        }
    }
}

fn log_failure<T>(
    level: ComparisonLevel,
    outcome: Result<T, ComparisonError>,
) -> Result<T, ComparisonError> {
    if let Err(e) = &outcome {
        warn!("{} comparison failed: {}", level, e);
    }
    outcome
}

/// Builds the full report. Both periods must be supplied; nothing is
/// computed when either is missing.
pub fn build_report(
    previous: Option<&mut dyn DatasetSource>,
    current: Option<&mut dyn DatasetSource>,
    config: &ComparisonConfig,
) -> Result<ComparisonReport, ComparisonError> {
    let previous = previous.ok_or(ComparisonError::MissingInput(Period::Previous))?;
    let current = current.ok_or(ComparisonError::MissingInput(Period::Current))?;
    Ok(Comparer::new(config, previous, current).run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{CellValue, MemorySource};
    use crate::view::TableValue;

    fn sheet(name: &str, rows: &[(&str, &str, &str, f64, f64)]) -> Table {
        let mut table = Table::with_headers(name, &["REGION", "BANK", "STATE", "VOLUME", "VALUE"]);
        for (region, bank, state, volume, value) in rows {
            table.push_row(vec![
                CellValue::text(*region),
                CellValue::text(*bank),
                CellValue::text(*state),
                (*volume).into(),
                (*value).into(),
            ]);
        }
        table
    }

    fn source(id: &str, with: &[(&str, &str, &str, f64, f64)], without: &[(&str, &str, &str, f64, f64)]) -> MemorySource {
        MemorySource::new(Some(id))
            .with_sheet(sheet("WITH 6010", with))
            .with_sheet(sheet("WITHOUT 6010", without))
    }

    #[test]
    fn missing_input_stops_the_run() {
        let config = ComparisonConfig::default();
        let mut current = source("week_5.xlsx", &[], &[]);
        let err = build_report(None, Some(&mut current), &config).unwrap_err();
        assert_eq!(err, ComparisonError::MissingInput(Period::Previous));

        let mut previous = source("week_4.xlsx", &[], &[]);
        let err = build_report(Some(&mut previous), None, &config).unwrap_err();
        assert_eq!(err, ComparisonError::MissingInput(Period::Current));
    }

    #[test]
    fn builds_every_table() {
        let config = ComparisonConfig::default();
        let mut previous = source(
            "week_4 export.xlsx",
            &[("LA", "X", "LA", 100.0, 1000.0)],
            &[("LA", "X", "LA", 80.0, 800.0)],
        );
        let mut current = source(
            "week_5 export.xlsx",
            &[("LA", "X", "LA", 150.0, 900.0)],
            &[("LA", "X", "LA", 80.0, 700.0)],
        );

        let report = build_report(Some(&mut previous), Some(&mut current), &config).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.labels, PeriodLabels::new("WEEK_4", "WEEK_5"));

        let names: Vec<&str> = report.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                WEEKLY_TOTALS, REGION_BANK_COMPARISON, REGION_VOLUME, REGION_VALUE,
                REGION_DIFFERENCES, STATE_COMPARISON,
            ]
        );

        let state = report.table(STATE_COMPARISON).unwrap();
        assert_eq!(state.find_row("Lagos").map(|r| r.cells[1].clone()), Some(TableValue::Integer(50)));

        let weekly = report.table(WEEKLY_TOTALS).unwrap();
        let without = weekly.find_row("WITHOUT 6010").unwrap();
        assert_eq!(without.cells[7], TableValue::Integer(-100));
        assert_eq!(without.cells[8], TableValue::Percent(-12.5));
    }

    #[test]
    fn failing_level_does_not_block_others() {
        let config = ComparisonConfig::default();
        let mut no_state = Table::with_headers("WITH 6010", &["REGION", "BANK", "VOLUME", "VALUE"]);
        no_state.push_row(vec![CellValue::text("LA"), CellValue::text("X"), 1.0.into(), 2.0.into()]);
        let mut previous = MemorySource::new(None)
            .with_sheet(no_state.clone())
            .with_sheet(Table { name: "WITHOUT 6010".to_string(), ..no_state.clone() });
        let mut current = previous.clone();

        let report = build_report(Some(&mut previous), Some(&mut current), &config).unwrap();

        assert!(report.weekly_totals.is_ok());
        assert!(report.region_bank.is_ok());
        assert!(report.region.is_ok());
        assert_eq!(
            report.state,
            Err(ComparisonError::MissingDimension {
                sheet: "WITH 6010".to_string(),
                column: "STATE".to_string(),
            })
        );
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.tables().len(), 5);
    }

    #[test]
    fn missing_without_sheet_only_fails_weekly_totals() {
        let config = ComparisonConfig::default();
        let mut previous = MemorySource::new(None).with_sheet(sheet("WITH 6010", &[("LA", "X", "LA", 1.0, 1.0)]));
        let mut current = previous.clone();

        let report = build_report(Some(&mut previous), Some(&mut current), &config).unwrap();
        assert!(matches!(
            report.weekly_totals,
            Err(ComparisonError::Load(engine::LoadError::SheetNotFound { .. }))
        ));
        assert!(report.region_bank.is_ok());
        assert!(report.state.is_ok());
    }

    #[test]
    fn charts_cover_both_periods() {
        let config = ComparisonConfig::default();
        let mut previous = source("week_4.xlsx", &[("LA", "X", "LA", 10.0, 1.0), ("OG", "Y", "OG", 5.0, 1.0)], &[]);
        let mut current = source("week_5.xlsx", &[("LA", "X", "LA", 12.0, 1.0)], &[]);
        let report = build_report(Some(&mut previous), Some(&mut current), &config).unwrap();

        let weekly = report.weekly_chart(Measure::Volume);
        assert_eq!(weekly.len(), 4);
        assert_eq!(weekly[0].metric, "WEEK_4.XLSX VOLUME");

        let region = report.region_chart(Measure::Volume);
        assert_eq!(region.len(), 4);
        assert!(region.iter().any(|p| p.category == "OG" && p.amount == 0.0));
    }

    #[test]
    fn charts_keep_periods_apart_when_labels_match() {
        let config = ComparisonConfig::default();
        let mut previous = source("week_4 a.xlsx", &[("LA", "X", "LA", 10.0, 200.0)], &[]);
        let mut current = source("week_4 b.xlsx", &[("LA", "X", "LA", 99.0, 300.0)], &[]);
        let report = build_report(Some(&mut previous), Some(&mut current), &config).unwrap();
        assert_eq!(report.labels, PeriodLabels::new("WEEK_4", "WEEK_4"));

        let region = report.region_chart(Measure::Volume);
        let amounts: Vec<f64> = region.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![10.0, 99.0]);
        assert!(region.iter().all(|p| p.metric == "VOLUME_WEEK_4"));

        let weekly = report.weekly_chart(Measure::Value);
        let amounts: Vec<f64> = weekly
            .iter()
            .filter(|p| p.category == "WITH 6010")
            .map(|p| p.amount)
            .collect();
        assert_eq!(amounts, vec![200.0, 300.0]);
    }
}
