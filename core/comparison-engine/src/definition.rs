//! FILENAME: core/comparison-engine/src/definition.rs
//! Comparison Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE a comparison run:
//! - which sheets and header names to read (`ComparisonConfig`)
//! - which levels exist and how each one groups its rows (`LevelDefinition`)
//! - how the two periods are labelled (`PeriodLabels`)

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use engine::{
    resolve_label, CategoryMap, DatasetSchema, Dimension, CURRENT_FALLBACK, PREVIOUS_FALLBACK,
    TOTAL_MARKER, UNKNOWN_CATEGORY,
};

// ============================================================================
// PERIODS
// ============================================================================

/// One of the two snapshots being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Previous,
    Current,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Previous => write!(f, "previous"),
            Period::Current => write!(f, "current"),
        }
    }
}

/// Display labels of both periods, e.g. ("WEEK_4", "WEEK_5").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLabels {
    pub previous: String,
    pub current: String,
}

impl PeriodLabels {
    pub fn new(previous: impl Into<String>, current: impl Into<String>) -> Self {
        PeriodLabels {
            previous: previous.into(),
            current: current.into(),
        }
    }

    /// Resolves both labels from the sources' identifiers, using the
    /// configured fallbacks when an identifier is absent or blank.
    pub fn resolve(
        previous_identifier: Option<&str>,
        current_identifier: Option<&str>,
        config: &ComparisonConfig,
    ) -> Self {
        PeriodLabels {
            previous: resolve_label(previous_identifier, &config.previous_fallback),
            current: resolve_label(current_identifier, &config.current_fallback),
        }
    }

    pub fn get(&self, period: Period) -> &str {
        match period {
            Period::Previous => &self.previous,
            Period::Current => &self.current,
        }
    }
}

// ============================================================================
// LEVELS
// ============================================================================

/// The granularities at which the two periods are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonLevel {
    /// One row per sheet, whole-sheet sums.
    WeeklyTotals,
    /// One row per (REGION, BANK) pair.
    RegionBank,
    /// One row per REGION; produces volume, value and difference tables.
    Region,
    /// One row per mapped STATE name.
    State,
}

impl ComparisonLevel {
    pub const ALL: [ComparisonLevel; 4] = [
        ComparisonLevel::WeeklyTotals,
        ComparisonLevel::RegionBank,
        ComparisonLevel::Region,
        ComparisonLevel::State,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComparisonLevel::WeeklyTotals => "Weekly Totals",
            ComparisonLevel::RegionBank => "Region + Bank",
            ComparisonLevel::Region => "Region",
            ComparisonLevel::State => "State",
        }
    }

    /// Resolves the level into the parameters of the shared pipeline.
    pub fn definition(&self, config: &ComparisonConfig) -> LevelDefinition {
        match self {
            ComparisonLevel::WeeklyTotals => LevelDefinition {
                level: *self,
                sheets: vec![config.with_sheet.clone(), config.without_sheet.clone()],
                dimensions: Vec::new(),
                map_categories: false,
            },
            ComparisonLevel::RegionBank => LevelDefinition {
                level: *self,
                sheets: vec![config.with_sheet.clone()],
                dimensions: vec![Dimension::Region, Dimension::Bank],
                map_categories: false,
            },
            ComparisonLevel::Region => LevelDefinition {
                level: *self,
                sheets: vec![config.with_sheet.clone()],
                dimensions: vec![Dimension::Region],
                map_categories: false,
            },
            ComparisonLevel::State => LevelDefinition {
                level: *self,
                sheets: vec![config.with_sheet.clone()],
                dimensions: vec![Dimension::State],
                map_categories: true,
            },
        }
    }
}

impl fmt::Display for ComparisonLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters for one invocation of the aggregate -> join -> delta pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub level: ComparisonLevel,

    /// Sheets compared at this level. Each sheet is compared independently.
    pub sheets: Vec<String>,

    /// Grouping keys. Empty means the whole sheet collapses into one row.
    pub dimensions: Vec<Dimension>,

    /// Whether STATE codes are translated to display names before grouping.
    pub map_categories: bool,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Everything a comparison run needs besides the two datasets.
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Sheet including the 6010 transactions; used by every level.
    pub with_sheet: String,

    /// Sheet excluding them; used by the weekly totals only.
    pub without_sheet: String,

    /// Label used when the previous period has no identifier.
    pub previous_fallback: String,

    /// Label used when the current period has no identifier.
    pub current_fallback: String,

    /// Header names of the consumed columns.
    pub schema: DatasetSchema,

    /// First-column text of a trailing summary row to drop at load time.
    pub total_marker: String,

    /// Replacement for missing categorical values.
    pub unknown_category: String,

    /// Extra state code -> name entries, merged over the built-in table.
    pub state_overrides: BTreeMap<String, String>,
}

impl ComparisonConfig {
    /// The state-name table with overrides applied.
    pub fn state_names(&self) -> CategoryMap {
        let mut states = CategoryMap::states();
        states.extend_from(&self.state_overrides);
        states
    }

    /// Measure columns every sheet must carry.
    pub fn required_columns(&self) -> [&str; 2] {
        [self.schema.volume.as_str(), self.schema.value.as_str()]
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            with_sheet: "WITH 6010".to_string(),
            without_sheet: "WITHOUT 6010".to_string(),
            previous_fallback: PREVIOUS_FALLBACK.to_string(),
            current_fallback: CURRENT_FALLBACK.to_string(),
            schema: DatasetSchema::default(),
            total_marker: TOTAL_MARKER.to_string(),
            unknown_category: UNKNOWN_CATEGORY.to_string(),
            state_overrides: BTreeMap::new(),
        }
    }
}
