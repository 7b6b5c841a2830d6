//! FILENAME: core/engine/src/schema.rs
//! PURPOSE: Typed description of the columns the comparison pipeline consumes.
//! CONTEXT: Dimensions are categorical grouping fields; measures are the two
//! summable numeric fields. `DatasetSchema` maps each to its header name so
//! callers never look columns up by ad-hoc strings.

use serde::{Deserialize, Serialize};

/// Categorical fields used to group rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Region,
    Bank,
    State,
}

impl Dimension {
    /// Header used for this dimension in comparison tables.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::Region => "REGION",
            Dimension::Bank => "BANK",
            Dimension::State => "STATE",
        }
    }
}

/// Summable numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measure {
    /// Transaction count.
    Volume,
    /// Monetary amount.
    Value,
}

impl Measure {
    pub const ALL: [Measure; 2] = [Measure::Volume, Measure::Value];

    /// Header stem used in comparison tables ("VOLUME_WEEK_4", "VALUE DIFF").
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Volume => "VOLUME",
            Measure::Value => "VALUE",
        }
    }

    /// Abbreviation used by the difference tables ("VOL_DIFF", "VAL_%CHANGE").
    pub fn short_name(&self) -> &'static str {
        match self {
            Measure::Volume => "VOL",
            Measure::Value => "VAL",
        }
    }
}

/// Header names for every dimension and measure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSchema {
    pub region: String,
    pub bank: String,
    pub state: String,
    pub volume: String,
    pub value: String,
}

impl DatasetSchema {
    pub fn dimension_column(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Region => &self.region,
            Dimension::Bank => &self.bank,
            Dimension::State => &self.state,
        }
    }

    pub fn measure_column(&self, measure: Measure) -> &str {
        match measure {
            Measure::Volume => &self.volume,
            Measure::Value => &self.value,
        }
    }
}

impl Default for DatasetSchema {
    fn default() -> Self {
        DatasetSchema {
            region: "REGION".to_string(),
            bank: "BANK".to_string(),
            state: "STATE".to_string(),
            volume: "VOLUME".to_string(),
            value: "VALUE".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_uses_upper_case_headers() {
        let schema = DatasetSchema::default();
        assert_eq!(schema.dimension_column(Dimension::State), "STATE");
        assert_eq!(schema.measure_column(Measure::Value), "VALUE");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let schema: DatasetSchema = serde_json::from_str(r#"{"bank": "BANK_NAME"}"#).unwrap();
        assert_eq!(schema.bank, "BANK_NAME");
        assert_eq!(schema.region, "REGION");
    }
}
