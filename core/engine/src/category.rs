//! FILENAME: core/engine/src/category.rs
//! PURPOSE: Category Mapper - translates short categorical codes to display names.
//! CONTEXT: Applied to a dimension value before grouping, so codes and full
//! names never end up as separate keys in one result. Missing values become
//! the unknown label first; unmapped codes pass through unchanged.

use std::collections::{BTreeMap, HashMap};

/// Label substituted for missing categorical values.
pub const UNKNOWN_CATEGORY: &str = "UNKNOWN";

/// Two-letter state codes and their display names.
const STATE_NAMES: &[(&str, &str)] = &[
    ("AB", "Abia"), ("AD", "Adamawa"), ("AK", "Akwa Ibom"), ("AN", "Anambra"),
    ("BA", "Bauchi"), ("BY", "Bayelsa"), ("BE", "Benue"), ("BO", "Borno"),
    ("CR", "Cross River"), ("DE", "Delta"), ("EB", "Ebonyi"), ("ED", "Edo"),
    ("EK", "Ekiti"), ("EN", "Enugu"), ("FC", "FCT - Abuja"), ("GO", "Gombe"),
    ("IM", "Imo"), ("JI", "Jigawa"), ("KD", "Kaduna"), ("KN", "Kano"),
    ("KT", "Katsina"), ("KE", "Kebbi"), ("KO", "Kogi"), ("KW", "Kwara"),
    ("LA", "Lagos"), ("NA", "Nasarawa"), ("NI", "Niger"), ("OG", "Ogun"),
    ("ON", "Ondo"), ("OS", "Osun"), ("OY", "Oyo"), ("PL", "Plateau"),
    ("RI", "Rivers"), ("SO", "Sokoto"), ("TA", "Taraba"), ("YO", "Yobe"),
    ("ZA", "Zamfara"),
];

/// A fixed code -> display name table.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    names: HashMap<String, String>,
}

impl CategoryMap {
    pub fn new() -> Self {
        CategoryMap { names: HashMap::new() }
    }

    /// The state-code table used for the STATE dimension.
    pub fn states() -> Self {
        let mut map = CategoryMap::new();
        for (code, name) in STATE_NAMES {
            map.insert(*code, *name);
        }
        map
    }

    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.names.insert(code.into(), name.into());
    }

    /// Merges extra entries over the table; later entries win.
    pub fn extend_from(&mut self, overrides: &BTreeMap<String, String>) {
        for (code, name) in overrides {
            self.insert(code.clone(), name.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Looks `raw_code` up; unmapped codes are returned unchanged.
    pub fn map_category(&self, raw_code: &str) -> String {
        self.names
            .get(raw_code)
            .cloned()
            .unwrap_or_else(|| raw_code.to_string())
    }
}

/// Replaces a missing value with `unknown`, leaving present values as they are.
pub fn fill_missing(value: Option<String>, unknown: &str) -> String {
    value.unwrap_or_else(|| unknown.to_string())
}
