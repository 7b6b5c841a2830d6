//! FILENAME: app/src/config.rs
// PURPOSE: Loads the comparison configuration from an optional JSON file.

use std::fs;
use std::path::Path;
use comparison_engine::ComparisonConfig;
use crate::error::AppError;

/// Reads `path` as JSON; no path means the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<ComparisonConfig, AppError> {
    let Some(path) = path else {
        return Ok(ComparisonConfig::default());
    };

    let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&text).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    crate::log_debug!("CONFIG", "loaded {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_file_means_defaults() {
        assert_eq!(load_config(None).unwrap(), ComparisonConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"with_sheet": "ALL TXN", "schema": {"value": "AMOUNT"}}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.with_sheet, "ALL TXN");
        assert_eq!(config.without_sheet, "WITHOUT 6010");
        assert_eq!(config.schema.value, "AMOUNT");
        assert_eq!(config.schema.volume, "VOLUME");
    }

    #[test]
    fn malformed_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::ConfigParse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
