//! FILENAME: core/engine/src/label.rs
//! PURPOSE: Label Resolver - derives a short display label for a period.

use std::path::Path;

pub const PREVIOUS_FALLBACK: &str = "PREVIOUS_WEEK";
pub const CURRENT_FALLBACK: &str = "CURRENT_WEEK";

/// Derives a period label from its source identifier.
///
/// Takes the base file name, keeps the first whitespace-delimited token and
/// uppercases it: `"uploads/week_4 export.xlsx"` becomes `"WEEK_4"`.
/// Returns `fallback` when there is no identifier or no token.
pub fn resolve_label(source_identifier: Option<&str>, fallback: &str) -> String {
    let Some(identifier) = source_identifier else {
        return fallback.to_string();
    };

    let base = Path::new(identifier)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(identifier);

    match base.split_whitespace().next() {
        Some(token) if !token.is_empty() => token.to_uppercase(),
        _ => fallback.to_string(),
    }
}
