//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Rounding and display formatting for comparison figures.
//! CONTEXT: The engine keeps numbers typed; these helpers are used when a
//! table is rendered as text or when rounding rules must be applied.

/// Rounds to `decimal_places` with ties going to the even neighbour.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places as i32);
    (value * factor).round_ties_even() / factor
}

/// Rounds a summed measure to whole units (ties to even).
pub fn to_whole_units(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Formats an integer with thousands separators: `-1234567` -> `"-1,234,567"`.
pub fn format_integer(value: i64) -> String {
    add_thousands_separator(&value.to_string())
}

/// Format a number with specified decimal places and optional thousands separator.
pub fn format_decimal(value: f64, decimal_places: u8, use_thousands_separator: bool) -> String {
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);

    if use_thousands_separator {
        add_thousands_separator(&rounded)
    } else {
        rounded
    }
}

/// Formats a value already expressed in percentage points: `12.5` -> `"12.50%"`.
pub fn format_percent_points(value: f64) -> String {
    // Avoid rendering "-0.00%"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}%", format_decimal(value, 2, false))
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let parts: Vec<&str> = s.split('.').collect();
    let integer_part = parts[0];
    let decimal_part = parts.get(1);

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result = format!("-{}", result);
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}
