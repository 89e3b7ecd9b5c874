//! Cell text helpers shared by the readers.

/// Formats a floating-point number as a string without trailing zeros.
///
/// Spreadsheets store integers such as patient ages as floats; they must print
/// as `65`, not `65.0`.
///
/// # Examples
///
/// ```
/// use gnb_model::format_numeric;
///
/// assert_eq!(format_numeric(65.0), "65");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{}", v as i64);
    }
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Trims a raw cell and maps blank text to an absent value.
pub fn clean_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
