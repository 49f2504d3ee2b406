// src/utils/number.rs

//! Locale-tolerant number parsing.
//!
//! Game pages print numbers with `.` or `,` as thousands separator depending
//! on the server language (`1.234.567`, `1,234,567`). Integers are read by
//! dropping both separators.

/// Parse a locale-formatted integer, returning 0 for anything unreadable.
///
/// # Examples
/// ```
/// use ogextract::utils::number::parse_int;
///
/// assert_eq!(parse_int(" 1.234.567 "), 1_234_567);
/// assert_eq!(parse_int("7,200"), 7_200);
/// assert_eq!(parse_int("-42"), -42);
/// assert_eq!(parse_int("n/a"), 0);
/// ```
pub fn parse_int(raw: &str) -> i64 {
    try_parse_int(raw).unwrap_or(0)
}

/// Parse a locale-formatted integer.
pub fn try_parse_int(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '.' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Parse a plain integer (no separators), returning 0 when unreadable.
pub fn parse_i64(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Parse a decimal number written with `.` or `,` as decimal point.
pub fn parse_float(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', ".");
    cleaned.parse().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int("1.234"), 1234);
        assert_eq!(parse_int("1,234"), 1234);
        assert_eq!(parse_int("12 345"), 12345);
        assert_eq!(parse_int(""), 0);
        assert_eq!(try_parse_int("?"), None);
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.5"), 1.5);
        assert_eq!(parse_float("2,25"), 2.25);
        assert_eq!(parse_float("x"), 0.0);
    }
}
