//! Tokenization and fail-safe number parsing shared by both layout parsers.
//!
//! Numeric cells in the reports are human-authored and frequently garbled by
//! text extraction, so the legacy parser never lets one bad cell drop a row:
//! it substitutes zero instead.

/// Split a line on runs of whitespace.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Collapse internal whitespace runs to single spaces and trim the ends.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for a non-empty string made only of ASCII digits.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an unsigned integer, falling back to 0.
pub fn parse_int_safe(s: &str) -> u32 {
    s.trim().parse().unwrap_or(0)
}

/// Parse a float, falling back to 0.0. Non-finite values also become 0.0.
pub fn parse_float_safe(s: &str) -> f64 {
    parse_float_opt(s).unwrap_or(0.0)
}

/// Parse a float, keeping "unparsable" distinguishable from zero.
pub fn parse_float_opt(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed_whitespace() {
        assert_eq!(
            tokenize("  GI\t0.8   4 4 "),
            vec!["GI", "0.8", "4", "4"]
        );
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  Material    Data "), "Material Data");
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("12"));
        assert!(!is_digits(""));
        assert!(!is_digits("1a"));
        assert!(!is_digits("-1"));
        assert!(!is_digits("1.0"));
    }

    #[test]
    fn test_parse_int_safe() {
        assert_eq!(parse_int_safe("22"), 22);
        assert_eq!(parse_int_safe(" 7 "), 7);
        assert_eq!(parse_int_safe("n/a"), 0);
        assert_eq!(parse_int_safe("-3"), 0);
        assert_eq!(parse_int_safe("4.5"), 0);
    }

    #[test]
    fn test_parse_float_safe() {
        assert_eq!(parse_float_safe("35.4"), 35.4);
        assert_eq!(parse_float_safe("4"), 4.0);
        assert_eq!(parse_float_safe("abc"), 0.0);
        assert_eq!(parse_float_safe("NaN"), 0.0);
        assert_eq!(parse_float_safe("inf"), 0.0);
    }

    #[test]
    fn test_parse_float_opt() {
        assert_eq!(parse_float_opt("1250"), Some(1250.0));
        assert_eq!(parse_float_opt(""), None);
    }
}
