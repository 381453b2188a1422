//! Lenient numeric extraction from free-text dataset fields.
//!
//! Upstream values look like `"~63%"`, `"₹1,20,000"` or `"18-20 quintals"`.
//! Extraction takes the first decimal number found and never fails: text
//! without a digit yields `0.0`.

use std::sync::LazyLock;

use regex::Regex;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").expect("number pattern is valid"));

/// Extract a percentage such as `"~63%"` → `63.0`.
pub fn extract_percentage(text: &str) -> f64 {
    first_number(text)
}

/// Extract a numeric amount after stripping thousands separators, so both
/// `"₹1,20,000"` and `"₹120,000"` yield `120000.0`.
pub fn extract_numeric_value(text: &str) -> f64 {
    first_number(&text.replace(',', ""))
}

fn first_number(text: &str) -> f64 {
    FIRST_NUMBER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Render a rupee amount with thousands separators, or `"N/A"` when the
/// amount is zero or negative.
pub fn format_rupees(amount: f64) -> String {
    if amount > 0.0 {
        format!("₹{}", format_number(amount as u64))
    } else {
        "N/A".to_string()
    }
}

/// Group digits in threes: `1234567` → `"1,234,567"`.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    let chars: Vec<char> = s.chars().rev().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }
    result.chars().rev().collect()
}

/// Keep at most `max` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_with_symbols() {
        assert_eq!(extract_percentage("~63%"), 63.0);
        assert_eq!(extract_percentage("63"), 63.0);
        assert_eq!(extract_percentage("about 42.5 %"), 42.5);
    }

    #[test]
    fn test_percentage_defaults_to_zero() {
        assert_eq!(extract_percentage(""), 0.0);
        assert_eq!(extract_percentage("unknown"), 0.0);
    }

    #[test]
    fn test_percentage_takes_first_number() {
        assert_eq!(extract_percentage("40-60%"), 40.0);
    }

    #[test]
    fn test_numeric_value_strips_commas() {
        assert_eq!(extract_numeric_value("₹1,20,000"), 120000.0);
        assert_eq!(extract_numeric_value("₹45,000 per acre"), 45000.0);
        assert_eq!(extract_numeric_value("n/a"), 0.0);
    }

    #[test]
    fn test_format_number_comma() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(120000.0), "₹120,000");
        assert_eq!(format_rupees(999.9), "₹999");
        assert_eq!(format_rupees(0.0), "N/A");
    }

    #[test]
    fn test_truncate_chars_is_char_safe() {
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
