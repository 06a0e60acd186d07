//! Permissive numeric input parsing
//!
//! Form fields arrive as free text. These helpers read them the way a
//! forgiving form does: the longest numeric prefix wins and anything
//! unreadable becomes zero. Calculators validate the parsed numbers
//! themselves.

/// Parse the longest leading decimal number in `text`, or `0.0`
///
/// Leading whitespace is skipped; `"12.5%"` reads as `12.5`, `"abc"` as
/// `0.0`. Thousands separators are accepted (`"1,000.50"` reads as
/// `1000.5`). `NaN` and infinities are never produced.
pub fn parse_lenient(text: &str) -> f64 {
    let cleaned: String = text.trim().chars().filter(|&c| c != ',').collect();

    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut last_valid = 0;
    let bytes = cleaned.as_bytes();

    while end < bytes.len() {
        let c = bytes[end] as char;
        match c {
            '+' | '-' if end == 0 => {}
            '+' | '-' if seen_exp && matches!(bytes[end - 1], b'e' | b'E') => {}
            '0'..='9' => {
                seen_digit = true;
                last_valid = end + 1;
            }
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => seen_exp = true,
            _ => break,
        }
        end += 1;
    }

    cleaned[..last_valid]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a field that may be left blank, falling back to `default`
pub fn parse_or(text: &str, default: f64) -> f64 {
    if text.trim().is_empty() {
        default
    } else {
        parse_lenient(text)
    }
}
