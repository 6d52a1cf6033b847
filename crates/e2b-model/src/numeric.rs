//! Numeric coercion of reported values.

/// Parse a reported number.
///
/// Surrounding whitespace is ignored. Empty input and non-finite values
/// (`NaN`, `inf`) are not numbers.
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
