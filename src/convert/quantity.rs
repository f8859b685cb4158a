use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Whole number and fraction separated by spaces and/or hyphens: "1 1/2", "1-1/2"
    static ref MIXED_NUMBER: Regex = Regex::new(r"^([0-9]+)[\s-]+([0-9]+)/([0-9]+)$").unwrap();

    /// Bare fraction: "3/4"
    static ref SIMPLE_FRACTION: Regex = Regex::new(r"^([0-9]+)/([0-9]+)$").unwrap();
}

/// Build `whole + numerator / denominator` from digit strings.
/// A zero denominator is malformed input, not infinity.
pub fn fraction_value(whole: Option<&str>, numerator: &str, denominator: &str) -> Option<f64> {
    let whole: f64 = match whole {
        Some(w) => w.parse().ok()?,
        None => 0.0,
    };
    let numerator: f64 = numerator.parse().ok()?;
    let denominator: f64 = denominator.parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    let value = whole + numerator / denominator;
    value.is_finite().then_some(value)
}

/// Parse an imperial numeral: mixed number, simple fraction or (signed) decimal,
/// tried in that order.
///
/// `"1 1/2"` => 1.5, `"3/4"` => 0.75, `"-5"` => -5.0
pub fn parse_quantity(text: &str) -> Option<f64> {
    let text = text.trim();

    if let Some(caps) = MIXED_NUMBER.captures(text) {
        return fraction_value(Some(&caps[1]), &caps[2], &caps[3]);
    }

    if let Some(caps) = SIMPLE_FRACTION.captures(text) {
        return fraction_value(None, &caps[1], &caps[2]);
    }

    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_quantity("1 1/2"), Some(1.5));
        assert_eq!(parse_quantity("3/4"), Some(0.75));
        assert_eq!(parse_quantity("2"), Some(2.0));
        assert_eq!(parse_quantity("-5"), Some(-5.0));
        assert_eq!(parse_quantity("2.25"), Some(2.25));
    }

    #[test]
    fn test_mixed_number_separators() {
        assert_eq!(parse_quantity("1-1/2"), Some(1.5));
        assert_eq!(parse_quantity("2  - 1/4"), Some(2.25));
        assert_eq!(parse_quantity("3\u{a0}3/4"), Some(3.75));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("1/0"), None);
        assert_eq!(parse_quantity("1 1/0"), None);
        assert_eq!(parse_quantity("-1/2"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity("NaN"), None);
    }

    #[test]
    fn test_fraction_value() {
        assert_eq!(fraction_value(Some("1"), "1", "2"), Some(1.5));
        assert_eq!(fraction_value(None, "1", "8"), Some(0.125));
        assert_eq!(fraction_value(None, "1", "0"), None);
        assert_eq!(fraction_value(Some("x"), "1", "2"), None);
    }
}
