/// Imperial units the converter recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Inch,
    Foot,
    Pound,
    Fahrenheit,
}

/// Symbol table in declaration order. Each symbol maps to exactly one unit.
pub const UNIT_SYMBOLS: [(&str, Unit); 8] = [
    ("in", Unit::Inch),
    ("\"", Unit::Inch),
    ("″", Unit::Inch),
    ("ft", Unit::Foot),
    ("'", Unit::Foot),
    ("′", Unit::Foot),
    ("lb", Unit::Pound),
    ("°F", Unit::Fahrenheit),
];

impl Unit {
    pub fn to_metric(self, quantity: f64) -> f64 {
        match self {
            Unit::Inch => quantity * 25.4,
            Unit::Foot => quantity * 0.3048,
            Unit::Pound => quantity * 0.453592,
            Unit::Fahrenheit => (quantity - 32.0) * 5.0 / 9.0,
        }
    }

    pub fn metric_symbol(self) -> &'static str {
        match self {
            Unit::Inch => "mm",
            Unit::Foot => "m",
            Unit::Pound => "kg",
            Unit::Fahrenheit => "°C",
        }
    }

    /// Fixed number of decimals in the formatted output
    pub fn decimals(self) -> usize {
        match self {
            Unit::Fahrenheit => 1,
            _ => 2,
        }
    }

    /// Convert and format, e.g. `Unit::Inch.format(1.0) == "25.40 mm"`.
    pub fn format(self, quantity: f64) -> String {
        // + 0.0 folds a negative zero so "-0 in" prints "0.00 mm"
        let value = self.to_metric(quantity) + 0.0;
        format!("{:.*} {}", self.decimals(), value, self.metric_symbol())
    }
}

/// Exact symbol lookup.
pub fn lookup(symbol: &str) -> Option<Unit> {
    UNIT_SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, unit)| *unit)
}

/// Case-insensitive symbol lookup, used by the inline matcher.
pub fn lookup_ignore_case(symbol: &str) -> Option<Unit> {
    lookup(symbol).or_else(|| {
        let lowered = symbol.to_lowercase();
        UNIT_SYMBOLS
            .iter()
            .find(|(s, _)| s.to_lowercase() == lowered)
            .map(|(_, unit)| *unit)
    })
}

/// Convert `quantity` given in the unit named by `symbol`.
/// Returns None when the symbol is not in the table.
pub fn convert(symbol: &str, quantity: f64) -> Option<String> {
    lookup(symbol).map(|unit| unit.format(quantity))
}

/// All symbols, in table order.
pub fn symbols() -> impl Iterator<Item = &'static str> {
    UNIT_SYMBOLS.iter().map(|(s, _)| *s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_fixed_decimals() {
        assert_eq!(convert("in", 1.0).as_deref(), Some("25.40 mm"));
        assert_eq!(convert("ft", 2.0).as_deref(), Some("0.61 m"));
        assert_eq!(convert("lb", 3.0).as_deref(), Some("1.36 kg"));
        assert_eq!(convert("°F", 32.0).as_deref(), Some("0.0 °C"));
        assert_eq!(convert("°F", -5.0).as_deref(), Some("-20.6 °C"));
    }

    #[test]
    fn test_symbol_aliases() {
        assert_eq!(convert("\"", 1.5).as_deref(), Some("38.10 mm"));
        assert_eq!(convert("″", 5.0).as_deref(), Some("127.00 mm"));
        assert_eq!(convert("'", 6.0).as_deref(), Some("1.83 m"));
        assert_eq!(convert("′", 6.0).as_deref(), Some("1.83 m"));
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(convert("mm", 1.0), None);
        assert_eq!(convert("IN", 1.0), None);
        assert_eq!(convert("", 1.0), None);
    }

    #[test]
    fn test_negative_zero_is_folded() {
        assert_eq!(convert("in", -0.0).as_deref(), Some("0.00 mm"));
        assert_eq!(convert("ft", 0.0).as_deref(), Some("0.00 m"));
    }

    #[test]
    fn test_lookup_ignore_case() {
        assert_eq!(lookup_ignore_case("IN"), Some(Unit::Inch));
        assert_eq!(lookup_ignore_case("Ft"), Some(Unit::Foot));
        assert_eq!(lookup_ignore_case("°f"), Some(Unit::Fahrenheit));
        assert_eq!(lookup_ignore_case("kg"), None);
    }

    #[test]
    fn test_every_symbol_maps_once() {
        let all: Vec<&str> = symbols().collect();
        assert_eq!(all.len(), 8);
        for s in &all {
            assert_eq!(all.iter().filter(|other| *other == s).count(), 1);
        }
    }
}
