use crate::convert::quantity::parse_quantity;
use crate::convert::units::{lookup_ignore_case, Unit, UNIT_SYMBOLS};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Numeral, optional whitespace, unit symbol. Symbols are tried longest first so
    /// the alternation never depends on table order when one symbol prefixes another.
    static ref INLINE_PATTERN: Regex = {
        let mut symbols: Vec<&str> = UNIT_SYMBOLS.iter().map(|(s, _)| *s).collect();
        symbols.sort_by_key(|s| std::cmp::Reverse(s.chars().count()));
        let units = symbols
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(
            r"(?i)((?:[0-9]+[-\s])?[0-9]+/[0-9]+|-?[0-9]+(?:\.[0-9]+)?)\s*({})",
            units
        ))
        .unwrap()
    };
}

/// A measurement found inside a single run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineMeasurement {
    /// Byte range of the matched numeral + symbol (plus a plural "s") in the source text
    pub start: usize,
    pub end: usize,
    pub numeral: String,
    pub symbol: String,
    pub unit: Unit,
    pub quantity: f64,
    /// Formatted metric value, e.g. "50.80 mm"
    pub converted: String,
}

impl InlineMeasurement {
    pub fn matched<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

// Bytes to extend a match by after an alphabetic symbol: 1 for a plural "s"
// ("500 lbs."), None when the symbol runs into a word ("2 inches").
fn symbol_suffix(symbol: &str, rest: &str) -> Option<usize> {
    if !symbol.chars().last().is_some_and(char::is_alphabetic) {
        return Some(0);
    }
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&'s') => {
            (!chars.next().is_some_and(char::is_alphabetic)).then_some(1)
        }
        Some(c) if c.is_alphabetic() => None,
        _ => Some(0),
    }
}

/// Find every convertible measurement in `text`, left to right, non-overlapping.
/// Matches with an unknown symbol or an unparseable numeral are skipped.
pub fn find_measurements(text: &str) -> Vec<InlineMeasurement> {
    let mut found = Vec::new();

    for caps in INLINE_PATTERN.captures_iter(text) {
        let (Some(whole), Some(numeral), Some(symbol)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        let Some(suffix) = symbol_suffix(symbol.as_str(), &text[whole.end()..]) else {
            continue;
        };

        let Some(unit) = lookup_ignore_case(symbol.as_str()) else {
            continue;
        };
        let Some(quantity) = parse_quantity(numeral.as_str()) else {
            continue;
        };

        found.push(InlineMeasurement {
            start: whole.start(),
            end: whole.end() + suffix,
            numeral: numeral.as_str().to_string(),
            symbol: symbol.as_str().to_string(),
            unit,
            quantity,
            converted: unit.format(quantity),
        });
    }

    found
}

/// Append `" = <metric>"` after every measurement in `text`, leaving everything else as-is.
///
/// `"2 in and 3 ft"` => `"2 in = 50.80 mm and 3 ft = 0.91 m"`
pub fn convert_inline_text(text: &str) -> String {
    let measurements = find_measurements(text);
    if measurements.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + measurements.len() * 16);
    let mut last = 0;
    for m in &measurements {
        out.push_str(&text[last..m.end]);
        out.push_str(" = ");
        out.push_str(&m.converted);
        last = m.end;
    }
    out.push_str(&text[last..]);
    out
}
