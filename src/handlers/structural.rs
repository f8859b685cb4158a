use crate::config::Settings;
use crate::convert::units::{lookup, Unit};
use crate::dom::{Dom, NodeKind};
use crate::handlers::guard::{is_converted, mark_converted};
use crate::handlers::{Annotation, MatcherKind};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// `1/2" (12.70 mm)`: fraction, quote mark, a parenthesized metric note
    static ref FRACTION_WITH_NOTE: Regex =
        Regex::new(r#"^([0-9]+)/([0-9]+)(['"″])\s+\(.*?mm\)$"#).unwrap();

    /// `1 1/2"` at the start of a text, anything may follow
    static ref MIXED_PREFIX: Regex = Regex::new(r#"^([0-9]+)\s+([0-9]+)/([0-9]+)(['"″])"#).unwrap();

    static ref WHOLE_NUMBER: Regex = Regex::new(r"^[0-9]+$").unwrap();

    static ref BARE_FRACTION: Regex = Regex::new(r"^([0-9]+)/([0-9]+)$").unwrap();
}

const INCH_MARK: &str = "\"";

/// The ways page markup splits one fraction measurement across sibling nodes.
/// Tried in declaration order; the first to match marks the element and blocks the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructuralMatcher {
    /// `<span>1 <span>1/2" (38.10 mm)</span></span>`
    ParentMixedSpan,
    /// `<span>1 1/2"</span>`
    ParentMixedText,
    /// `<span><span>1/2</span> <span>"</span></span>`
    SplitFractionQuote,
    /// `<span>1 <span>1/2</span> "</span>`
    SplitNumberFractionQuote,
}

/// A whole/fraction/unit triple read off the markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub whole: Option<u64>,
    pub numerator: u64,
    pub denominator: u64,
    pub symbol: String,
    pub unit: Unit,
}

impl Measurement {
    /// None for unknown symbols, oversized numbers and zero denominators.
    pub fn new(
        whole: Option<&str>,
        numerator: &str,
        denominator: &str,
        symbol: &str,
    ) -> Option<Self> {
        let whole: Option<u64> = match whole {
            Some(w) => Some(w.parse().ok()?),
            None => None,
        };
        let numerator: u64 = numerator.parse().ok()?;
        let denominator: u64 = denominator.parse().ok()?;
        if denominator == 0 {
            return None;
        }
        Some(Self {
            whole,
            numerator,
            denominator,
            symbol: symbol.to_string(),
            unit: lookup(symbol)?,
        })
    }

    pub fn quantity(&self) -> f64 {
        self.whole.unwrap_or(0) as f64 + self.numerator as f64 / self.denominator as f64
    }

    /// `1 1/2" = 38.10 mm`
    pub fn tooltip(&self) -> String {
        format!("{} = {}", self, self.unit.format(self.quantity()))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(whole) = self.whole {
            write!(f, "{} ", whole)?;
        }
        write!(f, "{}/{}{}", self.numerator, self.denominator, self.symbol)
    }
}

impl StructuralMatcher {
    pub const ALL: [StructuralMatcher; 4] = [
        StructuralMatcher::ParentMixedSpan,
        StructuralMatcher::ParentMixedText,
        StructuralMatcher::SplitFractionQuote,
        StructuralMatcher::SplitNumberFractionQuote,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StructuralMatcher::ParentMixedSpan => "parent-mixed-span",
            StructuralMatcher::ParentMixedText => "parent-mixed-text",
            StructuralMatcher::SplitFractionQuote => "split-fraction-quote",
            StructuralMatcher::SplitNumberFractionQuote => "split-number-fraction-quote",
        }
    }

    /// Recognize this shape on `el` without touching the DOM.
    pub fn recognize<D: Dom>(self, dom: &D, el: &D::Node) -> Option<Measurement> {
        if !dom.is_element(el) {
            return None;
        }
        match self {
            StructuralMatcher::ParentMixedSpan => parent_mixed_span(dom, el),
            StructuralMatcher::ParentMixedText => parent_mixed_text(dom, el),
            StructuralMatcher::SplitFractionQuote => split_fraction_quote(dom, el),
            StructuralMatcher::SplitNumberFractionQuote => split_number_fraction_quote(dom, el),
        }
    }

    /// Guard, recognize, then write the tooltip and marker on a match.
    pub fn apply<D: Dom>(
        self,
        dom: &mut D,
        el: &D::Node,
        settings: &Settings,
    ) -> Option<Annotation<D::Node>> {
        if !dom.is_element(el) {
            return None;
        }
        if is_converted(dom, el, settings) {
            tracing::trace!(matcher = self.name(), "skipping converted element");
            return None;
        }

        let measurement = self.recognize(dom, el)?;
        let tooltip = measurement.tooltip();
        mark_converted(dom, el, &tooltip, settings);
        tracing::debug!(matcher = self.name(), tooltip = %tooltip, "annotated element");

        Some(Annotation {
            element: el.clone(),
            matcher: MatcherKind::Structural(self),
            tooltip,
        })
    }
}

impl fmt::Display for StructuralMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn trimmed_text<D: Dom>(dom: &D, node: &D::Node) -> String {
    dom.text_content(node).trim().to_string()
}

// Text of an element whose only child is a text node
fn single_text_child<D: Dom>(dom: &D, el: &D::Node) -> Option<String> {
    if !dom.is_element(el) {
        return None;
    }
    match dom.child_nodes(el).as_slice() {
        [only] if dom.is_text(only) => Some(trimmed_text(dom, only)),
        _ => None,
    }
}

// Descend through single-child elements down to a text node
fn unwrap_single_text<D: Dom>(dom: &D, node: &D::Node) -> Option<String> {
    match dom.kind(node) {
        NodeKind::Text => Some(trimmed_text(dom, node)),
        NodeKind::Element => match dom.child_nodes(node).as_slice() {
            [only] => unwrap_single_text(dom, only),
            _ => None,
        },
        NodeKind::Other => None,
    }
}

fn parent_mixed_span<D: Dom>(dom: &D, el: &D::Node) -> Option<Measurement> {
    let children = dom.child_nodes(el);
    let [first, second] = children.as_slice() else {
        return None;
    };
    if !dom.is_text(first) {
        return None;
    }
    let note = single_text_child(dom, second)?;

    let whole = trimmed_text(dom, first);
    if !WHOLE_NUMBER.is_match(&whole) {
        return None;
    }
    let caps = FRACTION_WITH_NOTE.captures(&note)?;
    Measurement::new(Some(whole.as_str()), &caps[1], &caps[2], &caps[3])
}

fn parent_mixed_text<D: Dom>(dom: &D, el: &D::Node) -> Option<Measurement> {
    let text = trimmed_text(dom, el);
    let caps = MIXED_PREFIX.captures(&text)?;
    Measurement::new(Some(&caps[1]), &caps[2], &caps[3], &caps[4])
}

fn split_fraction_quote<D: Dom>(dom: &D, el: &D::Node) -> Option<Measurement> {
    let children: Vec<D::Node> = dom
        .child_nodes(el)
        .into_iter()
        .filter(|c| !(dom.is_text(c) && dom.text_content(c).trim().is_empty()))
        .collect();
    let [first, second] = children.as_slice() else {
        return None;
    };

    let fraction = unwrap_single_text(dom, first)?;
    let rest = match dom.kind(second) {
        NodeKind::Text => trimmed_text(dom, second),
        NodeKind::Element => single_text_child(dom, second)?,
        NodeKind::Other => return None,
    };

    let caps = BARE_FRACTION.captures(&fraction)?;
    if !rest.starts_with(INCH_MARK) {
        return None;
    }
    Measurement::new(None, &caps[1], &caps[2], INCH_MARK)
}

fn split_number_fraction_quote<D: Dom>(dom: &D, el: &D::Node) -> Option<Measurement> {
    let children = dom.child_nodes(el);
    let [first, middle, last] = children.as_slice() else {
        return None;
    };
    if !dom.is_text(first) || !dom.is_text(last) {
        return None;
    }

    let whole = trimmed_text(dom, first);
    let fraction = single_text_child(dom, middle)?;
    if !WHOLE_NUMBER.is_match(&whole) || !trimmed_text(dom, last).starts_with(INCH_MARK) {
        return None;
    }
    let caps = BARE_FRACTION.captures(&fraction)?;
    Measurement::new(Some(whole.as_str()), &caps[1], &caps[2], INCH_MARK)
}
