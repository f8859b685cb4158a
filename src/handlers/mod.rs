// Matchers that recognize measurements in the DOM and annotate elements with tooltips

pub mod guard;
pub mod inline;
pub mod structural;


pub use guard::{is_converted, mark_converted};
pub use inline::annotate_text_node;
pub use structural::{Measurement, StructuralMatcher};

use serde::{Serialize, Serializer};
use std::fmt;

/// Which matcher produced an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Inline,
    Structural(StructuralMatcher),
}

impl fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatcherKind::Inline => f.write_str("inline"),
            MatcherKind::Structural(m) => write!(f, "{}", m),
        }
    }
}

impl Serialize for MatcherKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One successful match: the element that received the tooltip and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation<N> {
    pub element: N,
    pub matcher: MatcherKind,
    pub tooltip: String,
}
