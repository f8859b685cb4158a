use crate::config::Settings;
use crate::convert::inline::convert_inline_text;
use crate::dom::Dom;
use crate::handlers::guard::{is_converted, mark_converted};
use crate::handlers::{Annotation, MatcherKind};

/// Convert measurements inside one text node and hang the full converted text
/// on its parent element, e.g. `<span>2 in</span>` gets `title="2 in = 50.80 mm"`.
///
/// Nothing happens when the text holds no measurement, or when the parent is
/// already converted or sits directly under <body>.
pub fn annotate_text_node<D: Dom>(
    dom: &mut D,
    node: &D::Node,
    settings: &Settings,
) -> Option<Annotation<D::Node>> {
    if !dom.is_text(node) {
        return None;
    }
    let parent = dom.parent_element(node)?;
    if is_converted(dom, &parent, settings) {
        tracing::trace!("skipping text under converted element");
        return None;
    }

    let original = dom.text_content(node);
    let converted = convert_inline_text(&original);
    if converted == original {
        return None;
    }

    mark_converted(dom, &parent, &converted, settings);
    tracing::debug!(tooltip = %converted, "annotated text parent");

    Some(Annotation {
        element: parent,
        matcher: MatcherKind::Inline,
        tooltip: converted,
    })
}
