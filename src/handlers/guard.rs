use crate::config::Settings;
use crate::dom::Dom;

/// True if `el` must not be examined again: it already carries the marker, or
/// it sits directly under <body>.
///
/// Only the immediate container is checked unless `guard_ancestors` is set, so a
/// nested element under a converted one can still be annotated by default.
pub fn is_converted<D: Dom>(dom: &D, el: &D::Node, settings: &Settings) -> bool {
    if dom.has_attribute(el, &settings.marker_attribute) {
        return true;
    }

    let parent = dom.parent_element(el);
    if settings.skip_body_children && parent.as_ref().is_some_and(|p| dom.is_body(p)) {
        return true;
    }

    if settings.guard_ancestors {
        let mut current = parent;
        while let Some(ancestor) = current {
            if dom.has_attribute(&ancestor, &settings.marker_attribute) {
                return true;
            }
            current = dom.parent_element(&ancestor);
        }
    }

    false
}

/// Attach the tooltip and flag the element. Both writes happen only after a full match.
pub fn mark_converted<D: Dom>(dom: &mut D, el: &D::Node, tooltip: &str, settings: &Settings) {
    dom.set_attribute(el, &settings.tooltip_attribute, tooltip);
    dom.set_attribute(el, &settings.marker_attribute, "");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_marker_blocks() {
        let mut doc = Document::parse_fragment("<span>2 in</span>");
        let span = doc.first_element().unwrap();
        let settings = Settings::default();
        assert!(!is_converted(&doc, &span, &settings));

        mark_converted(&mut doc, &span, "2 in = 50.80 mm", &settings);
        assert!(is_converted(&doc, &span, &settings));
        assert_eq!(
            doc.get_attribute(&span, "title").as_deref(),
            Some("2 in = 50.80 mm")
        );
        assert_eq!(
            doc.get_attribute(&span, "data-metric-converted").as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_body_child_blocks() {
        let doc = Document::parse("<body><span>2 in</span><div><b>3 ft</b></div></body>");
        let settings = Settings::default();
        let span = doc.find_element("span").unwrap();
        let b = doc.find_element("b").unwrap();
        assert!(is_converted(&doc, &span, &settings));
        assert!(!is_converted(&doc, &b, &settings));

        let permissive = Settings {
            skip_body_children: false,
            ..Settings::default()
        };
        assert!(!is_converted(&doc, &span, &permissive));
    }

    #[test]
    fn test_ancestor_guard_is_opt_in() {
        let mut doc = Document::parse_fragment("<div><p><span>1/2</span></p></div>");
        let settings = Settings::default();
        let div = doc.first_element().unwrap();
        let span = doc.find_element("span").unwrap();
        mark_converted(&mut doc, &div, "x", &settings);

        // grandparent marked, immediate container not
        assert!(!is_converted(&doc, &span, &settings));

        let strict = Settings {
            guard_ancestors: true,
            ..Settings::default()
        };
        assert!(is_converted(&doc, &span, &strict));
    }
}
