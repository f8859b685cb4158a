// WebAssembly bindings for the content script
use crate::config::Settings;
use crate::convert;
use crate::dom::{Dom, NodeKind};
use crate::overlay::{OverlayHost, OverlayManager, OverlayStyle};
use crate::scan::Scanner;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};

const TOGGLE_ACTION: &str = "toggleTooltips";

/// The live page DOM.
pub struct BrowserDom {
    body: Option<HtmlElement>,
}

impl BrowserDom {
    pub fn new(document: &web_sys::Document) -> Self {
        Self {
            body: document.body(),
        }
    }
}

impl Dom for BrowserDom {
    type Node = Node;

    fn kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::ELEMENT_NODE => NodeKind::Element,
            Node::TEXT_NODE => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn child_nodes(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn parent_element(&self, node: &Node) -> Option<Node> {
        node.parent_element().map(Node::from)
    }

    fn is_body(&self, node: &Node) -> bool {
        self.body
            .as_ref()
            .is_some_and(|body| node.is_same_node(Some(body.as_ref())))
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn get_attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn has_attribute(&self, node: &Node, name: &str) -> bool {
        node.dyn_ref::<Element>()
            .is_some_and(|el| el.has_attribute(name))
    }

    fn set_attribute(&mut self, node: &Node, name: &str, value: &str) {
        let Some(el) = node.dyn_ref::<Element>() else {
            return;
        };
        if let Err(e) = el.set_attribute(name, value) {
            tracing::warn!(attribute = name, "failed to set attribute");
            web_sys::console::warn_1(&e);
        }
    }
}

/// Renders overlays as absolutely positioned divs appended to <body>.
pub struct PageOverlays {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl OverlayHost for PageOverlays {
    type Target = HtmlElement;
    type Handle = Element;

    fn tooltip_targets(&self, settings: &Settings) -> Vec<(HtmlElement, String)> {
        let selector = format!(
            "[{}][{}]",
            settings.tooltip_attribute, settings.marker_attribute
        );
        let list = match self.document.query_selector_all(&selector) {
            Ok(list) => list,
            Err(e) => {
                web_sys::console::error_1(&e);
                return Vec::new();
            }
        };

        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .filter_map(|el| {
                let text = el.get_attribute(&settings.tooltip_attribute)?;
                Some((el, text))
            })
            .collect()
    }

    fn is_displayed(&self, target: &HtmlElement) -> bool {
        if target.offset_parent().is_none() {
            return false;
        }
        match self.window.get_computed_style(target) {
            Ok(Some(style)) => {
                let display = style.get_property_value("display").unwrap_or_default();
                let visibility = style.get_property_value("visibility").unwrap_or_default();
                display != "none" && visibility != "hidden"
            }
            _ => true,
        }
    }

    fn render(&mut self, target: &HtmlElement, text: &str, style: &OverlayStyle) -> Option<Element> {
        let body = self.document.body()?;
        let overlay: HtmlElement = self.document.create_element("div").ok()?.dyn_into().ok()?;
        overlay.set_text_content(Some(text));

        let rect = target.get_bounding_client_rect();
        let top = rect.top() + self.window.scroll_y().unwrap_or(0.0);
        let left = rect.left() + self.window.scroll_x().unwrap_or(0.0);

        // Nothing is attached until every style write succeeds
        let css = overlay.style();
        for (property, value) in style.placed_declarations(top, left) {
            css.set_property(property, &value).ok()?;
        }
        body.append_child(&overlay).ok()?;

        Some(overlay.into())
    }

    fn remove(&mut self, handle: Element) {
        handle.remove();
    }
}

/// Entry point for the extension's content script.
///
/// The JS glue calls `run_conversion` on load and from a MutationObserver,
/// forwards runtime messages to `handle_message`, and scroll/wheel events to
/// `on_user_scroll`.
#[wasm_bindgen]
pub struct ContentScript {
    scanner: Scanner,
    dom: BrowserDom,
    page: PageOverlays,
    overlays: OverlayManager<PageOverlays>,
}

#[wasm_bindgen]
impl ContentScript {
    /// `config_content` is an optional TOML settings string
    #[wasm_bindgen(constructor)]
    pub fn new(config_content: Option<String>) -> Result<ContentScript, JsValue> {
        let settings = match config_content {
            Some(content) => Settings::load_from_str(&content)
                .map_err(|e| JsValue::from_str(&format!("Failed to load config: {}", e)))?,
            None => Settings::default(),
        };

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("No document"))?;

        Ok(Self {
            scanner: Scanner::new(settings),
            dom: BrowserDom::new(&document),
            page: PageOverlays { window, document },
            overlays: OverlayManager::new(),
        })
    }

    /// Scan the whole body. Returns how many elements were annotated.
    #[wasm_bindgen]
    pub fn run_conversion(&mut self) -> usize {
        // <body> can be swapped out by the page, so look it up on every pass
        self.dom = BrowserDom::new(&self.page.document);
        let Some(body) = self.dom.body.clone() else {
            return 0;
        };
        let root: Node = body.into();
        self.scanner.run(&mut self.dom, &root).annotations.len()
    }

    /// Handle a runtime message; returns true if it was recognized.
    #[wasm_bindgen]
    pub fn handle_message(&mut self, message: JsValue) -> bool {
        let action = js_sys::Reflect::get(&message, &JsValue::from_str("action"))
            .ok()
            .and_then(|v| v.as_string());
        if action.as_deref() == Some(TOGGLE_ACTION) {
            self.toggle_tooltips();
            true
        } else {
            false
        }
    }

    #[wasm_bindgen]
    pub fn toggle_tooltips(&mut self) -> bool {
        self.overlays
            .toggle(&mut self.page, self.scanner.settings())
    }

    #[wasm_bindgen]
    pub fn show_tooltips(&mut self) -> usize {
        self.overlays.show(&mut self.page, self.scanner.settings())
    }

    #[wasm_bindgen]
    pub fn hide_tooltips(&mut self) {
        self.overlays.hide(&mut self.page);
    }

    #[wasm_bindgen]
    pub fn tooltips_visible(&self) -> bool {
        self.overlays.is_visible()
    }

    /// Overlays are positioned once, so any user scroll takes them down.
    #[wasm_bindgen]
    pub fn on_user_scroll(&mut self) {
        if self.overlays.is_visible() {
            self.overlays.hide(&mut self.page);
        }
    }
}

/// Convert every measurement in a string, e.g. "2 in" => "2 in = 50.80 mm"
#[wasm_bindgen]
pub fn convert_inline_text(text: &str) -> String {
    convert::convert_inline_text(text)
}

#[wasm_bindgen]
pub fn parse_quantity(text: &str) -> Option<f64> {
    convert::parse_quantity(text)
}

/// Convert a quantity given a unit symbol; undefined for unknown symbols
#[wasm_bindgen]
pub fn convert_unit(symbol: &str, quantity: f64) -> Option<String> {
    convert::convert(symbol, quantity)
}
