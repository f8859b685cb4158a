// The slice of a DOM the matchers need. Implemented natively by `Document`
// and in the browser over web-sys nodes (see wasm.rs).

#[cfg(not(target_arch = "wasm32"))]
pub mod document;

#[cfg(not(target_arch = "wasm32"))]
pub use document::{Document, NodeData, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    /// Comments, doctypes, the document node itself
    Other,
}

pub trait Dom {
    type Node: Clone;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    /// All child nodes, including whitespace text and comments
    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    /// True if `node` is the document's <body>
    fn is_body(&self, node: &Self::Node) -> bool;

    /// Concatenated text of the node and all its descendants
    fn text_content(&self, node: &Self::Node) -> String;

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.get_attribute(node, name).is_some()
    }

    /// Only meaningful on elements; implementations ignore other node kinds.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn is_element(&self, node: &Self::Node) -> bool {
        self.kind(node) == NodeKind::Element
    }

    fn is_text(&self, node: &Self::Node) -> bool {
        self.kind(node) == NodeKind::Text
    }
}

/// `root` and everything below it in document order.
pub fn descendants<D: Dom>(dom: &D, root: &D::Node) -> Vec<D::Node> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let children = dom.child_nodes(&node);
        out.push(node);
        stack.extend(children.into_iter().rev());
    }
    out
}
