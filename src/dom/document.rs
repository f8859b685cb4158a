use crate::dom::{Dom, NodeKind};
use scraper::Html;
use std::collections::HashMap;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Doctype(String),
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Mutable arena DOM for running the matchers outside a browser.
///
/// Built from HTML parsed by scraper (html5ever), so the tree has the same
/// shape a browser would produce: implied <html>/<head>/<body>, whitespace text
/// nodes between elements, decoded entities.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    // Node whose children are the serialized content
    content_root: NodeId,
    body: Option<NodeId>,
}

impl Document {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        let mut doc = Self::from_html(&Html::parse_document(html));
        doc.body = doc
            .child_elements(doc.root())
            .into_iter()
            .find(|id| doc.tag_name(*id) == Some("html"))
            .and_then(|html| {
                doc.child_elements(html)
                    .into_iter()
                    .find(|id| doc.tag_name(*id) == Some("body"))
            });
        doc
    }

    /// Parse an HTML fragment. The content sits in a wrapper element that is not
    /// <body>, the way a <template> holds its content.
    pub fn parse_fragment(html: &str) -> Self {
        let mut doc = Self::from_html(&Html::parse_fragment(html));
        if let Some(wrapper) = doc.child_elements(doc.root()).into_iter().next() {
            doc.content_root = wrapper;
        }
        doc
    }

    fn from_html(html: &Html) -> Self {
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            content_root: NodeId(0),
            body: None,
        };

        let tree_root = html.tree.root();
        let mut ids = HashMap::new();
        ids.insert(tree_root.id(), doc.root());

        for node in tree_root.descendants().skip(1) {
            let Some(parent) = node.parent().and_then(|p| ids.get(&p.id()).copied()) else {
                continue;
            };
            let data = match node.value() {
                scraper::Node::Element(el) => NodeData::Element {
                    name: el.name().to_string(),
                    attrs: el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                },
                scraper::Node::Text(text) => {
                    let text: &str = text;
                    NodeData::Text(text.to_string())
                }
                scraper::Node::Comment(comment) => {
                    let comment: &str = comment;
                    NodeData::Comment(comment.to_string())
                }
                scraper::Node::Doctype(doctype) => NodeData::Doctype(doctype.name().to_string()),
                _ => continue,
            };
            let id = doc.append(parent, data);
            ids.insert(node.id(), id);
        }

        doc
    }

    fn append(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    /// Where a scan should start: <body> for documents, the wrapper for fragments.
    pub fn scan_root(&self) -> NodeId {
        self.body.unwrap_or(self.content_root)
    }

    // Top-level fragment nodes have no parent element, like <template> content.
    fn is_fragment_wrapper(&self, id: NodeId) -> bool {
        self.content_root != self.root() && id == self.content_root
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.data(id) {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn child_elements(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| matches!(self.data(*c), NodeData::Element { .. }))
            .collect()
    }

    /// First element of the content (the top-level element of a fragment).
    pub fn first_element(&self) -> Option<NodeId> {
        self.child_elements(self.content_root).into_iter().next()
    }

    /// First element named `tag` in document order.
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        crate::dom::descendants(self, &self.root())
            .into_iter()
            .find(|id| self.tag_name(*id) == Some(tag))
    }

    /// Selector-like location of a node, e.g. `html > body > div:nth-of-type(2) > span`.
    pub fn path(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id).filter(|n| !self.is_fragment_wrapper(*n));
        while let Some(node) = current {
            match self.data(node) {
                NodeData::Element { name, .. } => {
                    let same_tag: Vec<NodeId> = self
                        .parent(node)
                        .map(|p| self.child_elements(p))
                        .unwrap_or_default()
                        .into_iter()
                        .filter(|s| self.tag_name(*s) == Some(name.as_str()))
                        .collect();
                    if same_tag.len() > 1 {
                        let index = same_tag.iter().position(|s| *s == node).unwrap_or(0) + 1;
                        parts.push(format!("{}:nth-of-type({})", name, index));
                    } else {
                        parts.push(name.clone());
                    }
                }
                NodeData::Text(_) => parts.push("#text".to_string()),
                NodeData::Comment(_) => parts.push("#comment".to_string()),
                NodeData::Document | NodeData::Doctype(_) => {}
            }
            current = self.parent(node).filter(|n| !self.is_fragment_wrapper(*n));
        }
        parts.reverse();
        parts.join(" > ")
    }

    /// Serialize the content back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.content_root) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Document => {
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
            }
            NodeData::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Text(text) => {
                let raw = self
                    .parent(id)
                    .and_then(|p| self.tag_name(p))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            NodeData::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

impl Dom for Document {
    type Node = NodeId;

    fn kind(&self, node: &NodeId) -> NodeKind {
        match self.data(*node) {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.children(*node).to_vec()
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
            .filter(|p| !self.is_fragment_wrapper(*p))
            .filter(|p| matches!(self.data(*p), NodeData::Element { .. }))
    }

    fn is_body(&self, node: &NodeId) -> bool {
        self.body == Some(*node)
    }

    fn text_content(&self, node: &NodeId) -> String {
        match self.data(*node) {
            NodeData::Text(text) | NodeData::Comment(text) => text.clone(),
            NodeData::Doctype(_) => String::new(),
            NodeData::Element { .. } | NodeData::Document => {
                let mut out = String::new();
                for id in crate::dom::descendants(self, node) {
                    if let NodeData::Text(text) = self.data(id) {
                        out.push_str(text);
                    }
                }
                out
            }
        }
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attribute(*node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &mut self.nodes[node.0].data {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document_finds_body() {
        let doc = Document::parse("<html><body><p>hi</p></body></html>");
        let body = doc.body().expect("body");
        assert_eq!(doc.tag_name(body), Some("body"));
        assert_eq!(doc.scan_root(), body);
        let p = doc.find_element("p").unwrap();
        assert_eq!(doc.parent_element(&p), Some(body));
        assert!(doc.is_body(&body));
    }

    #[test]
    fn test_parse_fragment_has_no_body() {
        let doc = Document::parse_fragment("<span>1 <span>1/2</span></span>");
        assert_eq!(doc.body(), None);
        let span = doc.first_element().unwrap();
        assert_eq!(doc.tag_name(span), Some("span"));
        assert_eq!(doc.parent_element(&span), None);
        assert_eq!(doc.child_nodes(&span).len(), 2);
        assert_eq!(doc.path(span), "span");
        let inner = doc.child_elements(span)[0];
        assert_eq!(doc.parent_element(&inner), Some(span));
        assert_eq!(doc.path(inner), "span > span");
    }

    #[test]
    fn test_whitespace_text_nodes_are_kept() {
        let doc = Document::parse_fragment("<span><span>1/2</span> <span>\"</span></span>");
        let span = doc.first_element().unwrap();
        let kinds: Vec<NodeKind> = doc
            .child_nodes(&span)
            .iter()
            .map(|c| doc.kind(c))
            .collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Element, NodeKind::Text, NodeKind::Element]
        );
    }

    #[test]
    fn test_text_content_and_entities() {
        let doc = Document::parse_fragment("<p>1&nbsp;<b>1/2</b>&quot;</p>");
        let p = doc.first_element().unwrap();
        assert_eq!(doc.text_content(&p), "1\u{a0}1/2\"");
    }

    #[test]
    fn test_set_attribute_and_serialize() {
        let mut doc = Document::parse_fragment("<span class=\"x\">2 in</span><br>");
        let span = doc.first_element().unwrap();
        doc.set_attribute(&span, "title", "2 in = \"50.80 mm\"");
        doc.set_attribute(&span, "class", "y");
        assert_eq!(doc.get_attribute(&span, "class").as_deref(), Some("y"));
        assert_eq!(
            doc.to_html(),
            "<span class=\"y\" title=\"2 in = &quot;50.80 mm&quot;\">2 in</span><br>"
        );
    }

    #[test]
    fn test_serialize_escapes_text() {
        let doc = Document::parse_fragment("<p>a &lt; b &amp; c</p><script>if (a < b) {}</script>");
        assert_eq!(
            doc.to_html(),
            "<p>a &lt; b &amp; c</p><script>if (a < b) {}</script>"
        );
    }

    #[test]
    fn test_path() {
        let doc = Document::parse("<body><div>a</div><div><span>b</span></div></body>");
        let span = doc.find_element("span").unwrap();
        assert_eq!(doc.path(span), "html > body > div:nth-of-type(2) > span");
    }
}
