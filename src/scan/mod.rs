// Traversal driver: runs every matcher over a subtree in document order


use crate::config::Settings;
use crate::dom::{descendants, Dom, NodeKind};
use crate::handlers::{annotate_text_node, Annotation, StructuralMatcher};

#[cfg(not(target_arch = "wasm32"))]
use crate::dom::Document;
#[cfg(not(target_arch = "wasm32"))]
use crate::handlers::MatcherKind;
#[cfg(not(target_arch = "wasm32"))]
use serde::Serialize;

/// What one pass over a subtree found.
#[derive(Debug, Clone)]
pub struct ScanReport<N> {
    pub annotations: Vec<Annotation<N>>,
    pub elements: usize,
    pub text_nodes: usize,
}

impl<N> Default for ScanReport<N> {
    fn default() -> Self {
        Self {
            annotations: Vec::new(),
            elements: 0,
            text_nodes: 0,
        }
    }
}

impl<N> ScanReport<N> {
    fn merge(&mut self, other: ScanReport<N>) {
        self.annotations.extend(other.annotations);
        self.elements += other.elements;
        self.text_nodes += other.text_nodes;
    }
}

/// Walks a subtree and applies the matchers to each node.
///
/// Elements get the four structural matchers in `StructuralMatcher::ALL` order,
/// text nodes get the inline matcher. Re-running over the same tree is cheap and
/// changes nothing: converted elements short-circuit in the guard.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    settings: Settings,
}

impl Scanner {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply the matchers that fit `node`'s kind.
    pub fn scan_node<D: Dom>(&self, dom: &mut D, node: &D::Node) -> Vec<Annotation<D::Node>> {
        match dom.kind(node) {
            NodeKind::Element => StructuralMatcher::ALL
                .iter()
                .filter_map(|matcher| matcher.apply(dom, node, &self.settings))
                .collect(),
            NodeKind::Text => annotate_text_node(dom, node, &self.settings)
                .into_iter()
                .collect(),
            NodeKind::Other => Vec::new(),
        }
    }

    /// Scan `root` and everything below it.
    pub fn run<D: Dom>(&self, dom: &mut D, root: &D::Node) -> ScanReport<D::Node> {
        let mut report = ScanReport::default();

        // Matchers only write attributes, so the node list stays valid.
        for node in descendants(dom, root) {
            match dom.kind(&node) {
                NodeKind::Element => report.elements += 1,
                NodeKind::Text => report.text_nodes += 1,
                NodeKind::Other => continue,
            }
            report.annotations.extend(self.scan_node(dom, &node));
        }

        tracing::debug!(
            elements = report.elements,
            text_nodes = report.text_nodes,
            annotations = report.annotations.len(),
            "scan finished"
        );
        report
    }

    /// Scan a parsed document: from <body> for full documents, or each top-level
    /// node for fragments (their wrapper is not page content).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_document(&self, doc: &mut Document) -> ScanReport<crate::dom::NodeId> {
        let root = doc.scan_root();
        if doc.body().is_some() {
            return self.run(doc, &root);
        }

        let mut report = ScanReport::default();
        for child in doc.child_nodes(&root) {
            report.merge(self.run(doc, &child));
        }
        report
    }
}

/// Serializable view of an annotation in a native document.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub path: String,
    pub matcher: MatcherKind,
    pub tooltip: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReportEntry {
    pub fn from_annotation(doc: &Document, annotation: &Annotation<crate::dom::NodeId>) -> Self {
        Self {
            path: doc.path(annotation.element),
            matcher: annotation.matcher,
            tooltip: annotation.tooltip.clone(),
        }
    }
}

/// Pretty JSON array of every annotation in `report`, one `ReportEntry` each.
#[cfg(not(target_arch = "wasm32"))]
pub fn report_json(
    doc: &Document,
    report: &ScanReport<crate::dom::NodeId>,
) -> crate::error::Result<String> {
    let entries: Vec<ReportEntry> = report
        .annotations
        .iter()
        .map(|annotation| ReportEntry::from_annotation(doc, annotation))
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
