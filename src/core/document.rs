// File: src/core/document.rs
use crate::core::converter::Substituter;
use crate::core::types::EffectiveDictionary;

/// Index of a node inside a [`Document`].
pub type NodeId = usize;

/// Element names whose text children are never rewritten.
const OPAQUE_CONTAINERS: [&str; 3] = ["script", "style", "noscript"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    Text(String),
    /// Markup carried through verbatim (comments, doctype, CDATA, processing instructions).
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of elements and text nodes, stored flat. Node 0 is the root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            kind: NodeKind::Element {
                tag: root_tag.to_string(),
                attributes: Vec::new(),
                self_closing: false,
            },
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, parent: Some(parent), children: Vec::new() });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.append_element_with(parent, tag, Vec::new(), false)
    }

    pub fn append_element_with(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    ) -> NodeId {
        self.push(parent, NodeKind::Element { tag: tag.to_string(), attributes, self_closing })
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    pub fn append_raw(&mut self, parent: NodeId, raw: &str) -> NodeId {
        self.push(parent, NodeKind::Raw(raw.to_string()))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Text of a text node; `None` for anything else.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Replaces the content of a text node. Returns false if `id` is not one.
    pub fn set_text(&mut self, id: NodeId, text: String) -> bool {
        match self.nodes.get_mut(id).map(|node| &mut node.kind) {
            Some(NodeKind::Text(content)) => {
                *content = text;
                true
            }
            _ => false,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id).filter_map(|n| self.text(n)).collect()
    }

    /// Depth-first, document-order walk starting at (and including) `id`.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if id < self.nodes.len() { vec![id] } else { Vec::new() };
        Descendants { doc: self, stack }
    }

    /// True when the node's immediate parent is a script, style or noscript element.
    fn in_opaque_container(&self, id: NodeId) -> bool {
        self.parent(id)
            .and_then(|p| self.tag(p))
            .map(|tag| OPAQUE_CONTAINERS.iter().any(|c| tag.eq_ignore_ascii_case(c)))
            .unwrap_or(false)
    }

    /// Text nodes eligible for substitution, in document order.
    pub fn translatable_text_nodes(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| self.text(id).is_some() && !self.in_opaque_container(id))
            .collect()
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.doc.children(id).iter().rev());
        Some(id)
    }
}

/// Tree mode: rewrites every eligible text node in place and returns how many
/// nodes changed.
pub fn substitute_tree(doc: &mut Document, dict: &EffectiveDictionary, word_tier: u32) -> usize {
    let substituter = Substituter::new(dict, word_tier);
    let mut changed = 0;
    for id in doc.translatable_text_nodes() {
        let Some(original) = doc.text(id) else { continue };
        let translated = substituter.translate_text(original);
        if translated != original {
            doc.set_text(id, translated);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DictionaryEntry, ALL_TIERS};
    use rstest::{fixture, rstest};

    #[fixture]
    fn dict() -> EffectiveDictionary {
        let mut dict = EffectiveDictionary::new();
        dict.insert("hello", DictionaryEntry::new("xyz", 1));
        dict.insert("world", DictionaryEntry::new("wld", 1));
        dict
    }

    #[rstest]
    #[case("script")]
    #[case("style")]
    #[case("noscript")]
    #[case("SCRIPT")]
    fn opaque_containers_are_skipped(dict: EffectiveDictionary, #[case] tag: &str) {
        let mut doc = Document::new("body");
        let container = doc.append_element(doc.root(), tag);
        let hidden = doc.append_text(container, "hello world");
        let para = doc.append_element(doc.root(), "p");
        let visible = doc.append_text(para, "hello world");

        let changed = substitute_tree(&mut doc, &dict, ALL_TIERS);

        assert_eq!(changed, 1);
        assert_eq!(doc.text(hidden), Some("hello world"));
        assert_eq!(doc.text(visible), Some("xyz wld"));
    }

    #[rstest]
    fn only_immediate_parent_is_checked(dict: EffectiveDictionary) {
        let mut doc = Document::new("body");
        let noscript = doc.append_element(doc.root(), "noscript");
        let para = doc.append_element(noscript, "p");
        let nested = doc.append_text(para, "hello");

        substitute_tree(&mut doc, &dict, ALL_TIERS);
        assert_eq!(doc.text(nested), Some("xyz"));
    }

    #[rstest]
    fn walks_in_document_order() {
        let mut doc = Document::new("body");
        let a = doc.append_text(doc.root(), "a");
        let div = doc.append_element(doc.root(), "div");
        let b = doc.append_text(div, "b");
        let c = doc.append_text(doc.root(), "c");

        assert_eq!(doc.translatable_text_nodes(), vec![a, b, c]);
        assert_eq!(doc.text_content(doc.root()), "abc");
    }

    #[rstest]
    fn raw_nodes_are_untouched(dict: EffectiveDictionary) {
        let mut doc = Document::new("body");
        let comment = doc.append_raw(doc.root(), "<!-- hello -->");

        assert_eq!(substitute_tree(&mut doc, &dict, ALL_TIERS), 0);
        assert_eq!(doc.kind(comment), Some(&NodeKind::Raw("<!-- hello -->".to_string())));
    }

    #[rstest]
    fn set_text_rejects_elements() {
        let mut doc = Document::new("body");
        assert!(!doc.set_text(doc.root(), "x".to_string()));
    }
}
