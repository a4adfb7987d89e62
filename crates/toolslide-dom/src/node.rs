//! Node storage

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to a node owned by a [`crate::Document`].
///
/// Handles are plain indices; they stay valid for the lifetime of the
/// document because nodes are never freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind {
    Element { tag: String },
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub attributes: BTreeMap<String, String>,
    /// Class list in insertion order, without duplicates
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
    pub client_width: u32,
    pub client_height: u32,
}

impl Node {
    pub fn element(tag: &str) -> Self {
        Self::with_kind(NodeKind::Element {
            tag: tag.to_lowercase(),
        })
    }

    pub fn text(text: &str) -> Self {
        Self::with_kind(NodeKind::Text(text.to_string()))
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            style: BTreeMap::new(),
            client_width: 0,
            client_height: 0,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Content of a text node
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// The `class` attribute is kept in sync with the class list.
    pub fn set_class_attribute(&mut self, value: &str) {
        self.classes.clear();
        for class in value.split_whitespace() {
            self.add_class(class);
        }
    }
}

/// Arena of nodes plus the document body.
#[derive(Debug)]
pub(crate) struct Tree {
    pub nodes: Vec<Node>,
    pub body: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::element("body")],
            body: NodeId(0),
        }
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Element (non-text) children of `id` in document order
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| {
                node.children
                    .iter()
                    .copied()
                    .filter(|child| self.get(*child).is_some_and(Node::is_element))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Inclusive ancestor check, matching `Node.contains`
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Descendants of `scope` in document (pre-)order, excluding `scope`
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(scope)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_has_no_duplicates() {
        let mut node = Node::element("DIV");
        node.add_class("open");
        node.add_class("open");
        node.add_class("");
        assert_eq!(node.classes, vec!["open"]);
        assert_eq!(node.tag(), Some("div"));

        node.set_class_attribute("ts-left  toolslide ts-left");
        assert_eq!(node.classes, vec!["ts-left", "toolslide"]);
    }

    #[test]
    fn test_descendants_are_in_document_order() {
        let mut tree = Tree::new();
        let a = tree.insert(Node::element("div"));
        let b = tree.insert(Node::element("div"));
        let c = tree.insert(Node::element("div"));
        tree.get_mut(tree.body).unwrap().children = vec![a, c];
        tree.get_mut(a).unwrap().children = vec![b];
        tree.get_mut(a).unwrap().parent = Some(tree.body);
        tree.get_mut(b).unwrap().parent = Some(a);
        tree.get_mut(c).unwrap().parent = Some(tree.body);

        assert_eq!(tree.descendants(tree.body), vec![a, b, c]);
        assert!(tree.contains(a, b));
        assert!(tree.contains(b, b));
        assert!(!tree.contains(c, b));
    }
}
