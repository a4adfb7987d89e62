//! Host document
//!
//! A cheaply clonable handle to a shared element tree. Every clone sees the
//! same nodes, listeners and timers.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::error::DomError;
use crate::events::{DomEvent, EventKind, Listener, ListenerId, ListenerRegistry, ListenerScope};
use crate::node::{Node, NodeId, Tree};
use crate::selector::Selector;
use crate::spec::{ElementSpec, NodeSnapshot};
use crate::timer::{ManualScheduler, Scheduler, TimerId, TimerTask};
use crate::Result;

pub struct Document {
    tree: Arc<RwLock<Tree>>,
    listeners: Arc<RwLock<ListenerRegistry>>,
    scheduler: Arc<dyn Scheduler>,
}

impl Document {
    /// Empty document whose timers run on a private [`ManualScheduler`]
    pub fn new() -> Self {
        Self::with_scheduler(Arc::new(ManualScheduler::new()))
    }

    pub fn with_scheduler(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            tree: Arc::new(RwLock::new(Tree::new())),
            listeners: Arc::new(RwLock::new(ListenerRegistry::default())),
            scheduler,
        }
    }

    pub fn body(&self) -> NodeId {
        self.tree.read().body
    }

    // === Tree construction ===

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.tree.write().insert(Node::element(tag))
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.tree.write().insert(Node::text(text))
    }

    /// Append `child` to `parent`, detaching it from its previous parent
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let mut tree = self.tree.write();

        let parent_node = tree.get(parent).ok_or(DomError::NodeNotFound(parent))?;
        if !parent_node.is_element() {
            return Err(DomError::NotAnElement(parent));
        }
        if tree.get(child).is_none() {
            return Err(DomError::NodeNotFound(child));
        }
        if child == tree.body || tree.contains(child, parent) {
            return Err(DomError::Hierarchy(format!(
                "cannot append {} to its own descendant {}",
                child, parent
            )));
        }

        if let Some(old_parent) = tree.get(child).and_then(|n| n.parent) {
            if let Some(old) = tree.get_mut(old_parent) {
                old.children.retain(|c| *c != child);
            }
        }
        if let Some(node) = tree.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = tree.get_mut(parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Build `spec` and append it to `parent`. Returns the new element.
    pub fn build(&self, parent: NodeId, spec: &ElementSpec) -> Result<NodeId> {
        let element = self.create_element(&spec.tag);

        if let Some(id) = &spec.id {
            self.set_attribute(element, "id", id)?;
        }
        if let Some(class) = &spec.class {
            self.set_attribute(element, "class", class)?;
        }
        for (name, value) in &spec.attributes {
            self.set_attribute(element, name, value)?;
        }
        self.set_client_size(element, spec.client_width, spec.client_height);

        if let Some(text) = &spec.text {
            let text = self.create_text(text);
            self.append_child(element, text)?;
        }
        for child in &spec.children {
            self.build(element, child)?;
        }

        self.append_child(parent, element)?;
        Ok(element)
    }

    /// New document with `spec` built under the body
    pub fn from_spec(spec: &ElementSpec) -> Result<Self> {
        let document = Self::new();
        document.build(document.body(), spec)?;
        Ok(document)
    }

    // === Tree queries ===

    pub fn exists(&self, node: NodeId) -> bool {
        self.tree.read().get(node).is_some()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tree.read().get(node).is_some_and(Node::is_element)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.read().get(node)?.parent
    }

    /// Element children in document order (text nodes skipped)
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree.read().element_children(node)
    }

    /// Inclusive: a node contains itself
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.read().contains(ancestor, node)
    }

    /// First element below `scope` (exclusive) matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(scope, selector)?.into_iter().next())
    }

    /// All elements below `scope` (exclusive) matching `selector`
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        let tree = self.tree.read();
        if tree.get(scope).is_none() {
            return Err(DomError::NodeNotFound(scope));
        }

        Ok(tree
            .descendants(scope)
            .into_iter()
            .filter(|id| selector.matches(&tree, *id))
            .collect())
    }

    /// Document-wide query; unlike [`Document::query_selector`] the body
    /// itself is a candidate.
    pub fn select(&self, selector: &str) -> Result<Option<NodeId>> {
        let parsed = Selector::parse(selector)?;
        let body = self.body();
        if parsed.matches(&self.tree.read(), body) {
            return Ok(Some(body));
        }
        self.query_selector(body, selector)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let tree = self.tree.read();
        std::iter::once(tree.body)
            .chain(tree.descendants(tree.body))
            .find(|node| {
                tree.get(*node).is_some_and(|n| {
                    n.is_element() && n.attributes.get("id").map(String::as_str) == Some(id)
                })
            })
    }

    // === Attributes ===

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        let mut tree = self.tree.write();
        let element = tree.get_mut(node).ok_or(DomError::NodeNotFound(node))?;
        if !element.is_element() {
            return Err(DomError::NotAnElement(node));
        }

        if name == "class" {
            element.set_class_attribute(value);
        } else {
            element.attributes.insert(name.to_string(), value.to_string());
        }
        Ok(())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let tree = self.tree.read();
        let element = tree.get(node)?;
        if name == "class" {
            return (!element.classes.is_empty()).then(|| element.classes.join(" "));
        }
        element.attributes.get(name).cloned()
    }

    pub fn id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id")
    }

    // === Class list ===
    //
    // Class and style mutators on unknown or text nodes are no-ops.

    pub fn add_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.tree.write().get_mut(node) {
            if element.is_element() {
                element.add_class(class);
            }
        }
    }

    pub fn remove_class(&self, node: NodeId, class: &str) {
        if let Some(element) = self.tree.write().get_mut(node) {
            element.remove_class(class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.tree.read().get(node).is_some_and(|n| n.has_class(class))
    }

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.tree
            .read()
            .get(node)
            .map(|n| n.classes.clone())
            .unwrap_or_default()
    }

    // === Inline style ===

    pub fn set_style(&self, node: NodeId, property: &str, value: &str) {
        if let Some(element) = self.tree.write().get_mut(node) {
            if element.is_element() {
                element.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.tree.read().get(node)?.style.get(property).cloned()
    }

    pub fn remove_style(&self, node: NodeId, property: &str) {
        if let Some(element) = self.tree.write().get_mut(node) {
            element.style.remove(property);
        }
    }

    // === Rendered size ===

    /// Record the rendered size the host layout engine reports for `node`
    pub fn set_client_size(&self, node: NodeId, width: u32, height: u32) {
        if let Some(element) = self.tree.write().get_mut(node) {
            element.client_width = width;
            element.client_height = height;
        }
    }

    pub fn client_width(&self, node: NodeId) -> u32 {
        self.tree.read().get(node).map(|n| n.client_width).unwrap_or(0)
    }

    pub fn client_height(&self, node: NodeId) -> u32 {
        self.tree.read().get(node).map(|n| n.client_height).unwrap_or(0)
    }

    // === Events ===

    pub fn add_event_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        self.listeners
            .write()
            .add(ListenerScope::Node(node), kind, listener)
    }

    pub fn add_document_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners
            .write()
            .add(ListenerScope::Document, kind, listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.write().remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Deliver an event to `target`. Clicks bubble through the ancestors
    /// and then reach document listeners. Returns how many listeners ran.
    ///
    /// No lock is held while a listener runs, so listeners may freely
    /// mutate the document or register further listeners.
    pub fn dispatch(&self, target: NodeId, kind: EventKind) -> Result<usize> {
        let path = {
            let tree = self.tree.read();
            if tree.get(target).is_none() {
                return Err(DomError::NodeNotFound(target));
            }

            let mut path = vec![target];
            if kind.bubbles() {
                let mut current = tree.get(target).and_then(|n| n.parent);
                while let Some(id) = current {
                    path.push(id);
                    current = tree.get(id).and_then(|n| n.parent);
                }
            }
            path
        };

        let mut invoked = 0;
        for node in path {
            let listeners = self
                .listeners
                .read()
                .matching(ListenerScope::Node(node), kind);
            let event = DomEvent {
                kind,
                target,
                current_target: Some(node),
            };
            for listener in listeners {
                listener(&event);
                invoked += 1;
            }
        }

        if kind.bubbles() {
            let listeners = self.listeners.read().matching(ListenerScope::Document, kind);
            let event = DomEvent {
                kind,
                target,
                current_target: None,
            };
            for listener in listeners {
                listener(&event);
                invoked += 1;
            }
        }

        tracing::trace!(%target, %kind, invoked, "Dispatched event");
        Ok(invoked)
    }

    // === Timers ===

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        Arc::clone(&self.scheduler)
    }

    pub fn set_timeout(&self, delay: Duration, task: TimerTask) -> TimerId {
        self.scheduler.schedule(delay, task)
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    // === Snapshots ===

    pub fn snapshot(&self, node: NodeId) -> Option<NodeSnapshot> {
        let tree = self.tree.read();
        snapshot_node(&tree, node)
    }
}

fn snapshot_node(tree: &Tree, id: NodeId) -> Option<NodeSnapshot> {
    let node = tree.get(id)?;
    let tag = node.tag()?.to_string();

    let text: String = node
        .children
        .iter()
        .filter_map(|child| tree.get(*child)?.text_content())
        .collect();

    Some(NodeSnapshot {
        tag,
        id: node.attributes.get("id").cloned(),
        text: (!text.is_empty()).then_some(text),
        classes: node.classes.clone(),
        style: node.style.clone(),
        children: tree
            .element_children(id)
            .into_iter()
            .filter_map(|child| snapshot_node(tree, child))
            .collect(),
    })
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Document {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            listeners: Arc::clone(&self.listeners),
            scheduler: Arc::clone(&self.scheduler),
        }
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.tree.read().nodes.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn sample() -> (Document, NodeId) {
        let spec = ElementSpec::div().with_id("root").with_class("toolslide").with_children([
            ElementSpec::div().with_class("ts-nav-container").with_children([
                ElementSpec::div()
                    .with_class("ts-nav-item")
                    .with_attribute("ts-target", "a")
                    .with_child(ElementSpec::new("span").with_id("icon")),
                ElementSpec::div()
                    .with_class("ts-nav-item")
                    .with_attribute("ts-target", "b"),
            ]),
            ElementSpec::div().with_class("ts-content-container").with_children([
                ElementSpec::div()
                    .with_id("a")
                    .with_class("ts-content-item active")
                    .with_text("Alpha"),
                ElementSpec::div().with_id("b").with_class("ts-content-item"),
            ]),
        ]);
        let document = Document::new();
        let root = document.build(document.body(), &spec).unwrap();
        (document, root)
    }

    #[test]
    fn test_build_and_query() {
        let (document, root) = sample();

        assert_eq!(document.id(root).as_deref(), Some("root"));
        assert_eq!(document.select("#root").unwrap(), Some(root));
        assert_eq!(document.select("body").unwrap(), Some(document.body()));

        let active = document
            .query_selector(root, ".ts-content-item.active")
            .unwrap()
            .unwrap();
        assert_eq!(document.id(active).as_deref(), Some("a"));

        let nav = document
            .query_selector(root, ".ts-nav-item[ts-target='b']")
            .unwrap()
            .unwrap();
        assert_eq!(document.attribute(nav, "ts-target").as_deref(), Some("b"));

        let items = document
            .query_selector_all(root, ".ts-nav-container > .ts-nav-item")
            .unwrap();
        assert_eq!(items.len(), 2);

        assert_eq!(document.get_element_by_id("b"), document.select("#b").unwrap());
        assert!(document.query_selector(root, "#missing").unwrap().is_none());
        assert!(document.query_selector(root, "[").is_err());
    }

    #[test]
    fn test_class_and_style_mutation() {
        let (document, root) = sample();

        document.add_class(root, "open");
        assert!(document.has_class(root, "open"));
        assert_eq!(document.attribute(root, "class").as_deref(), Some("toolslide open"));
        document.remove_class(root, "open");
        assert_eq!(document.classes(root), vec!["toolslide"]);

        document.set_style(root, "width", "25%");
        assert_eq!(document.style(root, "width").as_deref(), Some("25%"));
        document.remove_style(root, "width");
        assert!(document.style(root, "width").is_none());
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (document, root) = sample();
        let inner = document.get_element_by_id("a").unwrap();

        assert!(matches!(
            document.append_child(inner, root),
            Err(DomError::Hierarchy(_))
        ));

        let text = document.create_text("hello");
        assert!(matches!(
            document.append_child(text, inner),
            Err(DomError::NotAnElement(_))
        ));
    }

    #[test]
    fn test_click_bubbles_to_document() {
        let (document, root) = sample();
        let icon = document.get_element_by_id("icon").unwrap();
        let nav_item = document.parent(icon).unwrap();
        let seen: Arc<Mutex<Vec<(Option<NodeId>, NodeId)>>> = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        document.add_event_listener(
            nav_item,
            EventKind::Click,
            Arc::new(move |e: &DomEvent| log.lock().push((e.current_target, e.target))),
        );
        let log = Arc::clone(&seen);
        let doc_listener = document.add_document_listener(
            EventKind::Click,
            Arc::new(move |e: &DomEvent| log.lock().push((e.current_target, e.target))),
        );

        assert_eq!(document.dispatch(icon, EventKind::Click).unwrap(), 2);
        assert_eq!(
            *seen.lock(),
            vec![(Some(nav_item), icon), (None, icon)]
        );

        assert!(document.remove_event_listener(doc_listener));
        assert_eq!(document.dispatch(root, EventKind::Click).unwrap(), 0);
    }

    #[test]
    fn test_pointer_events_do_not_bubble() {
        let (document, root) = sample();
        let icon = document.get_element_by_id("icon").unwrap();
        let count = Arc::new(Mutex::new(0));

        let counter = Arc::clone(&count);
        document.add_event_listener(
            root,
            EventKind::PointerEnter,
            Arc::new(move |_: &DomEvent| *counter.lock() += 1),
        );

        document.dispatch(icon, EventKind::PointerEnter).unwrap();
        assert_eq!(*count.lock(), 0);
        document.dispatch(root, EventKind::PointerEnter).unwrap();
        assert_eq!(*count.lock(), 1);
    }

    #[test]
    fn test_snapshot() {
        let (document, root) = sample();
        document.set_style(root, "height", "100%");

        let snapshot = document.snapshot(root).unwrap();
        assert_eq!(snapshot.classes, vec!["toolslide"]);
        assert_eq!(snapshot.style.get("height").map(String::as_str), Some("100%"));
        assert_eq!(snapshot.children.len(), 2);
        assert_eq!(
            snapshot.find("a").unwrap().classes,
            vec!["ts-content-item", "active"]
        );
        assert_eq!(snapshot.find("a").unwrap().text.as_deref(), Some("Alpha"));
        assert_eq!(snapshot.find("b").unwrap().text, None);
        assert_eq!(snapshot.text, None);
    }
}
