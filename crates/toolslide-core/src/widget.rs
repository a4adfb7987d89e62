//! Toolslide Widget
//!
//! Owns the widget state and projects it onto the host document.

use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};
use std::time::Duration;

use toolslide_dom::{Document, ListenerId, NodeId, TimerId};
use toolslide_panels::{OpenState, Panel, PanelRef, PanelSet};

use crate::config::{Config, Options, Position, Target};
use crate::error::ToolslideError;
use crate::listeners::{EventArgs, WidgetEvent};
use crate::{
    Result, ACTIVE_CLASS, CONTAINER_SELECTOR, CONTENT_SELECTOR, LIBRARY_CLASS, NAV_SELECTOR,
};

/// The parts of the host markup the widget drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elements {
    /// Mount point; carries the `toolslide`, position and open markers
    pub root: NodeId,
    /// `.ts-container`, sized against the nav strip
    pub container: NodeId,
    /// `.ts-content-container`, parent of the panels
    pub content: NodeId,
    /// `.ts-nav-container`, parent of the nav items
    pub nav: NodeId,
}

pub(crate) struct WidgetState {
    pub(crate) open: OpenState,
    pub(crate) panels: PanelSet,
    /// Pending auto-close timer
    pub(crate) timer: Option<TimerId>,
    /// Bumped whenever the timer is replaced or cancelled; a firing timer
    /// whose generation is stale does nothing.
    pub(crate) timer_generation: u64,
    /// Host listeners registered by this widget
    pub(crate) bindings: Vec<ListenerId>,
}

pub(crate) struct Inner {
    pub(crate) document: Document,
    pub(crate) elements: Elements,
    pub(crate) config: RwLock<Config>,
    pub(crate) state: Mutex<WidgetState>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for id in state.bindings.drain(..) {
            self.document.remove_event_listener(id);
        }
        if let Some(timer) = state.timer.take() {
            self.document.clear_timeout(timer);
        }
    }
}

/// A mounted slide-out widget.
///
/// Handles are cheap to clone and share one widget. Host listeners only hold
/// a weak reference, so once every handle is dropped the widget detaches
/// itself from the document and cancels its pending timer.
pub struct Toolslide {
    pub(crate) inner: Arc<Inner>,
}

impl Toolslide {
    /// Mount a widget on `target` inside `document`.
    ///
    /// The target and the markup below it are validated before the document
    /// is touched, so a failed call leaves no trace.
    pub fn create(document: &Document, target: Option<Target>, options: Options) -> Result<Self> {
        let config = Config::resolve(options);

        let root = resolve_target(document, target)?;
        let elements = Elements {
            root,
            container: find_markup(document, root, "container", CONTAINER_SELECTOR)?,
            content: find_markup(document, root, "content", CONTENT_SELECTOR)?,
            nav: find_markup(document, root, "nav", NAV_SELECTOR)?,
        };
        let panels = PanelSet::from_document(document, elements.content, elements.nav)?;

        let widget = Self {
            inner: Arc::new(Inner {
                document: document.clone(),
                elements,
                config: RwLock::new(config),
                state: Mutex::new(WidgetState {
                    open: OpenState::Closed,
                    panels,
                    timer: None,
                    timer_generation: 0,
                    bindings: Vec::new(),
                }),
            }),
        };

        widget.apply_config();
        widget.bind_events();

        tracing::info!(
            root = %root,
            panels = widget.panel_count(),
            open = widget.is_open(),
            "Created toolslide widget"
        );

        Ok(widget)
    }

    /// Shorthand for [`Toolslide::create`] with a target
    pub fn mount(document: &Document, target: impl Into<Target>, options: Options) -> Result<Self> {
        Self::create(document, Some(target.into()), options)
    }

    pub(crate) fn upgrade(inner: &Weak<Inner>) -> Option<Self> {
        inner.upgrade().map(|inner| Self { inner })
    }

    fn apply_config(&self) {
        let config = self.config();
        let root = self.inner.elements.root;

        self.inner.document.add_class(root, LIBRARY_CLASS);
        self.apply_position(config.position);
        self.set_width(&config.width);
        self.set_height(&config.height);
        self.apply_animations();

        if config.autoclose {
            self.set_auto_close(config.autoclose_duration());
        }

        let initial = {
            let state = self.inner.state.lock();
            match config.active_panel.as_deref() {
                Some(id) if state.panels.get(id).is_some() => Some(id.to_string()),
                requested => {
                    if let Some(id) = requested {
                        tracing::warn!(
                            panel = %id,
                            "Unknown active panel, falling back to the first panel"
                        );
                    }
                    state.panels.by_index(0).map(|p| p.id.clone())
                }
            }
        };
        if let Some(id) = initial {
            self.set_active_by_id(id);
        }

        if config.start_open {
            self.open();
        } else {
            self.close();
        }
    }

    // === Open / close ===

    pub fn open(&self) {
        self.transition(OpenState::Open);
    }

    pub fn close(&self) {
        self.transition(OpenState::Closed);
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().open.is_open()
    }

    pub fn open_state(&self) -> OpenState {
        self.inner.state.lock().open
    }

    fn transition(&self, target: OpenState) {
        let root = self.inner.elements.root;
        let args = EventArgs::Visibility { root };
        let (before, after) = match target {
            OpenState::Open => (WidgetEvent::BeforeOpen, WidgetEvent::AfterOpen),
            OpenState::Closed => (WidgetEvent::BeforeClose, WidgetEvent::AfterClose),
        };

        self.fire(before, &args);

        self.inner.state.lock().open = target;
        let document = &self.inner.document;
        document.remove_class(root, target.toggled().marker());
        document.add_class(root, target.marker());
        tracing::debug!(root = %root, state = %target, "Widget transition");

        self.fire(after, &args);
    }

    // === Panel selection ===

    /// Make `panel` (an id or a content panel element) the active panel.
    /// Returns `false` when it is unknown or already active.
    pub fn set_active_by_id(&self, panel: impl Into<PanelRef>) -> bool {
        let panel = panel.into();
        let Some(activation) = self.inner.state.lock().panels.plan(&panel) else {
            tracing::trace!(?panel, "Selection ignored");
            return false;
        };

        let args = EventArgs::Toggle {
            previous: activation.previous.clone(),
            next: activation.next.clone(),
        };
        self.fire(WidgetEvent::BeforeToggle, &args);

        self.inner.state.lock().panels.commit(&activation);
        self.project_active(&activation.next);

        self.fire(WidgetEvent::AfterToggle, &args);
        true
    }

    /// Select the `index`-th content panel in document order
    pub fn set_active_by_index(&self, index: usize) -> bool {
        let id = self
            .inner
            .state
            .lock()
            .panels
            .by_index(index)
            .map(|p| p.id.clone());

        match id {
            Some(id) => self.set_active_by_id(id),
            None => {
                tracing::trace!(index, "No panel at index");
                false
            }
        }
    }

    /// Whether `target` is active. Accepts a panel id, a panel element, a nav
    /// item, or the id of a nav item.
    pub fn is_active(&self, target: impl Into<PanelRef>) -> bool {
        let target = target.into();
        let element = match &target {
            PanelRef::Id(id) => self.inner.document.get_element_by_id(id),
            PanelRef::Element(_) => None,
        };

        let state = self.inner.state.lock();
        match (&target, element) {
            (PanelRef::Id(id), Some(node)) if state.panels.get(id).is_none() => {
                state.panels.is_active(&PanelRef::Element(node))
            }
            _ => state.panels.is_active(&target),
        }
    }

    fn project_active(&self, panel: &Panel) {
        let document = &self.inner.document;
        let Elements { content, nav, .. } = self.inner.elements;

        for node in document
            .children(content)
            .into_iter()
            .chain(document.children(nav))
        {
            document.remove_class(node, ACTIVE_CLASS);
        }

        document.add_class(panel.element, ACTIVE_CLASS);
        match panel.nav_item {
            Some(item) => document.add_class(item, ACTIVE_CLASS),
            None => tracing::debug!(panel = %panel.id, "Active panel has no nav item"),
        }
    }

    // === Auto-close ===

    /// Close the widget after `delay`, replacing any pending auto-close
    pub fn set_auto_close(&self, delay: Duration) {
        let weak = Arc::downgrade(&self.inner);
        let mut state = self.inner.state.lock();

        if let Some(timer) = state.timer.take() {
            self.inner.document.clear_timeout(timer);
        }
        state.timer_generation += 1;
        let generation = state.timer_generation;

        let timer = self.inner.document.set_timeout(
            delay,
            Box::new(move || {
                if let Some(widget) = Toolslide::upgrade(&weak) {
                    widget.on_auto_close_elapsed(generation);
                }
            }),
        );
        state.timer = Some(timer);

        tracing::debug!(delay_ms = delay.as_millis() as u64, "Auto-close armed");
    }

    /// Cancel the pending auto-close. Returns whether one was pending.
    pub fn cancel_auto_close(&self) -> bool {
        let mut state = self.inner.state.lock();
        state.timer_generation += 1;

        match state.timer.take() {
            Some(timer) => {
                self.inner.document.clear_timeout(timer);
                tracing::debug!("Auto-close cancelled");
                true
            }
            None => false,
        }
    }

    pub fn has_pending_auto_close(&self) -> bool {
        self.inner.state.lock().timer.is_some()
    }

    fn on_auto_close_elapsed(&self, generation: u64) {
        {
            let mut state = self.inner.state.lock();
            if state.timer_generation != generation {
                return;
            }
            state.timer = None;
        }

        tracing::debug!("Auto-close elapsed");
        self.close();
    }

    // === Notifications ===

    /// Invoke the listener registered for `event`, if any
    pub fn fire(&self, event: WidgetEvent, args: &EventArgs) {
        let listener = self.inner.config.read().listeners.get(event);
        if let Some(listener) = listener {
            tracing::trace!(%event, "Firing listener");
            listener(self, args);
        }
    }

    // === Accessors ===

    /// Snapshot of the effective configuration
    pub fn config(&self) -> Config {
        self.inner.config.read().clone()
    }

    pub fn position(&self) -> Position {
        self.inner.config.read().position
    }

    pub fn active_panel(&self) -> Option<Panel> {
        self.inner.state.lock().panels.active().cloned()
    }

    pub fn panel_ids(&self) -> Vec<String> {
        self.inner.state.lock().panels.ids()
    }

    pub fn panel_count(&self) -> usize {
        self.inner.state.lock().panels.len()
    }

    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    pub fn elements(&self) -> Elements {
        self.inner.elements
    }
}

impl Clone for Toolslide {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for Toolslide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Toolslide")
            .field("root", &self.inner.elements.root)
            .field("open", &state.open)
            .field("active", &state.panels.active_id())
            .finish()
    }
}

fn resolve_target(document: &Document, target: Option<Target>) -> Result<NodeId> {
    match target {
        None => Err(ToolslideError::MissingTarget),
        Some(Target::Selector(selector)) if selector.trim().is_empty() => {
            Err(ToolslideError::MissingTarget)
        }
        Some(Target::Selector(selector)) => document
            .select(&selector)?
            .ok_or(ToolslideError::TargetNotFound(selector)),
        Some(Target::Element(node)) => {
            if !document.exists(node) {
                Err(ToolslideError::TargetNotFound(node.to_string()))
            } else if !document.is_element(node) {
                Err(ToolslideError::InvalidTargetType(node))
            } else {
                Ok(node)
            }
        }
    }
}

fn find_markup(
    document: &Document,
    root: NodeId,
    role: &'static str,
    selector: &'static str,
) -> Result<NodeId> {
    document
        .query_selector(root, selector)?
        .ok_or(ToolslideError::MissingMarkup { role, selector })
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolslide_dom::ElementSpec;

    fn markup() -> ElementSpec {
        ElementSpec::div().with_id("ts").with_children([
            ElementSpec::div().with_class("ts-nav-container").with_children([
                ElementSpec::div().with_class("ts-nav-item").with_attribute("ts-target", "panel-1"),
                ElementSpec::div().with_class("ts-nav-item").with_attribute("ts-target", "panel-2"),
            ]),
            ElementSpec::div().with_class("ts-container").with_child(
                ElementSpec::div().with_class("ts-content-container").with_children([
                    ElementSpec::div().with_id("panel-1").with_class("ts-content-item"),
                    ElementSpec::div().with_id("panel-2").with_class("ts-content-item"),
                ]),
            ),
        ])
    }

    #[test]
    fn test_create_defaults() {
        let document = Document::from_spec(&markup()).unwrap();
        let widget = Toolslide::mount(&document, "#ts", Options::default()).unwrap();
        let root = widget.elements().root;

        assert!(widget.is_open());
        assert_eq!(document.classes(root), vec!["toolslide", "ts-left", "open"]);
        assert_eq!(widget.active_panel().unwrap().id, "panel-1");
        assert_eq!(widget.panel_ids(), vec!["panel-1", "panel-2"]);
        assert!(!widget.has_pending_auto_close());
    }

    #[test]
    fn test_target_errors() {
        let document = Document::from_spec(&markup()).unwrap();

        assert!(matches!(
            Toolslide::create(&document, None, Options::default()),
            Err(ToolslideError::MissingTarget)
        ));
        assert!(matches!(
            Toolslide::mount(&document, "", Options::default()),
            Err(ToolslideError::MissingTarget)
        ));
        assert!(matches!(
            Toolslide::mount(&document, "#nope", Options::default()),
            Err(ToolslideError::TargetNotFound(_))
        ));

        let text = document.create_text("plain");
        assert!(matches!(
            Toolslide::mount(&document, text, Options::default()),
            Err(ToolslideError::InvalidTargetType(node)) if node == text
        ));
    }

    #[test]
    fn test_missing_markup_leaves_document_untouched() {
        let document = Document::from_spec(
            &ElementSpec::div()
                .with_id("ts")
                .with_child(ElementSpec::div().with_class("ts-container")),
        )
        .unwrap();
        let root = document.get_element_by_id("ts").unwrap();

        assert!(matches!(
            Toolslide::mount(&document, root, Options::default()),
            Err(ToolslideError::MissingMarkup { role: "content", .. })
        ));
        assert!(document.classes(root).is_empty());
        assert_eq!(document.listener_count(), 0);
    }

    #[test]
    fn test_toggle_and_listener_reentry() {
        let document = Document::from_spec(&markup()).unwrap();
        let options = Options::new().on(WidgetEvent::AfterClose, |widget, _| {
            // Listeners may drive the widget they are attached to
            widget.set_active_by_index(1);
        });
        let widget = Toolslide::mount(&document, "#ts", options).unwrap();

        assert!(widget.is_active("panel-1"));
        widget.toggle();
        assert!(!widget.is_open());
        assert!(widget.is_active("panel-2"));
        widget.toggle();
        assert_eq!(widget.open_state(), OpenState::Open);
    }

    #[test]
    fn test_auto_close_generation() {
        let document = Document::from_spec(&markup()).unwrap();
        let widget = Toolslide::mount(&document, "#ts", Options::default()).unwrap();

        widget.set_auto_close(Duration::from_millis(50));
        widget.set_auto_close(Duration::from_millis(200));
        assert!(widget.has_pending_auto_close());
        assert!(widget.cancel_auto_close());
        assert!(!widget.cancel_auto_close());

        // A stale generation never closes the widget
        widget.on_auto_close_elapsed(0);
        assert!(widget.is_open());
    }

    #[test]
    fn test_drop_detaches_from_document() {
        let document = Document::from_spec(&markup()).unwrap();
        let widget = Toolslide::mount(
            &document,
            "#ts",
            Options::new().with_autoclose(Duration::from_millis(10)),
        )
        .unwrap();
        assert!(document.listener_count() > 0);
        assert_eq!(document.scheduler().pending(), 1);

        drop(widget);
        assert_eq!(document.listener_count(), 0);
        assert_eq!(document.scheduler().pending(), 0);
    }
}
