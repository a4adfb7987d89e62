//! Event routing
//!
//! Wires host events to widget transitions:
//! - nav item click: open, close or switch panel
//! - container pointer enter/leave: pause and re-arm auto-close
//! - document click outside the root: close

use std::sync::Arc;

use toolslide_dom::{DomEvent, EventKind, Listener};

use crate::widget::Toolslide;
use crate::TARGET_ATTRIBUTE;

/// Wrap `handler` in a host listener that holds the widget weakly
fn listener(widget: &Toolslide, handler: fn(&Toolslide, &DomEvent)) -> Listener {
    let weak = Arc::downgrade(&widget.inner);
    Arc::new(move |event: &DomEvent| {
        if let Some(widget) = Toolslide::upgrade(&weak) {
            handler(&widget, event);
        }
    })
}

impl Toolslide {
    pub(crate) fn bind_events(&self) {
        let document = &self.inner.document;
        let elements = self.inner.elements;
        let (autoclose, click_outside) = {
            let config = self.inner.config.read();
            (config.autoclose, config.click_outside_to_close)
        };

        let mut bindings = Vec::new();
        for item in document.children(elements.nav) {
            bindings.push(document.add_event_listener(
                item,
                EventKind::Click,
                listener(self, Toolslide::on_nav_click),
            ));
        }

        if autoclose {
            bindings.push(document.add_event_listener(
                elements.container,
                EventKind::PointerEnter,
                listener(self, Toolslide::on_pointer_enter),
            ));
            bindings.push(document.add_event_listener(
                elements.container,
                EventKind::PointerLeave,
                listener(self, Toolslide::on_pointer_leave),
            ));
        }

        if click_outside {
            bindings.push(document.add_document_listener(
                EventKind::Click,
                listener(self, Toolslide::on_document_click),
            ));
        }

        tracing::debug!(listeners = bindings.len(), "Bound widget events");
        self.inner.state.lock().bindings.extend(bindings);
    }

    fn on_nav_click(&self, event: &DomEvent) {
        let Some(item) = event.current_target else {
            return;
        };

        if !self.is_open() {
            self.open();
        } else {
            let closeable = self.inner.config.read().closeable;
            if closeable && self.is_active(item) {
                self.close();
            }
        }

        match self.inner.document.attribute(item, TARGET_ATTRIBUTE) {
            Some(target) => {
                self.set_active_by_id(target);
            }
            None => tracing::debug!(nav_item = %item, "Nav item has no target"),
        }
    }

    fn on_pointer_enter(&self, _event: &DomEvent) {
        self.cancel_auto_close();
    }

    fn on_pointer_leave(&self, _event: &DomEvent) {
        let delay = self.inner.config.read().autoclose_duration();
        self.set_auto_close(delay);
    }

    fn on_document_click(&self, event: &DomEvent) {
        if !self.inner.document.contains(self.inner.elements.root, event.target) {
            tracing::debug!(clicked = %event.target, "Click outside widget");
            self.close();
        }
    }

    /// Detach every host listener and cancel the pending auto-close. The
    /// markup keeps its current markers.
    pub fn destroy(&self) {
        let bindings = std::mem::take(&mut self.inner.state.lock().bindings);
        for id in &bindings {
            self.inner.document.remove_event_listener(*id);
        }
        self.cancel_auto_close();

        tracing::info!(
            root = %self.inner.elements.root,
            listeners = bindings.len(),
            "Destroyed toolslide widget"
        );
    }

    /// Whether the widget still listens to host events
    pub fn is_bound(&self) -> bool {
        !self.inner.state.lock().bindings.is_empty()
    }
}
