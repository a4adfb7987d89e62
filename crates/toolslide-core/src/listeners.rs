//! Notification hooks
//!
//! User callbacks invoked around open, close and panel toggle transitions.
//! Each callback receives the widget itself, so it can query or drive it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use toolslide_dom::NodeId;
use toolslide_panels::Panel;

use crate::widget::Toolslide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetEvent {
    BeforeOpen,
    AfterOpen,
    BeforeClose,
    AfterClose,
    BeforeToggle,
    AfterToggle,
}

impl WidgetEvent {
    pub const ALL: [WidgetEvent; 6] = [
        WidgetEvent::BeforeOpen,
        WidgetEvent::AfterOpen,
        WidgetEvent::BeforeClose,
        WidgetEvent::AfterClose,
        WidgetEvent::BeforeToggle,
        WidgetEvent::AfterToggle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetEvent::BeforeOpen => "beforeOpen",
            WidgetEvent::AfterOpen => "afterOpen",
            WidgetEvent::BeforeClose => "beforeClose",
            WidgetEvent::AfterClose => "afterClose",
            WidgetEvent::BeforeToggle => "beforeToggle",
            WidgetEvent::AfterToggle => "afterToggle",
        }
    }
}

impl std::fmt::Display for WidgetEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WidgetEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| format!("Unknown widget event: {}", s))
    }
}

/// Arguments passed alongside a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventArgs {
    /// Open/close transitions carry the widget root
    Visibility { root: NodeId },
    /// Panel toggles carry the outgoing and incoming panels
    Toggle {
        previous: Option<Panel>,
        next: Panel,
    },
}

pub type ListenerFn = Arc<dyn Fn(&Toolslide, &EventArgs) + Send + Sync>;

/// Event name to callback mapping. At most one callback per event.
#[derive(Clone, Default)]
pub struct Listeners {
    handlers: HashMap<WidgetEvent, ListenerFn>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`, replacing any previous one
    pub fn on<F>(&mut self, event: WidgetEvent, listener: F)
    where
        F: Fn(&Toolslide, &EventArgs) + Send + Sync + 'static,
    {
        self.handlers.insert(event, Arc::new(listener));
    }

    pub fn with<F>(mut self, event: WidgetEvent, listener: F) -> Self
    where
        F: Fn(&Toolslide, &EventArgs) + Send + Sync + 'static,
    {
        self.on(event, listener);
        self
    }

    pub fn remove(&mut self, event: WidgetEvent) -> bool {
        self.handlers.remove(&event).is_some()
    }

    pub fn get(&self, event: WidgetEvent) -> Option<ListenerFn> {
        self.handlers.get(&event).cloned()
    }

    pub fn contains(&self, event: WidgetEvent) -> bool {
        self.handlers.contains_key(&event)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut events: Vec<&str> = self.handlers.keys().map(WidgetEvent::as_str).collect();
        events.sort_unstable();
        f.debug_struct("Listeners").field("events", &events).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        for event in WidgetEvent::ALL {
            assert_eq!(event.as_str().parse::<WidgetEvent>().unwrap(), event);
        }
        assert!("onOpen".parse::<WidgetEvent>().is_err());
        assert_eq!(
            serde_json::to_string(&WidgetEvent::BeforeToggle).unwrap(),
            "\"beforeToggle\""
        );
    }

    #[test]
    fn test_register_and_replace() {
        let mut listeners = Listeners::new().with(WidgetEvent::AfterOpen, |_, _| {});
        assert!(listeners.contains(WidgetEvent::AfterOpen));
        assert!(listeners.get(WidgetEvent::BeforeOpen).is_none());

        listeners.on(WidgetEvent::AfterOpen, |_, _| {});
        assert_eq!(listeners.len(), 1);

        assert!(listeners.remove(WidgetEvent::AfterOpen));
        assert!(listeners.is_empty());
        assert_eq!(format!("{:?}", listeners), "Listeners { events: [] }");
    }
}
