//! Event listeners
//!
//! Listeners are registered either on a node or on the document. Clicks
//! bubble from the target up through its ancestors and finally reach the
//! document listeners; pointer enter/leave are delivered to the target only.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Click,
    PointerEnter,
    PointerLeave,
}

impl EventKind {
    pub fn bubbles(&self) -> bool {
        matches!(self, EventKind::Click)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::PointerEnter => "pointerenter",
            EventKind::PointerLeave => "pointerleave",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event as seen by a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Node the event was dispatched on
    pub target: NodeId,
    /// Node the listener is registered on, `None` for document listeners
    pub current_target: Option<NodeId>,
}

pub type Listener = Arc<dyn Fn(&DomEvent) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerScope {
    Node(NodeId),
    Document,
}

struct Registration {
    id: ListenerId,
    scope: ListenerScope,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn add(&mut self, scope: ListenerScope, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.push(Registration {
            id,
            scope,
            kind,
            listener,
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        self.registrations.len() != before
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Listeners for one dispatch stage, in registration order
    pub fn matching(&self, scope: ListenerScope, kind: EventKind) -> Vec<Listener> {
        self.registrations
            .iter()
            .filter(|r| r.scope == scope && r.kind == kind)
            .map(|r| Arc::clone(&r.listener))
            .collect()
    }
}
