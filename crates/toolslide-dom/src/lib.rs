//! Toolslide Host Document
//!
//! In-memory model of the host page the widget is mounted into:
//! - Element tree with classes, attributes and inline styles
//! - Host-reported rendered sizes (`clientWidth` / `clientHeight`)
//! - Compound CSS selector matching
//! - Event listeners with click bubbling up to the document
//! - Host timers behind the `Scheduler` trait

mod document;
mod error;
mod events;
mod node;
mod selector;
mod spec;
mod timer;

pub use document::Document;
pub use error::DomError;
pub use events::{DomEvent, EventKind, Listener, ListenerId};
pub use node::NodeId;
pub use selector::Selector;
pub use spec::{ElementSpec, NodeSnapshot};
pub use timer::{ManualScheduler, Scheduler, TimerId, TimerTask, TokioScheduler};

pub type Result<T> = std::result::Result<T, DomError>;
