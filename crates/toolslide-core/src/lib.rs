//! Toolslide Core
//!
//! A slide-out panel widget: a nav strip plus a stack of content panels,
//! exactly one of which is active, inside a container that can be opened,
//! closed and auto-closed after pointer inactivity.
//!
//! State lives in Rust; the host document only ever sees its projection as
//! class names and inline styles.

mod animation;
mod config;
mod error;
mod layout;
mod listeners;
mod router;
mod widget;

pub use animation::{Animation, AnimationError, AnimationKind};
pub use config::{AnimationOptions, Animations, Config, Options, Position, Target};
pub use error::ToolslideError;
pub use listeners::{EventArgs, ListenerFn, Listeners, WidgetEvent};
pub use widget::{Elements, Toolslide};

// Re-export the host and state layers
pub use toolslide_dom::{
    Document, DomError, DomEvent, ElementSpec, EventKind, ManualScheduler, NodeId, NodeSnapshot,
    Scheduler, TimerId, TokioScheduler,
};
pub use toolslide_panels::{OpenState, Panel, PanelError, PanelRef, PanelSet, TARGET_ATTRIBUTE};

pub type Result<T> = std::result::Result<T, ToolslideError>;

/// Marker class added to every widget root
pub const LIBRARY_CLASS: &str = "toolslide";
/// Marker class on the active content panel and its nav item
pub const ACTIVE_CLASS: &str = "active";

pub const CONTAINER_SELECTOR: &str = ".ts-container";
pub const CONTENT_SELECTOR: &str = ".ts-content-container";
pub const NAV_SELECTOR: &str = ".ts-nav-container";

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
