//! Toolslide Panel State
//!
//! Explicit state behind the widget's markers:
//! - `OpenState`: the whole widget is either open or closed
//! - `PanelSet`: ordered content panels, their correlated nav items and the
//!   single active panel
//!
//! Classes in the host document are a projection of this state, never its
//! storage.

mod error;
mod panel;
mod set;
mod state;

pub use error::PanelError;
pub use panel::{Panel, PanelRef};
pub use set::{Activation, PanelSet};
pub use state::OpenState;

pub type Result<T> = std::result::Result<T, PanelError>;

/// Attribute on a nav item naming the id of its content panel
pub const TARGET_ATTRIBUTE: &str = "ts-target";
