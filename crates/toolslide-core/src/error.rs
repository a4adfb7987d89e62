//! Widget error types
//!
//! All of these surface from construction only; runtime operations are
//! permissive and treat unknown input as a no-op.

use thiserror::Error;
use toolslide_dom::NodeId;

#[derive(Error, Debug)]
pub enum ToolslideError {
    #[error("Missing required target: a CSS selector or element must be provided")]
    MissingTarget,

    #[error("Invalid target type: {0} is not an element")]
    InvalidTargetType(NodeId),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Missing {role} element ({selector}) inside the target")]
    MissingMarkup {
        role: &'static str,
        selector: &'static str,
    },

    #[error("Panel error: {0}")]
    Panel(#[from] toolslide_panels::PanelError),

    #[error("Document error: {0}")]
    Dom(#[from] toolslide_dom::DomError),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}
