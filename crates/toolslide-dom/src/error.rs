//! Document error types

use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Invalid hierarchy: {0}")]
    Hierarchy(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}
