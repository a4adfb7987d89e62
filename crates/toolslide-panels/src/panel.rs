//! Content panel data structure

use serde::{Deserialize, Serialize};
use toolslide_dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Unique id of the content element
    pub id: String,
    /// The content element itself
    pub element: NodeId,
    /// First nav item whose target attribute names this panel
    pub nav_item: Option<NodeId>,
}

impl Panel {
    /// Whether `node` is this panel's content element or its nav item
    pub fn owns(&self, node: NodeId) -> bool {
        self.element == node || self.nav_item == Some(node)
    }
}

/// Ways a caller can name a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelRef {
    Id(String),
    Element(NodeId),
}

impl From<&str> for PanelRef {
    fn from(id: &str) -> Self {
        PanelRef::Id(id.to_string())
    }
}

impl From<String> for PanelRef {
    fn from(id: String) -> Self {
        PanelRef::Id(id)
    }
}

impl From<&String> for PanelRef {
    fn from(id: &String) -> Self {
        PanelRef::Id(id.clone())
    }
}

impl From<NodeId> for PanelRef {
    fn from(node: NodeId) -> Self {
        PanelRef::Element(node)
    }
}
