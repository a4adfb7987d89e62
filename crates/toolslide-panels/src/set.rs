//! Panel Set
//!
//! Ordered content panels with their nav correlation and the single active
//! panel. Selection is split into `plan` (pure, decides whether anything
//! changes) and `commit` so the caller can notify listeners in between.

use std::collections::HashSet;

use toolslide_dom::{Document, NodeId};

use crate::error::PanelError;
use crate::panel::{Panel, PanelRef};
use crate::{Result, TARGET_ATTRIBUTE};

/// A pending switch of the active panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub previous: Option<Panel>,
    pub next: Panel,
}

#[derive(Debug, Clone, Default)]
pub struct PanelSet {
    /// Content panels in document order
    panels: Vec<Panel>,
    /// Id of the active panel, `None` until the first selection
    active: Option<String>,
}

impl PanelSet {
    pub fn new(panels: Vec<Panel>) -> Result<Self> {
        let mut seen = HashSet::new();
        for panel in &panels {
            if !seen.insert(panel.id.as_str()) {
                return Err(PanelError::DuplicateId(panel.id.clone()));
            }
        }

        Ok(Self {
            panels,
            active: None,
        })
    }

    /// Read panels from the children of `content` and correlate them with
    /// the children of `nav` through their target attribute.
    pub fn from_document(document: &Document, content: NodeId, nav: NodeId) -> Result<Self> {
        let nav_items = document.children(nav);
        let mut panels = Vec::new();

        for (index, element) in document.children(content).into_iter().enumerate() {
            let id = document
                .id(element)
                .filter(|id| !id.is_empty())
                .ok_or(PanelError::MissingId { index })?;

            let nav_item = nav_items.iter().copied().find(|item| {
                document.attribute(*item, TARGET_ATTRIBUTE).as_deref() == Some(id.as_str())
            });
            if nav_item.is_none() {
                tracing::warn!(panel = %id, "Content panel has no nav item");
            }

            panels.push(Panel {
                id,
                element,
                nav_item,
            });
        }

        Self::new(panels)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Panel> {
        self.panels.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.panels.iter().map(|p| p.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn by_index(&self, index: usize) -> Option<&Panel> {
        self.panels.get(index)
    }

    /// Panel whose content element or nav item is `node`
    pub fn by_node(&self, node: NodeId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.owns(node))
    }

    /// Resolve a selection request. Elements resolve through their content
    /// element only, matching selection by the element's id.
    pub fn resolve(&self, panel: &PanelRef) -> Option<&Panel> {
        match panel {
            PanelRef::Id(id) => self.get(id),
            PanelRef::Element(node) => self.panels.iter().find(|p| p.element == *node),
        }
    }

    pub fn active(&self) -> Option<&Panel> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Active check that also accepts a panel's nav item
    pub fn is_active(&self, panel: &PanelRef) -> bool {
        let Some(active) = self.active.as_deref() else {
            return false;
        };
        match panel {
            PanelRef::Id(id) => id == active,
            PanelRef::Element(node) => self.by_node(*node).is_some_and(|p| p.id == active),
        }
    }

    /// Decide what selecting `panel` would change. `None` when the request
    /// names no known panel or the panel is already active.
    pub fn plan(&self, panel: &PanelRef) -> Option<Activation> {
        let next = self.resolve(panel)?;
        if self.active.as_deref() == Some(next.id.as_str()) {
            return None;
        }

        Some(Activation {
            previous: self.active().cloned(),
            next: next.clone(),
        })
    }

    pub fn commit(&mut self, activation: &Activation) {
        tracing::debug!(
            from = activation.previous.as_ref().map(|p| p.id.as_str()).unwrap_or("-"),
            to = %activation.next.id,
            "Active panel transition"
        );
        self.active = Some(activation.next.id.clone());
    }
}
