//! Declarative markup and snapshots
//!
//! `ElementSpec` describes a subtree to build (from code or JSON);
//! `NodeSnapshot` captures the classes and inline styles of a subtree after
//! the widget has projected its state onto it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_tag() -> String {
    "div".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementSpec {
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Space separated class names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Rendered width reported by the host, in pixels
    #[serde(default)]
    pub client_width: u32,
    /// Rendered height reported by the host, in pixels
    #[serde(default)]
    pub client_height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: None,
            attributes: BTreeMap::new(),
            client_width: 0,
            client_height: 0,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn div() -> Self {
        Self::new(default_tag())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_client_size(mut self, width: u32, height: u32) -> Self {
        self.client_width = width;
        self.client_height = height;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = ElementSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self::div()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSnapshot {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// Direct text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// First snapshot in this subtree (inclusive) carrying `id`
    pub fn find(&self, id: &str) -> Option<&NodeSnapshot> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_json() {
        let spec: ElementSpec = serde_json::from_str(
            r#"{
                "id": "toolslide",
                "children": [
                    { "class": "ts-nav-container", "clientWidth": 40 },
                    { "tag": "span", "attributes": { "ts-target": "panel-1" } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.tag, "div");
        assert_eq!(spec.id.as_deref(), Some("toolslide"));
        assert_eq!(spec.children[0].client_width, 40);
        assert_eq!(spec.children[1].tag, "span");
        assert_eq!(
            spec.children[1].attributes.get("ts-target").map(String::as_str),
            Some("panel-1")
        );
    }

    #[test]
    fn test_spec_rejects_unknown_fields() {
        let result = serde_json::from_str::<ElementSpec>(r#"{ "klass": "x" }"#);
        assert!(result.is_err());
    }
}
