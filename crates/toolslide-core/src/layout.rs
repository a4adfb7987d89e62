//! Layout
//!
//! Position marker, size styles and transition wiring on the host markup.

use toolslide_dom::{Document, NodeId};

use crate::animation::Animation;
use crate::config::Position;
use crate::widget::Toolslide;

/// Prefixes for the vendor-specific spellings of a style property
const VENDOR_PREFIXES: [&str; 4] = ["webkit", "Moz", "ms", "O"];

impl Toolslide {
    /// Dock the widget to `position`, replacing the previous position marker
    /// and re-applying the current width and height for the new axis.
    pub fn set_position(&self, position: Position) {
        let container = self.inner.elements.container;

        self.apply_position(position);
        let (width, height) = {
            let mut config = self.inner.config.write();
            config.position = position;
            (config.width.clone(), config.height.clone())
        };

        let document = &self.inner.document;
        document.remove_style(container, "width");
        document.remove_style(container, "height");
        self.set_width(&width);
        self.set_height(&height);

        tracing::debug!(%position, "Position changed");
    }

    pub(crate) fn apply_position(&self, position: Position) {
        let document = &self.inner.document;
        let root = self.inner.elements.root;

        for other in Position::ALL.iter().filter(|p| **p != position) {
            document.remove_class(root, &other.class_name());
        }
        document.add_class(root, &position.class_name());
    }

    /// Set the root width. Docked left or right, the container fills what
    /// the nav strip leaves.
    pub fn set_width(&self, width: &str) {
        let document = &self.inner.document;
        let elements = self.inner.elements;

        let position = {
            let mut config = self.inner.config.write();
            config.width = width.to_string();
            config.position
        };

        document.set_style(elements.root, "width", width);
        if position.nav_consumes_width() {
            let nav = document.client_width(elements.nav);
            document.set_style(elements.container, "width", &fill_remaining(nav));
        }
    }

    /// Set the root height. Docked top or bottom, the container fills what
    /// the nav strip leaves.
    pub fn set_height(&self, height: &str) {
        let document = &self.inner.document;
        let elements = self.inner.elements;

        let position = {
            let mut config = self.inner.config.write();
            config.height = height.to_string();
            config.position
        };

        document.set_style(elements.root, "height", height);
        if position.nav_consumes_height() {
            let nav = document.client_height(elements.nav);
            document.set_style(elements.container, "height", &fill_remaining(nav));
        }
    }

    pub(crate) fn apply_animations(&self) {
        let document = &self.inner.document;
        let elements = self.inner.elements;
        let animations = self.inner.config.read().animations.clone();

        if let Some(spec) = animations.replace.as_deref() {
            match Animation::parse(spec) {
                Ok(animation) => {
                    let transition = animation.transition();
                    for panel in document.children(elements.content) {
                        set_vendor_style(document, panel, "transition", &transition);
                        document.add_class(panel, animation.kind.class_name());
                    }
                }
                Err(e) => tracing::warn!(spec, error = %e, "Ignoring replace animation"),
            }
        }

        if let Some(spec) = animations.toggle.as_deref() {
            match Animation::parse(spec) {
                Ok(animation) => {
                    set_vendor_style(document, elements.root, "transition", &animation.transition())
                }
                Err(e) => tracing::warn!(spec, error = %e, "Ignoring toggle animation"),
            }
        }
    }
}

fn fill_remaining(nav_size: u32) -> String {
    format!("calc(100% - {}px)", nav_size)
}

/// Set `property` plus its vendor-prefixed spellings, e.g. `transition`,
/// `webkitTransition`, `MozTransition`.
fn set_vendor_style(document: &Document, node: NodeId, property: &str, value: &str) {
    document.set_style(node, property, value);

    let mut chars = property.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let capitalized: String = first.to_uppercase().chain(chars).collect();

    for prefix in VENDOR_PREFIXES {
        document.set_style(node, &format!("{}{}", prefix, capitalized), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;
    use toolslide_dom::ElementSpec;

    fn mount(options: Options) -> Toolslide {
        let spec = ElementSpec::div().with_id("ts").with_children([
            ElementSpec::div()
                .with_class("ts-nav-container")
                .with_client_size(40, 30)
                .with_child(ElementSpec::div().with_attribute("ts-target", "a")),
            ElementSpec::div().with_class("ts-container").with_child(
                ElementSpec::div().with_class("ts-content-container").with_children([
                    ElementSpec::div().with_id("a"),
                    ElementSpec::div().with_id("b"),
                ]),
            ),
        ]);
        let document = Document::from_spec(&spec).unwrap();
        Toolslide::mount(&document, "#ts", options).unwrap()
    }

    #[test]
    fn test_vendor_style() {
        let document = Document::new();
        let node = document.create_element("div");
        set_vendor_style(&document, node, "transition", "opacity 1s");

        for property in [
            "transition",
            "webkitTransition",
            "MozTransition",
            "msTransition",
            "OTransition",
        ] {
            assert_eq!(document.style(node, property).as_deref(), Some("opacity 1s"));
        }
    }

    #[test]
    fn test_default_sizes() {
        let widget = mount(Options::default());
        let document = widget.document();
        let elements = widget.elements();

        assert_eq!(document.style(elements.root, "width").as_deref(), Some("25%"));
        assert_eq!(document.style(elements.root, "height").as_deref(), Some("100%"));
        assert_eq!(
            document.style(elements.container, "width").as_deref(),
            Some("calc(100% - 40px)")
        );
        assert!(document.style(elements.container, "height").is_none());
    }

    #[test]
    fn test_position_swaps_axis() {
        let widget = mount(Options::default());
        let document = widget.document();
        let elements = widget.elements();

        widget.set_position(Position::Top);
        widget.set_position(Position::Bottom);

        let markers: Vec<String> = document
            .classes(elements.root)
            .into_iter()
            .filter(|c| c.starts_with("ts-"))
            .collect();
        assert_eq!(markers, vec!["ts-bottom"]);
        assert_eq!(widget.position(), Position::Bottom);
        assert!(document.style(elements.container, "width").is_none());
        assert_eq!(
            document.style(elements.container, "height").as_deref(),
            Some("calc(100% - 30px)")
        );
    }

    #[test]
    fn test_setters_update_config() {
        let widget = mount(Options::new().with_position(Position::Right));
        widget.set_width("300px");
        widget.set_height("50%");

        let config = widget.config();
        assert_eq!(config.width, "300px");
        assert_eq!(config.height, "50%");
        assert_eq!(
            widget.document().style(widget.elements().root, "width").as_deref(),
            Some("300px")
        );
    }

    #[test]
    fn test_animations() {
        let widget = mount(
            Options::new()
                .with_replace_animation("slidefade 1s ease-in")
                .with_toggle_animation("wobble 1s"),
        );
        let document = widget.document();
        let elements = widget.elements();

        for panel in document.children(elements.content) {
            assert!(document.has_class(panel, "slidefade"));
            assert_eq!(
                document.style(panel, "transition").as_deref(),
                Some("opacity 1s ease-in, transform 1s ease-in")
            );
        }
        // Unknown toggle animation is skipped
        assert!(document.style(elements.root, "transition").is_none());
    }
}
