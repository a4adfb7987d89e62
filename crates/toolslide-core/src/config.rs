//! Widget configuration
//!
//! `Options` is what the caller supplies (every field optional, loadable
//! from camelCase JSON); `Config` is the fully resolved value the widget runs
//! with. Defaults are built fresh on every resolution, so no two widgets
//! share mutable configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use toolslide_dom::NodeId;

use crate::listeners::{EventArgs, Listeners, WidgetEvent};
use crate::widget::Toolslide;
use crate::Result;

/// Edge the widget is docked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Left,
        Position::Right,
        Position::Top,
        Position::Bottom,
    ];

    /// Left/right docking: the nav strip eats into the width
    pub fn nav_consumes_width(&self) -> bool {
        matches!(self, Position::Left | Position::Right)
    }

    /// Top/bottom docking: the nav strip eats into the height
    pub fn nav_consumes_height(&self) -> bool {
        matches!(self, Position::Top | Position::Bottom)
    }

    /// Marker class on the widget root, e.g. `ts-left`
    pub fn class_name(&self) -> String {
        format!("ts-{}", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Right => "right",
            Position::Top => "top",
            Position::Bottom => "bottom",
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Position::Left),
            "right" => Ok(Position::Right),
            "top" => Ok(Position::Top),
            "bottom" => Ok(Position::Bottom),
            _ => Err(format!("Unknown position: {}", s)),
        }
    }
}

/// Where to mount the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// CSS selector resolved against the whole document
    Selector(String),
    /// An existing node
    Element(NodeId),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<NodeId> for Target {
    fn from(node: NodeId) -> Self {
        Target::Element(node)
    }
}

/// Caller-supplied animation overrides. An empty string disables that
/// animation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimationOptions {
    #[serde(default)]
    pub replace: Option<String>,
    #[serde(default)]
    pub toggle: Option<String>,
}

/// Caller-supplied configuration; unset fields fall back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Options {
    pub position: Option<Position>,
    pub height: Option<String>,
    pub width: Option<String>,
    pub start_open: Option<bool>,
    pub closeable: Option<bool>,
    pub autoclose: Option<bool>,
    /// Milliseconds
    pub autoclose_delay: Option<u64>,
    pub click_outside_to_close: Option<bool>,
    pub animations: Option<AnimationOptions>,
    pub active_panel: Option<String>,
    #[serde(skip)]
    pub listeners: Listeners,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_height(mut self, height: impl Into<String>) -> Self {
        self.height = Some(height.into());
        self
    }

    pub fn with_width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn with_start_open(mut self, start_open: bool) -> Self {
        self.start_open = Some(start_open);
        self
    }

    pub fn with_closeable(mut self, closeable: bool) -> Self {
        self.closeable = Some(closeable);
        self
    }

    /// Enable auto-close after `delay` of pointer inactivity
    pub fn with_autoclose(mut self, delay: Duration) -> Self {
        self.autoclose = Some(true);
        self.autoclose_delay = Some(delay.as_millis() as u64);
        self
    }

    pub fn with_click_outside_to_close(mut self, enabled: bool) -> Self {
        self.click_outside_to_close = Some(enabled);
        self
    }

    pub fn with_replace_animation(mut self, spec: impl Into<String>) -> Self {
        self.animations.get_or_insert_with(Default::default).replace = Some(spec.into());
        self
    }

    pub fn with_toggle_animation(mut self, spec: impl Into<String>) -> Self {
        self.animations.get_or_insert_with(Default::default).toggle = Some(spec.into());
        self
    }

    pub fn with_active_panel(mut self, id: impl Into<String>) -> Self {
        self.active_panel = Some(id.into());
        self
    }

    pub fn on<F>(mut self, event: WidgetEvent, listener: F) -> Self
    where
        F: Fn(&Toolslide, &EventArgs) + Send + Sync + 'static,
    {
        self.listeners.on(event, listener);
        self
    }
}

/// Resolved animation specs; `None` means no transition is wired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Animations {
    pub replace: Option<String>,
    pub toggle: Option<String>,
}

impl Default for Animations {
    fn default() -> Self {
        Self {
            replace: Some("crossfade 0.5s ease-in-out".to_string()),
            toggle: Some("slide 0.5s ease".to_string()),
        }
    }
}

impl Animations {
    fn overlay(mut self, options: AnimationOptions) -> Self {
        if let Some(replace) = options.replace {
            self.replace = non_empty(replace);
        }
        if let Some(toggle) = options.toggle {
            self.toggle = non_empty(toggle);
        }
        self
    }
}

fn non_empty(spec: String) -> Option<String> {
    if spec.trim().is_empty() {
        None
    } else {
        Some(spec)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub position: Position,
    pub height: String,
    pub width: String,
    pub start_open: bool,
    /// Clicking the active panel's nav item closes the widget
    pub closeable: bool,
    pub autoclose: bool,
    /// Milliseconds
    pub autoclose_delay: u64,
    pub click_outside_to_close: bool,
    pub animations: Animations,
    pub active_panel: Option<String>,
    #[serde(skip)]
    pub listeners: Listeners,
}

impl Config {
    /// Overlay `options` onto the defaults
    pub fn resolve(options: Options) -> Self {
        let defaults = Self::default();

        Self {
            position: options.position.unwrap_or(defaults.position),
            height: options.height.unwrap_or(defaults.height),
            width: options.width.unwrap_or(defaults.width),
            start_open: options.start_open.unwrap_or(defaults.start_open),
            closeable: options.closeable.unwrap_or(defaults.closeable),
            autoclose: options.autoclose.unwrap_or(defaults.autoclose),
            autoclose_delay: options.autoclose_delay.unwrap_or(defaults.autoclose_delay),
            click_outside_to_close: options
                .click_outside_to_close
                .unwrap_or(defaults.click_outside_to_close),
            animations: match options.animations {
                Some(overrides) => defaults.animations.overlay(overrides),
                None => defaults.animations,
            },
            active_panel: options.active_panel.filter(|id| !id.is_empty()),
            listeners: options.listeners,
        }
    }

    pub fn autoclose_duration(&self) -> Duration {
        Duration::from_millis(self.autoclose_delay)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            position: Position::Left,
            height: "100%".to_string(),
            width: "25%".to_string(),
            start_open: true,
            closeable: true,
            autoclose: false,
            autoclose_delay: 5000,
            click_outside_to_close: true,
            animations: Animations::default(),
            active_panel: None,
            listeners: Listeners::default(),
        }
    }
}
