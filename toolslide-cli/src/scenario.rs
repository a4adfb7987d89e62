//! Scripted scenarios
//!
//! ```json
//! {
//!   "markup": { "id": "ts", "children": [ ... ] },
//!   "options": { "autoclose": true, "autocloseDelay": 100 },
//!   "steps": [ { "click": "nav-2" }, { "advance": 100 }, "open" ]
//! }
//! ```
//!
//! Host events address elements by id. Time only moves on `advance`.

use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use toolslide_core::{
    Document, ElementSpec, EventArgs, EventKind, ManualScheduler, NodeSnapshot, Options, Position,
    Target, Toolslide, WidgetEvent,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Scenario {
    /// Subtree built under the document body
    pub markup: ElementSpec,
    /// Selector for the mount point; defaults to the markup root
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub options: Options,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Step {
    /// Click the element with this id
    Click(String),
    PointerEnter(String),
    PointerLeave(String),
    /// Move the clock forward, in milliseconds
    Advance(u64),
    Open,
    Close,
    Toggle,
    /// Select a panel by id
    Select(String),
    SelectIndex(usize),
    Position(Position),
    Width(String),
    Height(String),
    Destroy,
}

/// A notification observed while the scenario ran
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiredEvent {
    pub event: WidgetEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub open: bool,
    pub active_panel: Option<String>,
    pub position: Position,
    pub pending_auto_close: bool,
    /// Virtual time at the end of the run, in milliseconds
    pub elapsed_ms: u64,
    pub events: Vec<FiredEvent>,
    pub markup: Option<NodeSnapshot>,
}

impl Scenario {
    pub fn run(self) -> Result<Report> {
        let clock = Arc::new(ManualScheduler::new());
        let document = Document::with_scheduler(clock.clone());
        let root = document
            .build(document.body(), &self.markup)
            .context("Failed to build markup")?;

        let events = Arc::new(Mutex::new(Vec::new()));
        let options = record_events(self.options, &events);
        let target = match self.target {
            Some(selector) => Target::Selector(selector),
            None => Target::Element(root),
        };
        let widget = Toolslide::create(&document, Some(target), options)
            .context("Failed to create widget")?;

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "Running step");
            apply(&widget, &clock, step)
                .with_context(|| format!("Step {} ({:?}) failed", index, step))?;
        }

        let report = Report {
            open: widget.is_open(),
            active_panel: widget.active_panel().map(|p| p.id),
            position: widget.position(),
            pending_auto_close: widget.has_pending_auto_close(),
            elapsed_ms: clock.now().as_millis() as u64,
            events: std::mem::take(&mut *events.lock()),
            markup: document.snapshot(widget.elements().root),
        };
        Ok(report)
    }
}

fn record_events(mut options: Options, events: &Arc<Mutex<Vec<FiredEvent>>>) -> Options {
    for event in WidgetEvent::ALL {
        let events = Arc::clone(events);
        options = options.on(event, move |_, args| {
            let (previous, next) = match args {
                EventArgs::Visibility { .. } => (None, None),
                EventArgs::Toggle { previous, next } => {
                    (previous.as_ref().map(|p| p.id.clone()), Some(next.id.clone()))
                }
            };
            events.lock().push(FiredEvent {
                event,
                previous,
                next,
            });
        });
    }
    options
}

fn apply(widget: &Toolslide, clock: &ManualScheduler, step: &Step) -> Result<()> {
    let document = widget.document();
    let dispatch = |id: &str, kind: EventKind| -> Result<()> {
        let node = document
            .get_element_by_id(id)
            .ok_or_else(|| anyhow!("No element with id '{}'", id))?;
        document.dispatch(node, kind)?;
        Ok(())
    };

    match step {
        Step::Click(id) => dispatch(id.as_str(), EventKind::Click)?,
        Step::PointerEnter(id) => dispatch(id.as_str(), EventKind::PointerEnter)?,
        Step::PointerLeave(id) => dispatch(id.as_str(), EventKind::PointerLeave)?,
        Step::Advance(ms) => {
            clock.advance(Duration::from_millis(*ms));
        }
        Step::Open => widget.open(),
        Step::Close => widget.close(),
        Step::Toggle => widget.toggle(),
        Step::Select(id) => {
            if !widget.set_active_by_id(id.as_str()) {
                tracing::debug!(panel = %id, "Selection changed nothing");
            }
        }
        Step::SelectIndex(index) => {
            if !widget.set_active_by_index(*index) {
                tracing::debug!(index, "Selection changed nothing");
            }
        }
        Step::Position(position) => widget.set_position(*position),
        Step::Width(width) => widget.set_width(width),
        Step::Height(height) => widget.set_height(height),
        Step::Destroy => widget.destroy(),
    }
    Ok(())
}
