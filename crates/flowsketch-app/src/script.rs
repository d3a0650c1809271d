//! Replayable editing scripts.
//!
//! A script is a JSON array of steps, for example:
//! ```json
//! [
//!   { "action": "tool", "tool": "rectangle" },
//!   { "action": "drag", "from": {"x": 10, "y": 10}, "to": {"x": 120, "y": 80} },
//!   { "action": "tool", "tool": "text" },
//!   { "action": "input", "event": {"type": "down", "position": {"x": 30, "y": 50}} },
//!   { "action": "text", "text": "Start" }
//! ]
//! ```

use flowsketch_core::color::{SerializableColor, parse_fill};
use flowsketch_core::input::InputEvent;
use flowsketch_core::shapes::ShapeStyle;
use flowsketch_core::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One step of an editing script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Switch tools.
    Tool { tool: ToolKind },
    /// Deliver a raw pointer or key event.
    Input { event: InputEvent },
    /// Press at `from`, move to `to`, release.
    Drag { from: Point, to: Point },
    /// Answer the pending text prompt opened by a text-tool press.
    Text { text: String },
    /// Set the style used for new shapes. Omitted fields keep their defaults.
    Style {
        #[serde(default)]
        stroke_color: Option<String>,
        #[serde(default)]
        stroke_width: Option<f64>,
        #[serde(default)]
        fill_color: Option<String>,
    },
    /// Remove every shape.
    Clear,
}

impl ScriptStep {
    /// Shape style described by a `Style` step.
    pub fn style(&self) -> Option<ShapeStyle> {
        let ScriptStep::Style {
            stroke_color,
            stroke_width,
            fill_color,
        } = self
        else {
            return None;
        };
        let mut style = ShapeStyle::default();
        if let Some(color) = stroke_color {
            style.stroke_color = SerializableColor::resolve(color);
        }
        if let Some(width) = stroke_width {
            style.stroke_width = *width;
        }
        if let Some(fill) = fill_color {
            style.fill_color = parse_fill(fill);
        }
        Some(style)
    }
}

/// Parse a script from JSON text.
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>, serde_json::Error> {
    serde_json::from_str(json)
}
