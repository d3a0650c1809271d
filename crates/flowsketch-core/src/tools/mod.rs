//! Drawing tools and draft shape construction.

use crate::shapes::{
    Arrow, Circle, Ellipse, Line, Rectangle, Shape, ShapeStyle, Text, Triangle,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Rectangle,
    Ellipse,
    Triangle,
    Line,
    Arrow,
    Circle,
    Cursor,
    Eraser,
    Text,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Rectangle => "rectangle",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Triangle => "triangle",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Circle => "circle",
            ToolKind::Cursor => "cursor",
            ToolKind::Eraser => "eraser",
            ToolKind::Text => "text",
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// Tool is actively being used (drawing or erasing).
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Current point of the interaction.
        current: Point,
        /// Draft shape being drawn (None while erasing).
        preview: Option<Shape>,
    },
}

/// Manages the current tool and its state.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
    /// Style applied to new shapes; None keeps the per-kind defaults.
    pub current_style: Option<ShapeStyle>,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any interaction in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Begin a tool interaction with a zero-extent draft.
    pub fn begin(&mut self, point: Point) {
        self.state = ToolState::Active {
            start: point,
            current: point,
            preview: self.create_shape(point, point),
        };
    }

    /// Update the current interaction.
    pub fn update(&mut self, point: Point) {
        let shape = match &self.state {
            ToolState::Active { start, .. } => self.create_shape(*start, point),
            ToolState::Idle => return,
        };
        if let ToolState::Active {
            current, preview, ..
        } = &mut self.state
        {
            *current = point;
            *preview = shape;
        }
    }

    /// End the current interaction and return the finished draft, clamped to the minimum size.
    pub fn finish(&mut self) -> Option<Shape> {
        match std::mem::take(&mut self.state) {
            ToolState::Active {
                preview: Some(mut shape),
                ..
            } => {
                shape.clamp_to_min_size();
                Some(shape)
            }
            _ => None,
        }
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the draft shape for the current interaction.
    pub fn preview_shape(&self) -> Option<&Shape> {
        match &self.state {
            ToolState::Active { preview, .. } => preview.as_ref(),
            ToolState::Idle => None,
        }
    }

    /// Create a committed text shape at `anchor`.
    pub fn create_text(&self, anchor: Point, content: String) -> Shape {
        let mut text = Text::new(anchor, content);
        if let Some(style) = &self.current_style {
            text.style = style.clone();
        }
        Shape::Text(text)
    }

    /// Build the draft for a drag from `start` to `end`.
    fn create_shape(&self, start: Point, end: Point) -> Option<Shape> {
        let mut shape: Shape = match self.current_tool {
            ToolKind::Rectangle => Rectangle::new(start, end.x - start.x, end.y - start.y).into(),
            ToolKind::Ellipse => {
                Ellipse::new(start, (end.x - start.x).abs(), (end.y - start.y).abs()).into()
            }
            ToolKind::Circle => Circle::new(start, (end - start).hypot()).into(),
            ToolKind::Triangle => Triangle::new(start, end).into(),
            ToolKind::Line => Line::new(start, end).into(),
            ToolKind::Arrow => Arrow::new(start, end).into(),
            ToolKind::Cursor | ToolKind::Eraser | ToolKind::Text => return None,
        };

        if let Some(style) = &self.current_style {
            *shape.style_mut() = style.clone();
            if let Shape::Arrow(arrow) = &mut shape {
                arrow.head_length = Arrow::head_length_for(style.stroke_width);
            }
        }

        Some(shape)
    }
}
