//! Canvas document and the pointer-driven editor state machine.

use crate::input::{InputEvent, KeyEvent, PointerEvent};
use crate::selection::{DragSession, hit_test_handles};
use crate::shapes::{Shape, ShapeStyle};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Size factor applied per wheel step when growing the selected shape.
pub const WHEEL_GROW: f64 = 1.05;
/// Size factor applied per wheel step when shrinking the selected shape.
pub const WHEEL_SHRINK: f64 = 0.95;

/// An ordered shape list. Insertion order is z-order: later shapes are drawn on top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasDocument {
    shapes: Vec<Shape>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `shapes` in back-to-front order.
    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        Self { shapes }
    }

    /// Add a shape on top of all others.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Remove the shape at `index`.
    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Remove all shapes.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// All shapes, back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Index of the topmost shape hit at `point`.
    pub fn shape_at_point(&self, point: Point) -> Option<usize> {
        self.shapes.iter().rposition(|shape| shape.hit_test(point))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Take the shapes out of the document.
    pub fn into_shapes(self) -> Vec<Shape> {
        self.shapes
    }
}

/// What the pointer is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    Idle,
    Drawing,
    Moving,
    Resizing,
}

/// Result of feeding an event to the [`Editor`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorOutcome {
    /// Nothing visible changed.
    Unchanged,
    /// The shape list, selection or draft changed and the surface should be redrawn.
    Redraw,
    /// The text tool was pressed at this point; the shell should collect a string and
    /// pass it to [`Editor::commit_text`].
    TextInput(Point),
}

impl EditorOutcome {
    pub fn needs_redraw(&self) -> bool {
        matches!(self, EditorOutcome::Redraw)
    }
}

/// Owns the shape list, the selection, the active tool and any in-flight drag.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    document: CanvasDocument,
    selection: Option<usize>,
    mode: EditorMode,
    tools: ToolManager,
    session: Option<DragSession>,
}

impl Editor {
    /// Create an editor with an empty document and the default tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor over an existing document.
    pub fn with_document(document: CanvasDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn shapes(&self) -> &[Shape] {
        self.document.shapes()
    }

    /// Index of the selected shape. Always a valid index when present.
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.and_then(|i| self.document.get(i))
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    /// Shape being drawn, if any.
    pub fn draft(&self) -> Option<&Shape> {
        self.tools.preview_shape()
    }

    /// Active move/resize drag, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Switch tools. Resets the mode, draft and selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("Tool changed to {}", tool.name());
        self.tools.set_tool(tool);
        self.mode = EditorMode::Idle;
        self.session = None;
        self.selection = None;
    }

    /// Style for shapes created from now on; None restores the per-kind defaults.
    pub fn set_current_style(&mut self, style: Option<ShapeStyle>) {
        self.tools.current_style = style;
    }

    /// Single dispatch entry point for pointer and keyboard input.
    pub fn handle(&mut self, event: impl Into<InputEvent>) -> EditorOutcome {
        match event.into() {
            InputEvent::Pointer(PointerEvent::Down { position }) => self.pointer_down(position),
            InputEvent::Pointer(PointerEvent::Move { position }) => self.pointer_move(position),
            InputEvent::Pointer(PointerEvent::Up { .. }) => self.pointer_up(),
            InputEvent::Pointer(PointerEvent::Leave) => self.pointer_leave(),
            InputEvent::Pointer(PointerEvent::Scroll { delta, .. }) => self.scroll(delta),
            InputEvent::Key(key) => self.key(&key),
        }
    }

    /// Handle a primary-button press at `point`.
    pub fn pointer_down(&mut self, point: Point) -> EditorOutcome {
        let tool = self.tools.current_tool;
        if tool == ToolKind::Text {
            return EditorOutcome::TextInput(point);
        }

        let handle_hit = self.selection.and_then(|index| {
            let shape = self.document.get(index)?;
            hit_test_handles(shape, point).map(|handle| (index, handle, shape.clone()))
        });
        if let Some((index, handle, snapshot)) = handle_hit {
            log::debug!("Resizing shape {index} via handle {}", handle.id());
            self.session = Some(DragSession::new(index, Some(handle), point, snapshot));
            self.mode = EditorMode::Resizing;
            return EditorOutcome::Unchanged;
        }

        let shape_hit = self
            .document
            .shape_at_point(point)
            .and_then(|index| self.document.get(index).map(|shape| (index, shape.clone())));
        if let Some((index, snapshot)) = shape_hit {
            self.session = Some(DragSession::new(index, None, point, snapshot));
            self.selection = Some(index);
            self.mode = EditorMode::Moving;
            return EditorOutcome::Redraw;
        }

        self.selection = None;
        if tool == ToolKind::Cursor {
            self.mode = EditorMode::Idle;
        } else {
            self.tools.begin(point);
            self.mode = EditorMode::Drawing;
        }
        EditorOutcome::Redraw
    }

    /// Handle pointer motion to `point`.
    pub fn pointer_move(&mut self, point: Point) -> EditorOutcome {
        match self.mode {
            EditorMode::Drawing if self.tools.current_tool == ToolKind::Eraser => {
                match self.document.shape_at_point(point) {
                    Some(index) => {
                        self.remove_at(index);
                        EditorOutcome::Redraw
                    }
                    None => EditorOutcome::Unchanged,
                }
            }
            EditorMode::Drawing => {
                if self.tools.preview_shape().is_none() {
                    return EditorOutcome::Unchanged;
                }
                self.tools.update(point);
                EditorOutcome::Redraw
            }
            EditorMode::Moving | EditorMode::Resizing => {
                let Some(session) = self.session.as_mut() else {
                    return EditorOutcome::Unchanged;
                };
                session.current_point = point;
                let updated = session.apply();
                match self.document.get_mut(session.index) {
                    Some(shape) => {
                        *shape = updated;
                        EditorOutcome::Redraw
                    }
                    None => EditorOutcome::Unchanged,
                }
            }
            EditorMode::Idle => EditorOutcome::Unchanged,
        }
    }

    /// Handle a primary-button release.
    pub fn pointer_up(&mut self) -> EditorOutcome {
        let outcome = match self.mode {
            EditorMode::Drawing => {
                if let Some(shape) = self.tools.finish() {
                    log::debug!("Created {} shape", shape.kind().name());
                    self.document.add_shape(shape);
                }
                EditorOutcome::Redraw
            }
            EditorMode::Moving | EditorMode::Resizing => {
                self.session = None;
                EditorOutcome::Unchanged
            }
            EditorMode::Idle => EditorOutcome::Unchanged,
        };
        self.mode = EditorMode::Idle;
        outcome
    }

    /// Handle the pointer leaving the surface. An unfinished draft is discarded.
    pub fn pointer_leave(&mut self) -> EditorOutcome {
        if self.mode != EditorMode::Drawing {
            return EditorOutcome::Unchanged;
        }
        self.tools.cancel();
        self.mode = EditorMode::Idle;
        EditorOutcome::Redraw
    }

    /// Grow (`delta.y < 0`) or shrink the selected shape.
    pub fn scroll(&mut self, delta: Vec2) -> EditorOutcome {
        let Some(shape) = self.selection.and_then(|i| self.document.get_mut(i)) else {
            return EditorOutcome::Unchanged;
        };
        let factor = if delta.y < 0.0 { WHEEL_GROW } else { WHEEL_SHRINK };
        if shape.scale_size(factor) {
            EditorOutcome::Redraw
        } else {
            EditorOutcome::Unchanged
        }
    }

    /// Handle a keyboard event.
    pub fn key(&mut self, event: &KeyEvent) -> EditorOutcome {
        if event.is_delete() && self.delete_selected() {
            EditorOutcome::Redraw
        } else {
            EditorOutcome::Unchanged
        }
    }

    /// Remove the selected shape. Returns whether anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(index) = self.selection else {
            return false;
        };
        self.session = None;
        self.mode = EditorMode::Idle;
        self.remove_at(index);
        true
    }

    /// Append a text shape at `anchor` unless `content` is blank.
    pub fn commit_text(&mut self, anchor: Point, content: &str) -> EditorOutcome {
        let content = content.trim();
        if content.is_empty() {
            return EditorOutcome::Unchanged;
        }
        let text = self.tools.create_text(anchor, content.to_string());
        self.document.add_shape(text);
        EditorOutcome::Redraw
    }

    /// Remove all shapes and reset the interaction state.
    pub fn clear(&mut self) {
        self.replace_shapes(Vec::new());
    }

    /// Replace the whole shape list (used by import) and reset the interaction state.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) {
        self.document = CanvasDocument::with_shapes(shapes);
        self.selection = None;
        self.session = None;
        self.tools.cancel();
        self.mode = EditorMode::Idle;
    }

    /// Remove the shape at `index`, keeping the selection pointing at the same shape.
    fn remove_at(&mut self, index: usize) {
        if self.document.remove_shape(index).is_none() {
            return;
        }
        self.selection = match self.selection {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
    }
}
