//! Immediate-mode surface abstraction and the editor renderer built on it.

use crate::renderer::{RenderContext, Renderer};
use flowsketch_core::canvas::EditorMode;
use flowsketch_core::color::SerializableColor;
use flowsketch_core::selection::{HANDLE_RADIUS, get_handles};
use flowsketch_core::shapes::Shape;
use kurbo::{BezPath, Circle, Point, Rect, Shape as KurboShape};
use peniko::Color;

/// Alpha applied to the selected shape.
const SELECTED_ALPHA: f64 = 0.7;
/// Dash pattern of the shape being drawn.
const DRAFT_DASH: [f64; 2] = [5.0, 5.0];
/// Dash pattern of the selection box.
const SELECTION_DASH: [f64; 2] = [6.0, 4.0];
/// Stroke width of the selection box.
const SELECTION_STROKE_WIDTH: f64 = 1.5;

/// A 2D drawing target modeled after the canvas 2D API.
pub trait Surface {
    /// Push the current alpha and dash state.
    fn save(&mut self);
    /// Pop the state pushed by the matching [`Surface::save`].
    fn restore(&mut self);
    /// Set the global alpha for subsequent drawing.
    fn set_alpha(&mut self, alpha: f64);
    /// Set the dash pattern for subsequent strokes; empty means solid.
    fn set_dash(&mut self, dash: &[f64]);
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);
    fn fill_path(&mut self, path: &BezPath, color: Color);
    /// Draw `text` with `origin` as the left end of its baseline.
    fn fill_text(&mut self, text: &str, origin: Point, size: f64, family: &str, color: Color);
}

/// Drawing state captured with every recorded command.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub alpha: f64,
    pub dash: Vec<f64>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            dash: Vec::new(),
        }
    }
}

/// A recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke {
        path: BezPath,
        color: SerializableColor,
        width: f64,
        state: DrawState,
    },
    Fill {
        path: BezPath,
        color: SerializableColor,
        state: DrawState,
    },
    Text {
        content: String,
        origin: Point,
        size: f64,
        family: String,
        color: SerializableColor,
        state: DrawState,
    },
}

impl DrawCommand {
    pub fn state(&self) -> &DrawState {
        match self {
            DrawCommand::Stroke { state, .. }
            | DrawCommand::Fill { state, .. }
            | DrawCommand::Text { state, .. } => state,
        }
    }
}

/// A [`Surface`] that records commands instead of rasterizing them.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands and reset the drawing state.
    pub fn reset(&mut self) {
        self.commands.clear();
        self.state = DrawState::default();
        self.stack.clear();
    }
}

impl Surface for DisplayList {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(state) => self.state = state,
            None => log::debug!("Unbalanced restore on display list"),
        }
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_dash(&mut self, dash: &[f64]) {
        self.state.dash = dash.to_vec();
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color: color.into(),
            width,
            state: self.state.clone(),
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color: color.into(),
            state: self.state.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, size: f64, family: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            content: text.to_string(),
            origin,
            size,
            family: family.to_string(),
            color: color.into(),
            state: self.state.clone(),
        });
    }
}

/// Renders an editor frame onto a [`Surface`].
pub struct SurfaceRenderer<S: Surface> {
    surface: S,
}

impl<S: Surface> SurfaceRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Render a single shape with its own style.
    pub fn render_shape(&mut self, shape: &Shape) {
        if let Shape::Text(text) = shape {
            self.surface.fill_text(
                &text.content,
                text.position,
                text.font_size,
                &text.font_family,
                text.color().into(),
            );
            return;
        }

        let style = shape.style();
        let path = shape.to_path();
        let closed = matches!(
            shape,
            Shape::Rectangle(_) | Shape::Circle(_) | Shape::Ellipse(_) | Shape::Triangle(_)
        );
        if let Some(fill) = style.fill().filter(|_| closed) {
            self.surface.fill_path(&path, fill);
        }
        self.surface
            .stroke_path(&path, style.stroke(), style.stroke_width);

        if let Shape::Arrow(arrow) = shape {
            for head in [arrow.start_head(), arrow.end_head()].into_iter().flatten() {
                self.surface.fill_path(&head_path(head), style.stroke());
            }
        }
    }

    /// Draw the dashed bounding box and handle markers of `shape`.
    fn render_selection(&mut self, shape: &Shape, ctx: &RenderContext) {
        self.surface.save();
        self.surface.set_dash(&SELECTION_DASH);
        self.surface.stroke_path(
            &shape.bounds().to_path(0.1),
            ctx.selection_color,
            SELECTION_STROKE_WIDTH,
        );
        self.surface.restore();

        for handle in get_handles(shape) {
            let marker = Circle::new(handle.position, HANDLE_RADIUS).to_path(0.1);
            self.surface.fill_path(&marker, ctx.handle_color);
        }
    }
}

impl<S: Surface> Renderer for SurfaceRenderer<S> {
    fn build_scene(&mut self, ctx: &RenderContext) {
        let editor = ctx.editor;

        if let Some(background) = self.background_color(ctx) {
            let viewport = Rect::from_origin_size(Point::ZERO, ctx.viewport_size);
            self.surface.fill_path(&viewport.to_path(0.1), background);
        }

        // Shapes in z-order; the selected one is drawn translucent
        for (index, shape) in editor.shapes().iter().enumerate() {
            if editor.selection() == Some(index) {
                self.surface.save();
                self.surface.set_alpha(SELECTED_ALPHA);
                self.render_shape(shape);
                self.surface.restore();
            } else {
                self.render_shape(shape);
            }
        }

        if let Some(draft) = editor.draft() {
            self.surface.save();
            self.surface.set_dash(&DRAFT_DASH);
            self.render_shape(draft);
            self.surface.restore();
        }

        if editor.mode() == EditorMode::Idle {
            if let Some(shape) = editor.selected_shape() {
                self.render_selection(shape, ctx);
            }
        }
    }
}

fn head_path(points: [Point; 3]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(points[0]);
    path.line_to(points[1]);
    path.line_to(points[2]);
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowsketch_core::canvas::{CanvasDocument, Editor};
    use flowsketch_core::shapes::{Arrow, Rectangle, Text};
    use flowsketch_core::tools::ToolKind;
    use kurbo::Size;

    fn render(editor: &Editor) -> DisplayList {
        let mut renderer = SurfaceRenderer::new(DisplayList::new());
        let ctx = RenderContext::new(editor, Size::new(600.0, 450.0));
        renderer.build_scene(&ctx);
        renderer.into_surface()
    }

    fn sample_editor() -> Editor {
        let mut rect = Rectangle::new(Point::new(10.0, 10.0), 40.0, 30.0);
        rect.style.fill_color = Some(SerializableColor::new(255, 0, 0, 255));
        Editor::with_document(CanvasDocument::with_shapes(vec![
            rect.into(),
            Arrow::new(Point::new(100.0, 100.0), Point::new(200.0, 100.0)).into(),
            Text::new(Point::new(50.0, 200.0), "Decision".to_string()).into(),
        ]))
    }

    #[test]
    fn test_renders_shapes_in_order() {
        let list = render(&sample_editor());
        let cmds = list.commands();
        // rect fill + stroke, arrow shaft + head, text
        assert_eq!(cmds.len(), 5);
        assert!(matches!(
            cmds[0],
            DrawCommand::Fill { color, .. } if color == SerializableColor::new(255, 0, 0, 255)
        ));
        assert!(matches!(cmds[1], DrawCommand::Stroke { .. }));
        assert!(matches!(cmds[2], DrawCommand::Stroke { width, .. } if (width - 3.0).abs() < 1e-9));
        assert!(matches!(cmds[3], DrawCommand::Fill { .. }));
        assert!(matches!(&cmds[4], DrawCommand::Text { content, .. } if content == "Decision"));
        assert!(cmds.iter().all(|c| c.state() == &DrawState::default()));
    }

    #[test]
    fn test_selection_is_translucent_with_handles() {
        let mut editor = sample_editor();
        editor.set_tool(ToolKind::Cursor);
        editor.pointer_down(Point::new(30.0, 10.0));
        editor.pointer_up();
        assert_eq!(editor.selection(), Some(0));

        let list = render(&editor);
        let cmds = list.commands();
        assert!((cmds[0].state().alpha - SELECTED_ALPHA).abs() < 1e-9);
        assert!((cmds[1].state().alpha - SELECTED_ALPHA).abs() < 1e-9);
        assert!((cmds[2].state().alpha - 1.0).abs() < 1e-9);

        let selection_box = &cmds[5];
        assert_eq!(selection_box.state().dash, SELECTION_DASH.to_vec());
        assert!(matches!(
            selection_box,
            DrawCommand::Stroke { color, width, .. }
                if *color == SerializableColor::new(0x29, 0x80, 0xb9, 255)
                    && (*width - SELECTION_STROKE_WIDTH).abs() < 1e-9
        ));
        let handles = &cmds[6..];
        assert_eq!(handles.len(), 8);
        assert!(handles.iter().all(|c| matches!(
            c,
            DrawCommand::Fill { color, .. } if *color == SerializableColor::new(0x34, 0x98, 0xdb, 255)
        )));
    }

    #[test]
    fn test_no_selection_box_while_dragging() {
        let mut editor = sample_editor();
        editor.pointer_down(Point::new(30.0, 10.0));
        editor.pointer_move(Point::new(35.0, 15.0));
        let list = render(&editor);
        assert_eq!(list.len(), 5);
    }

    #[test]
    fn test_draft_is_dashed() {
        let mut editor = Editor::new();
        editor.set_tool(ToolKind::Ellipse);
        editor.pointer_down(Point::new(300.0, 300.0));
        editor.pointer_move(Point::new(340.0, 320.0));

        let list = render(&editor);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].state().dash, DRAFT_DASH.to_vec());
    }

    #[test]
    fn test_background_fills_viewport() {
        let editor = Editor::new();
        let mut renderer = SurfaceRenderer::new(DisplayList::new());
        let ctx = RenderContext::new(&editor, Size::new(100.0, 50.0)).with_background(Color::WHITE);
        renderer.build_scene(&ctx);
        let list = renderer.surface();
        assert_eq!(list.len(), 1);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::Fill { color, .. } if color == SerializableColor::WHITE
        ));
    }

    #[test]
    fn test_unbalanced_restore_keeps_state() {
        let mut list = DisplayList::new();
        list.set_alpha(0.5);
        list.restore();
        list.fill_path(&BezPath::new(), Color::BLACK);
        assert!((list.commands()[0].state().alpha - 0.5).abs() < 1e-9);
    }
}
