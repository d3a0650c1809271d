//! Renderer trait abstraction.

use flowsketch_core::canvas::Editor;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The editor to render.
    pub editor: &'a Editor,
    /// Viewport size in surface pixels.
    pub viewport_size: Size,
    /// Background color; `None` leaves the surface untouched.
    pub background_color: Option<Color>,
    /// Dashed selection box color.
    pub selection_color: Color,
    /// Handle marker color.
    pub handle_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(editor: &'a Editor, viewport_size: Size) -> Self {
        Self {
            editor,
            viewport_size,
            background_color: None,
            selection_color: Color::from_rgba8(0x29, 0x80, 0xb9, 255),
            handle_color: Color::from_rgba8(0x34, 0x98, 0xdb, 255),
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Set the selection box color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the handle marker color.
    pub fn with_handle_color(mut self, color: Color) -> Self {
        self.handle_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the command buffer for a frame.
    ///
    /// Called once per frame; prepares all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Option<Color> {
        ctx.background_color
    }
}
