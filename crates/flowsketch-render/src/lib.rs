//! FlowSketch Render Library
//!
//! Renderer abstraction and implementations for FlowSketch.
//! The surface renderer draws the live editor onto an immediate-mode [`Surface`];
//! the SVG renderer turns interchange records into a standalone document.

pub mod bridge;
mod renderer;
mod surface;
mod svg;

pub use bridge::{RenderRequest, RenderResponse};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use surface::{DisplayList, DrawCommand, DrawState, Surface, SurfaceRenderer};
pub use svg::SvgRenderer;
