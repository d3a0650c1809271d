//! Wire types of the `/json-to-svg` rendering service.

use crate::renderer::RenderResult;
use crate::svg::SvgRenderer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_background() -> String {
    "white".to_string()
}

/// Body of a `POST /json-to-svg` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Interchange records. Kept as raw JSON so malformed records can be skipped.
    #[serde(default)]
    pub shapes: Vec<Value>,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_background")]
    pub background: String,
}

impl RenderRequest {
    pub fn new(shapes: Vec<Value>, width: f64, height: f64, background: impl Into<String>) -> Self {
        Self {
            shapes,
            width,
            height,
            background: background.into(),
        }
    }

    /// SVG renderer configured for this request.
    pub fn renderer(&self) -> SvgRenderer {
        SvgRenderer::new(self.width, self.height).with_background(self.background.clone())
    }

    /// Render the request with the local SVG renderer.
    pub fn render_locally(&self) -> RenderResult<String> {
        self.renderer()
            .render_document(&Value::Array(self.shapes.clone()))
    }
}

/// Body of a `/json-to-svg` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderResponse {
    pub fn ok(svg: String) -> Self {
        Self {
            success: true,
            svg: Some(svg),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            svg: None,
            error: Some(error.into()),
        }
    }

    /// The SVG markup, when the service reported success.
    pub fn into_svg(self) -> Option<String> {
        if self.success { self.svg } else { None }
    }
}
