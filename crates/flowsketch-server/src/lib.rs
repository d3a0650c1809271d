//! FlowSketch rendering service
//!
//! Converts interchange documents into standalone SVG.
//!
//! ## Protocol
//!
//! ```json
//! POST /json-to-svg
//! { "shapes": [ ... ], "width": 800, "height": 600, "background": "white" }
//! ```
//! answers `{ "success": true, "svg": "<svg ...>" }`, or
//! `{ "success": false, "error": "..." }` with status 400.

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use flowsketch_render::{RenderRequest, RenderResponse};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

/// Environment variable overriding the listen address.
pub const ADDR_ENV: &str = "FLOWSKETCH_ADDR";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_addr_var(std::env::var(ADDR_ENV).ok().as_deref())
    }

    fn from_addr_var(value: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = value {
            match raw.parse() {
                Ok(addr) => config.addr = addr,
                Err(e) => warn!("Ignoring invalid {ADDR_ENV}={raw:?}: {e}"),
            }
        }
        config
    }
}

/// Build the service router.
pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/json-to-svg", post(json_to_svg))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Service description returned by the index route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            name: "flowsketch-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: vec!["GET /health".to_string(), "POST /json-to-svg".to_string()],
        }
    }
}

/// Index page
async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Health check
async fn health() -> &'static str {
    "ok"
}

/// Render an interchange document to SVG.
async fn json_to_svg(body: String) -> (StatusCode, Json<RenderResponse>) {
    let request_id = Uuid::new_v4();

    let request: RenderRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("[{request_id}] Rejecting render request: {e}");
            return (
                StatusCode::BAD_REQUEST,
                Json(RenderResponse::failure(e.to_string())),
            );
        }
    };

    match request.render_locally() {
        Ok(svg) => {
            info!(
                "[{request_id}] Rendered {} records at {}x{}",
                request.shapes.len(),
                request.width,
                request.height
            );
            (StatusCode::OK, Json(RenderResponse::ok(svg)))
        }
        Err(e) => {
            warn!("[{request_id}] Render failed: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(RenderResponse::failure(e.to_string())),
            )
        }
    }
}
