//! Client for the remote `/json-to-svg` rendering service.
//!
//! Any failure of the remote path falls back to the local SVG renderer.

use flowsketch_render::{RenderRequest, RenderResponse, RendererError};
use std::time::Duration;
use thiserror::Error;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CONNECT_TIMEOUT_SECS: u64 = 3;

/// Environment variable naming the bridge base URL.
pub const BRIDGE_URL_ENV: &str = "FLOWSKETCH_BRIDGE_URL";
/// Bridge base URL used when none is configured.
pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:8080";

/// Bridge errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Service reported failure: {0}")]
    Rejected(String),
    #[error("Local rendering failed: {0}")]
    Local(#[from] RendererError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Which path produced an SVG document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    Remote,
    Local,
}

impl RenderSource {
    pub fn name(&self) -> &'static str {
        match self {
            RenderSource::Remote => "remote",
            RenderSource::Local => "local",
        }
    }
}

/// A rendered SVG document and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSvg {
    pub svg: String,
    pub source: RenderSource,
}

/// HTTP client for the rendering service.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl BridgeClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> BridgeResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BridgeError::ClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: Some(base_url.into().trim_end_matches('/').to_string()),
        })
    }

    /// Create a client that always renders locally.
    pub fn offline() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: None,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Render through the service, falling back to the local renderer.
    pub async fn render(&self, request: &RenderRequest) -> BridgeResult<RenderedSvg> {
        if let Some(base_url) = &self.base_url {
            match self.render_remote(base_url, request).await {
                Ok(svg) => {
                    log::info!("SVG rendered by {base_url}");
                    return Ok(RenderedSvg {
                        svg,
                        source: RenderSource::Remote,
                    });
                }
                Err(e) => log::warn!("Render service unavailable ({e}), rendering locally"),
            }
        }

        Ok(RenderedSvg {
            svg: request.render_locally()?,
            source: RenderSource::Local,
        })
    }

    async fn render_remote(&self, base_url: &str, request: &RenderRequest) -> BridgeResult<String> {
        let response = self
            .http
            .post(format!("{base_url}/json-to-svg"))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        // A failed render still carries a JSON body with the error message
        let parsed: RenderResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if status != 200 => return Err(BridgeError::Status { status, body }),
            Err(e) => return Err(e.into()),
        };

        if !parsed.success {
            let message = parsed.error.unwrap_or_else(|| "unknown error".to_string());
            return Err(BridgeError::Rejected(message));
        }
        parsed
            .into_svg()
            .ok_or_else(|| BridgeError::Rejected("response carried no svg".to_string()))
    }
}
