//! Application state: the editor, its live frame and document I/O.

use crate::bridge::{BridgeClient, BridgeError, DEFAULT_BRIDGE_URL, RenderedSvg};
use crate::script::ScriptStep;
use flowsketch_core::canvas::{Editor, EditorOutcome};
use flowsketch_core::input::PointerEvent;
use flowsketch_core::interchange::{
    CodecError, CoordinateSpace, ImportReport, export_document, import_str,
};
use flowsketch_render::{DisplayList, RenderContext, RenderRequest, Renderer, SurfaceRenderer};
use kurbo::{Point, Size};
use peniko::Color;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Drawing surface size in pixels.
    pub surface_size: Size,
    /// Interchange canvas size.
    pub target_size: Size,
    /// Background of exported SVG documents.
    pub background: String,
    /// Base URL of the rendering service.
    pub bridge_url: String,
    /// Skip the rendering service and always render locally.
    pub offline: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let space = CoordinateSpace::default();
        Self {
            surface_size: space.surface,
            target_size: space.target,
            background: "white".to_string(),
            bridge_url: DEFAULT_BRIDGE_URL.to_string(),
            offline: false,
        }
    }
}

impl AppConfig {
    pub fn space(&self) -> CoordinateSpace {
        CoordinateSpace::new(self.surface_size, self.target_size)
    }
}

/// Counters collected while replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub steps: usize,
    pub redraws: usize,
    /// Text prompts answered with a non-blank string.
    pub texts: usize,
}

/// The FlowSketch application shell.
pub struct App {
    config: AppConfig,
    editor: Editor,
    renderer: SurfaceRenderer<DisplayList>,
    /// Anchor of the text prompt opened by the last text-tool press.
    pending_text: Option<Point>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            config,
            editor: Editor::new(),
            renderer: SurfaceRenderer::new(DisplayList::new()),
            pending_text: None,
        };
        app.redraw();
        app
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &DisplayList {
        self.renderer.surface()
    }

    /// Re-render the live frame.
    pub fn redraw(&mut self) {
        self.renderer.surface_mut().reset();
        let ctx = RenderContext::new(&self.editor, self.config.surface_size)
            .with_background(Color::WHITE);
        self.renderer.build_scene(&ctx);
    }

    /// Apply a single script step.
    pub fn apply_step(&mut self, step: &ScriptStep) -> EditorOutcome {
        let outcome = match step {
            ScriptStep::Tool { tool } => {
                self.pending_text = None;
                self.editor.set_tool(*tool);
                EditorOutcome::Redraw
            }
            ScriptStep::Input { event } => self.editor.handle(event.clone()),
            ScriptStep::Drag { from, to } => {
                let down = self.editor.handle(PointerEvent::Down { position: *from });
                if let EditorOutcome::TextInput(_) = down {
                    down
                } else {
                    self.editor.handle(PointerEvent::Move { position: *to });
                    self.editor.handle(PointerEvent::Up { position: *to });
                    EditorOutcome::Redraw
                }
            }
            ScriptStep::Text { text } => match self.pending_text.take() {
                Some(anchor) => self.editor.commit_text(anchor, text),
                None => {
                    log::warn!("Ignoring text {text:?}: no text prompt is open");
                    EditorOutcome::Unchanged
                }
            },
            ScriptStep::Style { .. } => {
                self.editor.set_current_style(step.style());
                EditorOutcome::Unchanged
            }
            ScriptStep::Clear => {
                self.editor.clear();
                EditorOutcome::Redraw
            }
        };

        match outcome {
            EditorOutcome::TextInput(anchor) => self.pending_text = Some(anchor),
            EditorOutcome::Redraw => self.redraw(),
            EditorOutcome::Unchanged => {}
        }
        outcome
    }

    /// Replay a sequence of steps.
    pub fn run_script(&mut self, steps: &[ScriptStep]) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for step in steps {
            let before = self.editor.shapes().len();
            let outcome = self.apply_step(step);
            summary.steps += 1;
            if outcome.needs_redraw() {
                summary.redraws += 1;
            }
            if matches!(step, ScriptStep::Text { .. }) && self.editor.shapes().len() > before {
                summary.texts += 1;
            }
        }
        log::info!(
            "Replayed {} steps, {} shapes on the canvas",
            summary.steps,
            self.editor.shapes().len()
        );
        summary
    }

    /// Replay a script file.
    pub fn run_script_file(&mut self, path: &Path) -> AppResult<ReplaySummary> {
        let json = read(path)?;
        let steps = crate::script::parse_script(&json)?;
        Ok(self.run_script(&steps))
    }

    /// Replace the canvas with the shapes of an interchange document.
    pub fn load_document(&mut self, path: &Path) -> AppResult<ImportReport> {
        let json = read(path)?;
        let report = import_str(&json, &self.config.space())?;
        if report.skipped > 0 {
            log::warn!(
                "{}: skipped {} unsupported records",
                path.display(),
                report.skipped
            );
        }
        self.editor.replace_shapes(report.shapes.clone());
        self.pending_text = None;
        self.redraw();
        Ok(report)
    }

    /// The canvas as an interchange document.
    pub fn export(&self) -> Value {
        export_document(self.editor.shapes(), &self.config.space())
    }

    /// Write the canvas as a pretty-printed interchange document.
    pub fn save_document(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(&self.export())?;
        write(path, &json)?;
        log::info!("Saved document to: {}", path.display());
        Ok(())
    }

    /// Render the canvas to SVG through the bridge, falling back to local rendering.
    pub async fn render_svg(&self, client: &BridgeClient) -> AppResult<RenderedSvg> {
        let shapes = match self.export() {
            Value::Array(records) => records,
            _ => Vec::new(),
        };
        let request = RenderRequest::new(
            shapes,
            self.config.target_size.width,
            self.config.target_size.height,
            self.config.background.clone(),
        );
        Ok(client.render(&request).await?)
    }

    /// Render the canvas to SVG and write it to `path`.
    pub async fn save_svg(&self, client: &BridgeClient, path: &Path) -> AppResult<RenderedSvg> {
        let rendered = self.render_svg(client).await?;
        write(path, &rendered.svg)?;
        log::info!(
            "Saved {} SVG to: {}",
            rendered.source.name(),
            path.display()
        );
        Ok(rendered)
    }

    /// Bridge client matching the configuration.
    pub fn bridge_client(&self) -> AppResult<BridgeClient> {
        if self.config.offline {
            Ok(BridgeClient::offline())
        } else {
            Ok(BridgeClient::new(self.config.bridge_url.clone())?)
        }
    }
}

fn read(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|source| AppError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> AppResult<()> {
    fs::write(path, contents).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })
}
