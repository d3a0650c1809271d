//! FlowSketch Application
//!
//! The command-line shell around the editor: replays editing scripts, moves
//! documents in and out of the interchange format and renders SVG through the
//! backend bridge.

mod app;
pub mod bridge;
pub mod script;

pub use app::{App, AppConfig, AppError, AppResult, ReplaySummary};
pub use bridge::{BridgeClient, BridgeError, RenderSource, RenderedSvg};
pub use script::{ScriptStep, parse_script};
