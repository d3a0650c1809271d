//! FlowSketch Core Library
//!
//! Platform-agnostic shape model, geometry and editing logic for the FlowSketch
//! flowchart editor.

pub mod canvas;
pub mod color;
pub mod input;
pub mod interchange;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use canvas::{CanvasDocument, Editor, EditorMode, EditorOutcome};
pub use color::SerializableColor;
pub use input::{InputEvent, KeyEvent, PointerEvent};
pub use interchange::{
    CodecError, CodecResult, CoordinateSpace, ImportReport, RecordKind, ShapeRecord,
    export_document, import_document, import_str,
};
pub use selection::{DragSession, Handle, HandleKind, get_handles, hit_test_handles};
pub use shapes::{Shape, ShapeKind, ShapeStyle, ShapeTrait};
pub use tools::{ToolKind, ToolManager, ToolState};
