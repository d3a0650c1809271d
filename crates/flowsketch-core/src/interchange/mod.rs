//! Normalized JSON interchange format.
//!
//! Shapes live in surface pixels with per-kind anchors. The interchange format
//! describes every box-like shape by its center and a signed scale vector in a
//! fixed target space, and collapses paths and lines to `polyline` records.

mod convert;

pub use convert::{RecordKind, ShapeRecord, record_from_value, shape_from_record, shape_to_record};

use crate::shapes::Shape;
use kurbo::{Point, Size};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while decoding an interchange document.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Interchange document must be a JSON array, found {0}")]
    NotASequence(&'static str),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Maps surface pixels onto the interchange coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    /// Size of the drawing surface.
    pub surface: Size,
    /// Size of the interchange canvas.
    pub target: Size,
}

impl Default for CoordinateSpace {
    fn default() -> Self {
        Self {
            surface: Size::new(600.0, 450.0),
            target: Size::new(800.0, 600.0),
        }
    }
}

impl CoordinateSpace {
    pub fn new(surface: Size, target: Size) -> Self {
        Self { surface, target }
    }

    /// Horizontal export factor.
    pub fn fx(&self) -> f64 {
        self.target.width / self.surface.width
    }

    /// Vertical export factor.
    pub fn fy(&self) -> f64 {
        self.target.height / self.surface.height
    }

    /// Average factor, applied to stroke widths, font sizes and arrowhead sizes.
    pub fn fa(&self) -> f64 {
        (self.fx() + self.fy()) / 2.0
    }

    /// Surface point to interchange point.
    pub fn to_target(&self, point: Point) -> Point {
        Point::new(point.x * self.fx(), point.y * self.fy())
    }

    /// Interchange point to surface point.
    pub fn to_surface(&self, point: Point) -> Point {
        Point::new(point.x / self.fx(), point.y / self.fy())
    }
}

/// Outcome of importing a document.
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Shapes decoded from the document, in document order.
    pub shapes: Vec<Shape>,
    /// Number of records that were skipped.
    pub skipped: usize,
}

/// Export a shape list to interchange records.
pub fn export_shapes(shapes: &[Shape], space: &CoordinateSpace) -> Vec<ShapeRecord> {
    shapes.iter().map(|s| shape_to_record(s, space)).collect()
}

/// Export a shape list to an interchange JSON document.
pub fn export_document(shapes: &[Shape], space: &CoordinateSpace) -> Value {
    Value::Array(
        export_shapes(shapes, space)
            .iter()
            .map(ShapeRecord::to_value)
            .collect(),
    )
}

/// Import an interchange JSON document.
///
/// The document must be an array. Records that cannot be decoded are skipped
/// and counted in the report.
pub fn import_document(document: &Value, space: &CoordinateSpace) -> CodecResult<ImportReport> {
    let records = document
        .as_array()
        .ok_or(CodecError::NotASequence(json_type_name(document)))?;

    let mut report = ImportReport::default();
    for (i, value) in records.iter().enumerate() {
        match record_from_value(value).and_then(|r| shape_from_record(&r, space)) {
            Some(shape) => report.shapes.push(shape),
            None => {
                log::warn!("Skipping interchange record {i}: unsupported or incomplete");
                report.skipped += 1;
            }
        }
    }
    log::debug!(
        "Imported {} shapes ({} skipped)",
        report.shapes.len(),
        report.skipped
    );
    Ok(report)
}

/// Parse and import an interchange JSON document.
pub fn import_str(json: &str, space: &CoordinateSpace) -> CodecResult<ImportReport> {
    let value: Value = serde_json::from_str(json)?;
    import_document(&value, space)
}

/// Decode the records of a document without converting them to shapes.
pub fn records_from_document(document: &Value) -> CodecResult<Vec<ShapeRecord>> {
    let records = document
        .as_array()
        .ok_or(CodecError::NotASequence(json_type_name(document)))?;
    Ok(records.iter().filter_map(record_from_value).collect())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
