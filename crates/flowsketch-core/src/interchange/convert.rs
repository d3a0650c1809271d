//! Conversion between shapes and interchange records.

use super::CoordinateSpace;
use crate::color::{SerializableColor, format_fill, parse_fill};
use crate::shapes::{
    Arrow, ArrowheadStyle, Circle, Ellipse, Path, Rectangle, Shape, ShapeStyle, Text, Triangle,
    clamp_signed,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Record type identifiers
const TYPE_POLYLINE: &str = "polyline";
const TYPE_ARROW: &str = "arrow";
const TYPE_RECTANGLE: &str = "rectangle";
const TYPE_CIRCLE: &str = "circle";
const TYPE_ELLIPSE: &str = "ellipse";
const TYPE_TRIANGLE: &str = "triangle";
const TYPE_TEXT: &str = "text";

// Common keys
const KEY_SHAPE_TYPE: &str = "shape_type";
const KEY_STROKE_COLOR: &str = "stroke_color";
const KEY_STROKE_WIDTH: &str = "stroke_width";
const KEY_FILL_COLOR: &str = "fill_color";

// Geometry keys
const KEY_POINTS: &str = "points";
const KEY_X: &str = "x";
const KEY_Y: &str = "y";
const KEY_SCALE_X: &str = "scale_x";
const KEY_SCALE_Y: &str = "scale_y";

// Arrow keys
const KEY_ARROW_START: &str = "arrow_start";
const KEY_ARROW_END: &str = "arrow_end";
const KEY_ARROWHEAD_TYPE: &str = "arrowhead_type";
const KEY_ARROWHEAD_SIZE: &str = "arrowhead_size";

// Text keys
const KEY_TEXT: &str = "text";
const KEY_FONT_SIZE: &str = "font_size";
const KEY_FONT_FAMILY: &str = "font_family";
const KEY_TEXT_COLOR: &str = "text_color";

const YES: &str = "yes";
const NO: &str = "no";

/// Interchange record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Polyline,
    Arrow,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Text,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Polyline => TYPE_POLYLINE,
            RecordKind::Arrow => TYPE_ARROW,
            RecordKind::Rectangle => TYPE_RECTANGLE,
            RecordKind::Circle => TYPE_CIRCLE,
            RecordKind::Ellipse => TYPE_ELLIPSE,
            RecordKind::Triangle => TYPE_TRIANGLE,
            RecordKind::Text => TYPE_TEXT,
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            TYPE_POLYLINE => Some(RecordKind::Polyline),
            TYPE_ARROW => Some(RecordKind::Arrow),
            TYPE_RECTANGLE => Some(RecordKind::Rectangle),
            TYPE_CIRCLE => Some(RecordKind::Circle),
            TYPE_ELLIPSE => Some(RecordKind::Ellipse),
            TYPE_TRIANGLE => Some(RecordKind::Triangle),
            TYPE_TEXT => Some(RecordKind::Text),
            _ => None,
        }
    }
}

/// One shape in interchange form.
///
/// Box-like kinds carry a center (`x`, `y`) and a signed size (`scale_x`,
/// `scale_y`); polylines and arrows carry `points`; text carries its anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub shape_type: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrowhead_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrowhead_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl ShapeRecord {
    /// Empty record of the given kind.
    pub fn new(shape_type: RecordKind) -> Self {
        Self {
            shape_type,
            stroke_color: None,
            stroke_width: None,
            fill_color: None,
            points: None,
            x: None,
            y: None,
            scale_x: None,
            scale_y: None,
            arrow_start: None,
            arrow_end: None,
            arrowhead_type: None,
            arrowhead_size: None,
            text: None,
            font_size: None,
            font_family: None,
            text_color: None,
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Center point, when both coordinates are present.
    pub fn center(&self) -> Option<Point> {
        Some(Point::new(self.x?, self.y?))
    }

    /// Scale vector, when both components are present.
    pub fn scale(&self) -> Option<Vec2> {
        Some(Vec2::new(self.scale_x?, self.scale_y?))
    }

    /// Points as kurbo points.
    pub fn kurbo_points(&self) -> Option<Vec<Point>> {
        self.points
            .as_ref()
            .map(|pts| pts.iter().map(|[x, y]| Point::new(*x, *y)).collect())
    }

    /// Whether an arrowhead is requested at the start.
    pub fn head_at_start(&self) -> bool {
        self.arrow_start.as_deref() == Some(YES)
    }

    /// Whether an arrowhead is requested at the end. Defaults to true.
    pub fn head_at_end(&self) -> bool {
        self.arrow_end.as_deref() != Some(NO)
    }
}

// Helper functions to extract values from a JSON object
fn get_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key)?.as_f64().filter(|v| v.is_finite())
}

fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)?.as_str().map(str::to_string)
}

fn get_flag(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(flag(*b)),
        _ => None,
    }
}

fn get_points(map: &Map<String, Value>, key: &str) -> Option<Vec<[f64; 2]>> {
    map.get(key)?
        .as_array()?
        .iter()
        .map(|p| match p {
            Value::Array(xy) if xy.len() >= 2 => Some([xy[0].as_f64()?, xy[1].as_f64()?]),
            Value::Object(obj) => Some([get_f64(obj, KEY_X)?, get_f64(obj, KEY_Y)?]),
            _ => None,
        })
        .collect()
}

/// Decode a JSON value into a record.
///
/// Fields with the wrong JSON type are treated as absent. Returns `None` when the
/// value is not an object or names an unknown `shape_type`.
pub fn record_from_value(value: &Value) -> Option<ShapeRecord> {
    let map = value.as_object()?;
    let Some(kind) = map
        .get(KEY_SHAPE_TYPE)
        .and_then(Value::as_str)
        .and_then(RecordKind::parse)
    else {
        log::warn!(
            "Unknown shape_type {:?}",
            map.get(KEY_SHAPE_TYPE).unwrap_or(&Value::Null)
        );
        return None;
    };

    Some(ShapeRecord {
        shape_type: kind,
        stroke_color: get_string(map, KEY_STROKE_COLOR),
        stroke_width: get_f64(map, KEY_STROKE_WIDTH),
        fill_color: get_string(map, KEY_FILL_COLOR),
        points: get_points(map, KEY_POINTS),
        x: get_f64(map, KEY_X),
        y: get_f64(map, KEY_Y),
        scale_x: get_f64(map, KEY_SCALE_X),
        scale_y: get_f64(map, KEY_SCALE_Y),
        arrow_start: get_flag(map, KEY_ARROW_START),
        arrow_end: get_flag(map, KEY_ARROW_END),
        arrowhead_type: get_string(map, KEY_ARROWHEAD_TYPE),
        arrowhead_size: get_f64(map, KEY_ARROWHEAD_SIZE),
        text: get_string(map, KEY_TEXT),
        font_size: get_f64(map, KEY_FONT_SIZE),
        font_family: get_string(map, KEY_FONT_FAMILY),
        text_color: get_string(map, KEY_TEXT_COLOR),
    })
}

/// Convert a shape to an interchange record.
pub fn shape_to_record(shape: &Shape, space: &CoordinateSpace) -> ShapeRecord {
    let (fx, fy, fa) = (space.fx(), space.fy(), space.fa());
    let mut record = match shape {
        Shape::Path(path) => {
            let mut r = ShapeRecord::new(RecordKind::Polyline);
            r.points = Some(export_points(&path.points, space));
            r
        }
        Shape::Line(line) => {
            let mut r = ShapeRecord::new(RecordKind::Polyline);
            r.points = Some(export_points(&line.all_points(), space));
            r
        }
        Shape::Arrow(arrow) => {
            let mut r = ShapeRecord::new(RecordKind::Arrow);
            r.points = Some(export_points(&arrow.all_points(), space));
            r.arrow_start = Some(flag(arrow.head_start));
            r.arrow_end = Some(flag(arrow.head_end));
            r.arrowhead_type = Some(arrow.head_style.as_str().to_string());
            r.arrowhead_size = Some(arrow.head_length * fa);
            r
        }
        Shape::Rectangle(rect) => box_record(
            RecordKind::Rectangle,
            rect.position + Vec2::new(rect.width / 2.0, rect.height / 2.0),
            Vec2::new(rect.width * fx, rect.height * fy),
            space,
        ),
        Shape::Circle(circle) => box_record(
            RecordKind::Circle,
            circle.center,
            Vec2::new(2.0 * circle.radius * fx, 2.0 * circle.radius * fy),
            space,
        ),
        Shape::Ellipse(ellipse) => box_record(
            RecordKind::Ellipse,
            ellipse.center,
            Vec2::new(2.0 * ellipse.radius_x * fx, 2.0 * ellipse.radius_y * fy),
            space,
        ),
        Shape::Triangle(tri) => box_record(
            RecordKind::Triangle,
            tri.center(),
            Vec2::new((tri.end.x - tri.start.x) * fx, (tri.end.y - tri.start.y) * fy),
            space,
        ),
        Shape::Text(text) => {
            let mut r = ShapeRecord::new(RecordKind::Text);
            let anchor = space.to_target(text.position);
            r.x = Some(anchor.x);
            r.y = Some(anchor.y);
            r.text = Some(text.content.clone());
            r.font_size = Some(text.font_size * fa);
            r.font_family = Some(text.font_family.clone());
            r.text_color = text.text_color.map(|c| c.to_hex());
            r
        }
    };

    let style = shape.style();
    record.stroke_color = Some(style.stroke_color.to_hex());
    record.stroke_width = Some(style.stroke_width * fa);
    record.fill_color = Some(format_fill(style.fill_color));
    record
}

fn flag(value: bool) -> String {
    if value { YES } else { NO }.to_string()
}

fn export_points(points: &[Point], space: &CoordinateSpace) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| {
            let t = space.to_target(*p);
            [t.x, t.y]
        })
        .collect()
}

fn box_record(kind: RecordKind, center: Point, scale: Vec2, space: &CoordinateSpace) -> ShapeRecord {
    let mut r = ShapeRecord::new(kind);
    let c = space.to_target(center);
    r.x = Some(c.x);
    r.y = Some(c.y);
    r.scale_x = Some(clamp_signed(scale.x));
    r.scale_y = Some(clamp_signed(scale.y));
    r
}

/// Convert an interchange record to a shape.
///
/// Returns `None` when the record lacks the geometry its kind requires.
pub fn shape_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let shape = match record.shape_type {
        RecordKind::Polyline => polyline_from_record(record, space),
        RecordKind::Arrow => arrow_from_record(record, space),
        RecordKind::Rectangle => rectangle_from_record(record, space),
        RecordKind::Circle => circle_from_record(record, space),
        RecordKind::Ellipse => ellipse_from_record(record, space),
        RecordKind::Triangle => triangle_from_record(record, space),
        RecordKind::Text => text_from_record(record, space),
    };
    if shape.is_none() {
        log::warn!(
            "Missing geometry for {} record",
            record.shape_type.as_str()
        );
    }
    shape
}

fn import_points(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Vec<Point>> {
    let points: Vec<Point> = record
        .kurbo_points()?
        .into_iter()
        .map(|p| space.to_surface(p))
        .collect();
    (points.len() >= 2).then_some(points)
}

fn apply_style(style: &mut ShapeStyle, record: &ShapeRecord, space: &CoordinateSpace) {
    if let Some(color) = &record.stroke_color {
        style.stroke_color = SerializableColor::resolve(color);
    }
    if let Some(width) = record.stroke_width {
        style.stroke_width = width / space.fa();
    }
    if let Some(fill) = &record.fill_color {
        style.fill_color = parse_fill(fill);
    }
}

fn polyline_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let mut path = Path::new(import_points(record, space)?);
    apply_style(&mut path.style, record, space);
    Some(Shape::Path(path))
}

fn arrow_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let mut arrow = Arrow::from_points(import_points(record, space)?)?;
    apply_style(&mut arrow.style, record, space);
    arrow.head_start = record.head_at_start();
    arrow.head_end = record.head_at_end();
    arrow.head_style = record
        .arrowhead_type
        .as_deref()
        .map(ArrowheadStyle::parse)
        .unwrap_or_default();
    arrow.head_length = record
        .arrowhead_size
        .map(|size| size / space.fa())
        .unwrap_or_else(|| Arrow::head_length_for(arrow.style.stroke_width));
    Some(Shape::Arrow(arrow))
}

fn surface_scale(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Vec2> {
    let scale = record.scale()?;
    Some(Vec2::new(scale.x / space.fx(), scale.y / space.fy()))
}

fn rectangle_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let center = space.to_surface(record.center()?);
    let size = surface_scale(record, space)?;
    let mut rect = Rectangle::new(center - size / 2.0, size.x, size.y);
    apply_style(&mut rect.style, record, space);
    Some(Shape::Rectangle(rect))
}

fn circle_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let center = space.to_surface(record.center()?);
    let radius = record.scale_x? / 2.0 / space.fx();
    let mut circle = Circle::new(center, radius.abs());
    apply_style(&mut circle.style, record, space);
    Some(Shape::Circle(circle))
}

fn ellipse_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let center = space.to_surface(record.center()?);
    let size = surface_scale(record, space)?;
    let mut ellipse = Ellipse::new(center, (size.x / 2.0).abs(), (size.y / 2.0).abs());
    apply_style(&mut ellipse.style, record, space);
    Some(Shape::Ellipse(ellipse))
}

fn triangle_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let center = space.to_surface(record.center()?);
    let half = surface_scale(record, space)? / 2.0;
    let mut tri = Triangle::new(center - half, center + half);
    apply_style(&mut tri.style, record, space);
    Some(Shape::Triangle(tri))
}

fn text_from_record(record: &ShapeRecord, space: &CoordinateSpace) -> Option<Shape> {
    let anchor = space.to_surface(record.center()?);
    let mut text = Text::new(anchor, record.text.clone()?);
    apply_style(&mut text.style, record, space);
    if let Some(size) = record.font_size {
        text.font_size = size / space.fa();
    }
    if let Some(family) = &record.font_family {
        text.font_family = family.clone();
    }
    text.text_color = record
        .text_color
        .as_deref()
        .map(SerializableColor::resolve);
    Some(Shape::Text(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rectangle_export() {
        let space = CoordinateSpace::default();
        let rect = Rectangle::new(Point::new(30.0, 60.0), 60.0, 30.0);
        let r = shape_to_record(&rect.into(), &space);
        assert_eq!(r.shape_type, RecordKind::Rectangle);
        assert!((r.x.unwrap() - 80.0).abs() < EPS);
        assert!((r.y.unwrap() - 100.0).abs() < EPS);
        assert!((r.scale_x.unwrap() - 80.0).abs() < EPS);
        assert!((r.scale_y.unwrap() - 40.0).abs() < EPS);
        assert_eq!(r.stroke_color.as_deref(), Some("#000000"));
        assert_eq!(r.fill_color.as_deref(), Some("none"));
    }

    #[test]
    fn test_export_clamps_scale() {
        let space = CoordinateSpace::default();
        let tri = Triangle::new(Point::new(10.0, 10.0), Point::new(7.0, 10.0));
        let r = shape_to_record(&tri.into(), &space);
        assert!((r.scale_x.unwrap() + 8.0).abs() < EPS);
        assert!((r.scale_y.unwrap() - 8.0).abs() < EPS);
    }

    #[test]
    fn test_arrow_export_fields() {
        let space = CoordinateSpace::default();
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(75.0, 0.0));
        let value = shape_to_record(&arrow.into(), &space).to_value();
        assert_eq!(value["shape_type"], "arrow");
        assert_eq!(value["arrow_start"], "no");
        assert_eq!(value["arrow_end"], "yes");
        assert_eq!(value["arrowhead_type"], "triangle");
        let end = &value["points"][1];
        assert!((end[0].as_f64().unwrap() - 100.0).abs() < EPS);
        assert!((value["arrowhead_size"].as_f64().unwrap() - 40.0 / 3.0).abs() < EPS);
        assert!(value.get("scale_x").is_none());
    }

    #[test]
    fn test_record_from_value_lenient() {
        let value = json!({
            "shape_type": "arrow",
            "points": [[0, 0], {"x": 10, "y": 5}],
            "stroke_width": "wide",
            "arrow_start": true,
        });
        let r = record_from_value(&value).unwrap();
        assert_eq!(r.points, Some(vec![[0.0, 0.0], [10.0, 5.0]]));
        assert_eq!(r.stroke_width, None);
        assert!(r.head_at_start());
        assert!(r.head_at_end());

        assert!(record_from_value(&json!({"shape_type": "star"})).is_none());
        assert!(record_from_value(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_import_defaults() {
        let space = CoordinateSpace::default();
        let r = record_from_value(&json!({"shape_type": "arrow", "points": [[0, 0], [40, 0]]}))
            .unwrap();
        let Some(Shape::Arrow(arrow)) = shape_from_record(&r, &space) else {
            panic!("Expected arrow");
        };
        assert!(!arrow.head_start);
        assert!(arrow.head_end);
        assert!((arrow.style.stroke_width - Arrow::DEFAULT_STROKE_WIDTH).abs() < EPS);
        assert!((arrow.head_length - 10.0).abs() < EPS);

        let r = record_from_value(&json!({"shape_type": "text", "x": 8, "y": 16, "text": "A"}))
            .unwrap();
        let Some(Shape::Text(text)) = shape_from_record(&r, &space) else {
            panic!("Expected text");
        };
        assert!((text.font_size - Text::DEFAULT_FONT_SIZE).abs() < EPS);
        assert_eq!(text.font_family, Text::DEFAULT_FONT_FAMILY);
        assert!((text.position.x - 6.0).abs() < EPS);
    }

    #[test]
    fn test_import_geometry() {
        let space = CoordinateSpace::default();
        let r = record_from_value(&json!({
            "shape_type": "circle", "x": 400, "y": 300, "scale_x": 80, "scale_y": 80,
            "fill_color": "#ff0000", "stroke_width": 4,
        }))
        .unwrap();
        let Some(Shape::Circle(c)) = shape_from_record(&r, &space) else {
            panic!("Expected circle");
        };
        assert!((c.center.x - 300.0).abs() < EPS);
        assert!((c.center.y - 225.0).abs() < EPS);
        assert!((c.radius - 30.0).abs() < EPS);
        assert!((c.style.stroke_width - 3.0).abs() < EPS);
        assert_eq!(c.style.fill_color, Some(SerializableColor::new(255, 0, 0, 255)));

        let r = record_from_value(&json!({
            "shape_type": "triangle", "x": 100, "y": 100, "scale_x": 40, "scale_y": -40,
        }))
        .unwrap();
        let Some(Shape::Triangle(t)) = shape_from_record(&r, &space) else {
            panic!("Expected triangle");
        };
        assert!((t.start.x - 60.0).abs() < EPS);
        assert!((t.start.y - 90.0).abs() < EPS);
        assert!((t.end.y - 60.0).abs() < EPS);
        assert!(!t.points_up());
    }

    #[test]
    fn test_missing_geometry_is_skipped() {
        let space = CoordinateSpace::default();
        let r = record_from_value(&json!({"shape_type": "ellipse", "x": 1, "y": 1, "scale_x": 10}))
            .unwrap();
        assert!(shape_from_record(&r, &space).is_none());
        let r = record_from_value(&json!({"shape_type": "polyline", "points": [[0, 0]]})).unwrap();
        assert!(shape_from_record(&r, &space).is_none());
    }
}
