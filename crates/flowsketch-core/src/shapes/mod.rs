//! Shape definitions for the drawing surface.

mod arrow;
mod circle;
mod ellipse;
mod line;
mod path;
mod rectangle;
mod text;
mod triangle;

pub use arrow::{Arrow, ArrowheadStyle, arrowhead_points};
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use line::Line;
pub use path::Path;
pub use rectangle::Rectangle;
pub use text::Text;
pub use triangle::Triangle;

pub use crate::color::SerializableColor;

use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Distance (px) within which a point counts as touching a stroke.
pub const HIT_THRESHOLD: f64 = 10.0;

/// Minimum extent (px) a finalized shape is clamped to.
pub const MIN_SIZE: f64 = 8.0;

/// Style properties for shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width.
    pub stroke_width: f64,
    /// Fill color (None = no fill).
    pub fill_color: Option<SerializableColor>,
}

impl ShapeStyle {
    /// Default style with a different stroke width.
    pub fn with_stroke_width(stroke_width: f64) -> Self {
        Self {
            stroke_width,
            ..Self::default()
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|c| c.into())
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.stroke_color = color.into();
    }

    /// Set the fill color from a peniko Color.
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.fill_color = color.map(|c| c.into());
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: SerializableColor::BLACK,
            stroke_width: 1.0,
            fill_color: None,
        }
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Minimum distance from a point to the edges of a closed polygon.
pub fn point_to_polygon_dist(point: Point, vertices: &[Point]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| point_to_segment_dist(point, vertices[i], vertices[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Ray-casting parity test for a point inside a polygon.
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    let mut inside = false;
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounds of a point set; an empty set yields a zero box at the origin.
pub fn bounds_of_points(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points
        .iter()
        .skip(1)
        .fold(Rect::from_points(*first, *first), |acc, p| {
            acc.union_pt(*p)
        })
}

/// Build an open polyline path through the given points.
pub(crate) fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path
}

/// Build a closed polygon path through the given vertices.
pub(crate) fn polygon_path(vertices: &[Point]) -> BezPath {
    let mut path = polyline_path(vertices);
    if vertices.len() > 2 {
        path.close_path();
    }
    path
}

/// Average of the x and y scale factors of an affine transform.
pub(crate) fn average_scale(affine: Affine) -> f64 {
    let coeffs = affine.as_coeffs();
    (coeffs[0].abs() + coeffs[3].abs()) / 2.0
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the bounding box in surface coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in surface coordinates) hits this shape.
    fn hit_test(&self, point: Point) -> bool;

    /// Get the path representation for rendering.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;

    /// Apply a transform to this shape.
    fn transform(&mut self, affine: Affine);
}

/// Kind tag of a shape. The kind of a shape never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Path,
    Line,
    Arrow,
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Text,
}

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Path => "path",
            ShapeKind::Line => "line",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Text => "text",
        }
    }

    /// Kinds whose handles are the eight points of their bounding box.
    pub fn is_box_like(&self) -> bool {
        matches!(
            self,
            ShapeKind::Rectangle | ShapeKind::Ellipse | ShapeKind::Triangle | ShapeKind::Text
        )
    }
}

/// Enum wrapper for all shape types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Path(Path),
    Line(Line),
    Arrow(Arrow),
    Rectangle(Rectangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Triangle(Triangle),
    Text(Text),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Path(_) => ShapeKind::Path,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Arrow(_) => ShapeKind::Arrow,
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Ellipse(_) => ShapeKind::Ellipse,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Path(s) => s.bounds(),
            Shape::Line(s) => s.bounds(),
            Shape::Arrow(s) => s.bounds(),
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Ellipse(s) => s.bounds(),
            Shape::Triangle(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Path(s) => s.hit_test(point),
            Shape::Line(s) => s.hit_test(point),
            Shape::Arrow(s) => s.hit_test(point),
            Shape::Rectangle(s) => s.hit_test(point),
            Shape::Circle(s) => s.hit_test(point),
            Shape::Ellipse(s) => s.hit_test(point),
            Shape::Triangle(s) => s.hit_test(point),
            Shape::Text(s) => s.hit_test(point),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Path(s) => s.to_path(),
            Shape::Line(s) => s.to_path(),
            Shape::Arrow(s) => s.to_path(),
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Ellipse(s) => s.to_path(),
            Shape::Triangle(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Path(s) => s.style(),
            Shape::Line(s) => s.style(),
            Shape::Arrow(s) => s.style(),
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Ellipse(s) => s.style(),
            Shape::Triangle(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Path(s) => s.style_mut(),
            Shape::Line(s) => s.style_mut(),
            Shape::Arrow(s) => s.style_mut(),
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Ellipse(s) => s.style_mut(),
            Shape::Triangle(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }

    pub fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Path(s) => s.transform(affine),
            Shape::Line(s) => s.transform(affine),
            Shape::Arrow(s) => s.transform(affine),
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Circle(s) => s.transform(affine),
            Shape::Ellipse(s) => s.transform(affine),
            Shape::Triangle(s) => s.transform(affine),
            Shape::Text(s) => s.transform(affine),
        }
    }

    /// Move every coordinate of the shape by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.transform(Affine::translate(delta));
    }

    /// Scale the size of the shape about its anchor.
    ///
    /// Only rectangles, ellipses and circles respond; returns whether anything changed.
    pub fn scale_size(&mut self, factor: f64) -> bool {
        match self {
            Shape::Rectangle(r) => {
                r.width *= factor;
                r.height *= factor;
                true
            }
            Shape::Ellipse(e) => {
                e.radius_x *= factor;
                e.radius_y *= factor;
                true
            }
            Shape::Circle(c) => {
                c.radius *= factor;
                true
            }
            _ => false,
        }
    }

    /// Clamp degenerate extents up to [`MIN_SIZE`]. Lines, arrows, paths and text are untouched.
    pub fn clamp_to_min_size(&mut self) {
        match self {
            Shape::Rectangle(r) => {
                r.width = clamp_signed(r.width);
                r.height = clamp_signed(r.height);
            }
            Shape::Ellipse(e) => {
                e.radius_x = e.radius_x.max(MIN_SIZE);
                e.radius_y = e.radius_y.max(MIN_SIZE);
            }
            Shape::Circle(c) => c.radius = c.radius.max(MIN_SIZE),
            Shape::Triangle(t) => {
                t.end.x = t.start.x + clamp_signed(t.end.x - t.start.x);
                t.end.y = t.start.y + clamp_signed(t.end.y - t.start.y);
            }
            Shape::Path(_) | Shape::Line(_) | Shape::Arrow(_) | Shape::Text(_) => {}
        }
    }
}

/// Raise a signed extent to at least [`MIN_SIZE`] in magnitude; zero becomes positive.
pub fn clamp_signed(value: f64) -> f64 {
    if value.abs() >= MIN_SIZE {
        value
    } else if value < 0.0 {
        -MIN_SIZE
    } else {
        MIN_SIZE
    }
}

macro_rules! impl_from_shape {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Shape {
                fn from(shape: $variant) -> Self {
                    Shape::$variant(shape)
                }
            }
        )*
    };
}

impl_from_shape!(Path, Line, Arrow, Rectangle, Circle, Ellipse, Triangle, Text);
