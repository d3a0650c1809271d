//! Arrow shape.

use super::line::{set_indexed_point, split_points};
use super::{
    HIT_THRESHOLD, ShapeStyle, ShapeTrait, average_scale, bounds_of_points,
    point_to_polyline_dist, polyline_path,
};
use kurbo::{Affine, BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_6;

/// Arrowhead drawing style. Only filled triangles are supported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowheadStyle {
    #[default]
    Triangle,
}

impl ArrowheadStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowheadStyle::Triangle => "triangle",
        }
    }

    /// Parse a style tag, falling back to the default for unknown tags.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "triangle" => ArrowheadStyle::Triangle,
            other => {
                log::debug!("Unknown arrowhead type {other:?}, using triangle");
                ArrowheadStyle::Triangle
            }
        }
    }
}

/// An arrow shape (polyline with arrowheads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Intermediate points (for polylines).
    #[serde(default)]
    pub intermediate_points: Vec<Point>,
    /// Draw a head at the start point.
    pub head_start: bool,
    /// Draw a head at the end point.
    pub head_end: bool,
    /// Arrowhead style.
    #[serde(default)]
    pub head_style: ArrowheadStyle,
    /// Length of the arrowhead flanks.
    pub head_length: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Arrow {
    /// Stroke width of a freshly drawn arrow.
    pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;

    /// Smallest arrowhead length.
    pub const MIN_HEAD_LENGTH: f64 = 10.0;

    /// Create a new arrow pointing from `start` to `end`.
    pub fn new(start: Point, end: Point) -> Self {
        let style = ShapeStyle::with_stroke_width(Self::DEFAULT_STROKE_WIDTH);
        Self {
            start,
            end,
            intermediate_points: Vec::new(),
            head_start: false,
            head_end: true,
            head_style: ArrowheadStyle::Triangle,
            head_length: Self::head_length_for(style.stroke_width),
            style,
        }
    }

    /// Create an arrow from multiple points. Needs at least two points.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        let (start, end, intermediate_points) = split_points(points)?;
        Some(Self {
            intermediate_points,
            ..Self::new(start, end)
        })
    }

    /// Arrowhead length for a given stroke width.
    pub fn head_length_for(stroke_width: f64) -> f64 {
        (stroke_width * 3.0).max(Self::MIN_HEAD_LENGTH)
    }

    /// Get all points including start, intermediate, and end.
    pub fn all_points(&self) -> Vec<Point> {
        let mut pts = vec![self.start];
        pts.extend(&self.intermediate_points);
        pts.push(self.end);
        pts
    }

    /// Number of points in the full point list.
    pub fn point_count(&self) -> usize {
        self.intermediate_points.len() + 2
    }

    /// Replace the point at `index` of the full point list.
    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        set_indexed_point(
            &mut self.start,
            &mut self.intermediate_points,
            &mut self.end,
            index,
            point,
        )
    }

    /// Head polygon at the end point, following the last segment.
    pub fn end_head(&self) -> Option<[Point; 3]> {
        self.head_end.then(|| {
            let from = self.intermediate_points.last().copied().unwrap_or(self.start);
            arrowhead_points(from, self.end, self.head_length)
        })
    }

    /// Head polygon at the start point, following the first segment reversed.
    pub fn start_head(&self) -> Option<[Point; 3]> {
        self.head_start.then(|| {
            let from = self.intermediate_points.first().copied().unwrap_or(self.end);
            arrowhead_points(from, self.start, self.head_length)
        })
    }
}

/// Vertices of a triangular arrowhead whose apex sits at `tip`.
///
/// The flanks sit at ±30° from the segment direction `from → tip`, each `length` long.
pub fn arrowhead_points(from: Point, tip: Point, length: f64) -> [Point; 3] {
    let angle = (tip.y - from.y).atan2(tip.x - from.x);
    let flank = |a: f64| tip - Vec2::new(a.cos(), a.sin()) * length;
    [tip, flank(angle - FRAC_PI_6), flank(angle + FRAC_PI_6)]
}

impl ShapeTrait for Arrow {
    fn bounds(&self) -> Rect {
        bounds_of_points(&self.all_points())
    }

    fn hit_test(&self, point: Point) -> bool {
        point_to_polyline_dist(point, &self.all_points()) < HIT_THRESHOLD
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.all_points())
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.start = affine * self.start;
        self.end = affine * self.end;
        for p in &mut self.intermediate_points {
            *p = affine * *p;
        }
        let scale = average_scale(affine);
        if (scale - 1.0).abs() > f64::EPSILON {
            self.head_length *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_arrow_defaults() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(!arrow.head_start);
        assert!(arrow.head_end);
        assert_eq!(arrow.head_style, ArrowheadStyle::Triangle);
        assert!((arrow.style.stroke_width - 3.0).abs() < EPS);
        assert!((arrow.head_length - 10.0).abs() < EPS);
        assert!((Arrow::head_length_for(5.0) - 15.0).abs() < EPS);
    }

    #[test]
    fn test_arrowhead_geometry() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let [apex, left, right] = arrow.end_head().unwrap();
        let length = arrow.head_length;

        assert!((apex - Point::new(100.0, 0.0)).hypot() < EPS);
        assert!(((left - apex).hypot() - length).abs() < EPS);
        assert!(((right - apex).hypot() - length).abs() < EPS);
        // Symmetric about the shaft
        assert!((left.x - right.x).abs() < EPS);
        assert!((left.y + right.y).abs() < EPS);
        assert!((left.x - (100.0 - length * FRAC_PI_6.cos())).abs() < EPS);
        assert!((left.y.abs() - length * 0.5).abs() < EPS);
        assert!(arrow.start_head().is_none());
    }

    #[test]
    fn test_heads_follow_end_segments() {
        let mut arrow = Arrow::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 50.0),
            Point::new(50.0, 50.0),
        ])
        .unwrap();
        arrow.head_start = true;

        let [end_apex, end_left, _] = arrow.end_head().unwrap();
        assert_eq!(end_apex, Point::new(50.0, 50.0));
        assert!(end_left.x < 50.0);

        let [start_apex, start_left, _] = arrow.start_head().unwrap();
        assert_eq!(start_apex, Point::new(0.0, 0.0));
        // Start head points up along the reversed first segment
        assert!(start_left.y > 0.0);
    }

    #[test]
    fn test_hit_test_shaft() {
        let arrow = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(arrow.hit_test(Point::new(50.0, 5.0)));
        assert!(!arrow.hit_test(Point::new(50.0, 20.0)));
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(ArrowheadStyle::parse("triangle"), ArrowheadStyle::Triangle);
        assert_eq!(ArrowheadStyle::parse("barbed"), ArrowheadStyle::Triangle);
        assert_eq!(ArrowheadStyle::Triangle.as_str(), "triangle");
    }
}
