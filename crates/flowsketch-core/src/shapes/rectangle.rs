//! Rectangle shape.

use super::{HIT_THRESHOLD, MIN_SIZE, ShapeStyle, ShapeTrait};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at a corner.
///
/// Width and height are signed: dragging up or left while drawing produces negative extents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Anchor corner (where drawing started).
    pub position: Point,
    /// Signed width.
    pub width: f64,
    /// Signed height.
    pub height: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            position,
            width,
            height,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle from a normalized box.
    pub fn from_rect(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.origin(), rect.width(), rect.height())
    }

    /// Get the rectangle as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
        .abs()
    }
}

impl ShapeTrait for Rectangle {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point) -> bool {
        let rect = self.as_rect();
        if self.width.abs() < MIN_SIZE && self.height.abs() < MIN_SIZE {
            // Too small to grab an edge: hit anywhere inside
            return point.x >= rect.x0
                && point.x <= rect.x1
                && point.y >= rect.y0
                && point.y <= rect.y1;
        }

        let within_x = point.x >= rect.x0 && point.x <= rect.x1;
        let within_y = point.y >= rect.y0 && point.y <= rect.y1;
        let near_left = (point.x - rect.x0).abs() < HIT_THRESHOLD;
        let near_right = (point.x - rect.x1).abs() < HIT_THRESHOLD;
        let near_top = (point.y - rect.y0).abs() < HIT_THRESHOLD;
        let near_bottom = (point.y - rect.y1).abs() < HIT_THRESHOLD;

        ((near_left || near_right) && within_y) || ((near_top || near_bottom) && within_x)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        // Axis-aligned scale only; rotation and skew are not representable
        let scale = affine.as_coeffs();
        self.width *= scale[0].abs();
        self.height *= scale[3].abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_extent_bounds() {
        let rect = Rectangle::new(Point::new(100.0, 100.0), -50.0, -40.0);
        assert_eq!(rect.bounds(), Rect::new(50.0, 60.0, 100.0, 100.0));
    }

    #[test]
    fn test_hit_test_edges() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 60.0);
        // Edge midpoints
        assert!(rect.hit_test(Point::new(50.0, 0.0)));
        assert!(rect.hit_test(Point::new(100.0, 30.0)));
        assert!(rect.hit_test(Point::new(50.0, 60.0)));
        assert!(rect.hit_test(Point::new(0.0, 30.0)));
        // Interior of an unfilled rectangle
        assert!(!rect.hit_test(Point::new(50.0, 30.0)));
        // 20 px outside
        assert!(!rect.hit_test(Point::new(50.0, -20.0)));
        assert!(!rect.hit_test(Point::new(120.0, 30.0)));
    }

    #[test]
    fn test_hit_test_stops_at_corners() {
        let rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 60.0);
        assert!(rect.hit_test(Point::new(100.0, 60.0)));
        assert!(rect.hit_test(Point::new(95.0, 64.0)));
        // Within the threshold of both edge lines, but past the corner
        assert!(!rect.hit_test(Point::new(105.0, 64.0)));
        assert!(!rect.hit_test(Point::new(-5.0, -5.0)));
    }

    #[test]
    fn test_hit_test_small_rectangle() {
        let rect = Rectangle::new(Point::new(10.0, 10.0), 5.0, 5.0);
        assert!(rect.hit_test(Point::new(12.0, 12.0)));
        assert!(!rect.hit_test(Point::new(20.0, 12.0)));
    }

    #[test]
    fn test_from_rect() {
        let rect = Rectangle::from_rect(Rect::new(100.0, 100.0, 50.0, 50.0));
        assert!((rect.position.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
    }
}
