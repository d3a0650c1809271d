//! Circle shape.

use super::{HIT_THRESHOLD, MIN_SIZE, ShapeStyle, ShapeTrait, average_scale};
use kurbo::{Affine, BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A circle defined by its center and radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point.
    pub center: Point,
    /// Radius (non-negative).
    pub radius: f64,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Circle {
    /// Create a new circle.
    pub fn new(center: Point, radius: f64) -> Self {
        Self {
            center,
            radius: radius.abs(),
            style: ShapeStyle::default(),
        }
    }

    /// Point on the circle where the radius handle sits.
    pub fn radius_point(&self) -> Point {
        Point::new(self.center.x + self.radius, self.center.y)
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center, self.radius)
    }
}

impl ShapeTrait for Circle {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (self.radius * 2.0, self.radius * 2.0))
    }

    fn hit_test(&self, point: Point) -> bool {
        let dist = (point - self.center).hypot();
        if self.radius < MIN_SIZE {
            dist <= self.radius + 2.0
        } else {
            (dist - self.radius).abs() < HIT_THRESHOLD
        }
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.center = affine * self.center;
        self.radius *= average_scale(affine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_ring() {
        let circle = Circle::new(Point::new(50.0, 50.0), 30.0);
        assert!(circle.hit_test(Point::new(80.0, 50.0)));
        assert!(circle.hit_test(Point::new(50.0, 25.0)));
        assert!(!circle.hit_test(Point::new(50.0, 50.0)));
        assert!(!circle.hit_test(Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_hit_test_small_circle() {
        let circle = Circle::new(Point::new(0.0, 0.0), 4.0);
        assert!(circle.hit_test(Point::new(0.0, 0.0)));
        assert!(circle.hit_test(Point::new(6.0, 0.0)));
        assert!(!circle.hit_test(Point::new(6.5, 0.0)));
    }

    #[test]
    fn test_bounds() {
        let circle = Circle::new(Point::new(10.0, 20.0), 5.0);
        assert_eq!(circle.bounds(), Rect::new(5.0, 15.0, 15.0, 25.0));
        assert_eq!(circle.radius_point(), Point::new(15.0, 20.0));
    }
}
