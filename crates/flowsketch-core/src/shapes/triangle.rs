//! Isosceles triangle shape.

use super::{
    HIT_THRESHOLD, MIN_SIZE, ShapeStyle, ShapeTrait, point_in_polygon, point_to_polygon_dist,
    polygon_path,
};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// An isosceles triangle spanned by a bounding diagonal.
///
/// The apex sits at `(mid x, start.y)` and the base runs along `end.y`, so dragging upward
/// produces a triangle pointing down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// First corner of the diagonal (apex row).
    pub start: Point,
    /// Second corner of the diagonal (base row).
    pub end: Point,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Triangle {
    /// Create a triangle over the diagonal `start → end`.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            style: ShapeStyle::default(),
        }
    }

    /// Apex, base-left (at `start.x`) and base-right (at `end.x`) vertices.
    pub fn vertices(&self) -> [Point; 3] {
        [
            Point::new((self.start.x + self.end.x) / 2.0, self.start.y),
            Point::new(self.start.x, self.end.y),
            Point::new(self.end.x, self.end.y),
        ]
    }

    /// Midpoint of the diagonal.
    pub fn center(&self) -> Point {
        self.start.midpoint(self.end)
    }

    /// Whether the apex is above the base.
    pub fn points_up(&self) -> bool {
        self.start.y <= self.end.y
    }
}

impl ShapeTrait for Triangle {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    fn hit_test(&self, point: Point) -> bool {
        let vertices = self.vertices();
        let w = (self.end.x - self.start.x).abs();
        let h = (self.end.y - self.start.y).abs();
        if w < MIN_SIZE && h < MIN_SIZE {
            point_in_polygon(point, &vertices)
        } else {
            point_to_polygon_dist(point, &vertices) < HIT_THRESHOLD
        }
    }

    fn to_path(&self) -> BezPath {
        polygon_path(&self.vertices())
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_apex_up() {
        let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(100.0, 80.0));
        assert_eq!(
            tri.vertices(),
            [
                Point::new(50.0, 0.0),
                Point::new(0.0, 80.0),
                Point::new(100.0, 80.0)
            ]
        );
        assert!(tri.points_up());
        assert_eq!(tri.center(), Point::new(50.0, 40.0));
    }

    #[test]
    fn test_hit_test_edges() {
        let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(100.0, 80.0));
        // Base midpoint and apex
        assert!(tri.hit_test(Point::new(50.0, 80.0)));
        assert!(tri.hit_test(Point::new(50.0, 0.0)));
        // Centroid area is not on an edge
        assert!(!tri.hit_test(Point::new(50.0, 50.0)));
        assert!(!tri.hit_test(Point::new(50.0, 100.0)));
    }

    #[test]
    fn test_hit_test_small_triangle() {
        let tri = Triangle::new(Point::new(0.0, 0.0), Point::new(6.0, 6.0));
        assert!(tri.hit_test(Point::new(3.0, 4.0)));
        assert!(!tri.hit_test(Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_bounds_normalized() {
        let tri = Triangle::new(Point::new(100.0, 80.0), Point::new(0.0, 0.0));
        assert_eq!(tri.bounds(), Rect::new(0.0, 0.0, 100.0, 80.0));
        assert!(!tri.points_up());
    }
}
