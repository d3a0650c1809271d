//! Open polyline shape.

use super::{
    HIT_THRESHOLD, ShapeStyle, ShapeTrait, bounds_of_points, point_to_polyline_dist,
    polyline_path,
};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// An open polyline through an ordered list of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Points in drawing order.
    pub points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Path {
    /// Create a path through the given points.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for Path {
    fn bounds(&self) -> Rect {
        bounds_of_points(&self.points)
    }

    fn hit_test(&self, point: Point) -> bool {
        self.points.len() >= 2 && point_to_polyline_dist(point, &self.points) < HIT_THRESHOLD
    }

    fn to_path(&self) -> BezPath {
        polyline_path(&self.points)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        for p in &mut self.points {
            *p = affine * *p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_test_segments() {
        let path = Path::new(vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            Point::new(50.0, 50.0),
        ]);
        assert!(path.hit_test(Point::new(25.0, 5.0)));
        assert!(path.hit_test(Point::new(55.0, 25.0)));
        assert!(!path.hit_test(Point::new(25.0, 25.0)));
    }

    #[test]
    fn test_empty_path() {
        let path = Path::new(Vec::new());
        assert_eq!(path.bounds(), Rect::ZERO);
        assert!(!path.hit_test(Point::ZERO));
    }
}
