//! Line shape.

use super::{
    HIT_THRESHOLD, ShapeStyle, ShapeTrait, bounds_of_points, point_to_polyline_dist,
    polyline_path,
};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A line segment, or a polyline when intermediate points are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
    /// Intermediate points (for polylines).
    #[serde(default)]
    pub intermediate_points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            intermediate_points: Vec::new(),
            style: ShapeStyle::default(),
        }
    }

    /// Create a polyline from multiple points. Needs at least two points.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        let (start, end, intermediate_points) = split_points(points)?;
        Some(Self {
            start,
            end,
            intermediate_points,
            style: ShapeStyle::default(),
        })
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

    /// Get the length of the line (sum of segment lengths).
    pub fn length(&self) -> f64 {
        self.all_points()
            .windows(2)
            .map(|w| (w[1] - w[0]).hypot())
            .sum()
    }
}

/// Split a point list into start, end and the points in between.
pub(super) fn split_points(mut points: Vec<Point>) -> Option<(Point, Point, Vec<Point>)> {
    if points.len() < 2 {
        return None;
    }
    let end = points.pop()?;
    let start = points.remove(0);
    Some((start, end, points))
}

/// Write `point` into slot `index` of the sequence `start, intermediate.., end`.
pub(super) fn set_indexed_point(
    start: &mut Point,
    intermediate: &mut [Point],
    end: &mut Point,
    index: usize,
    point: Point,
) -> bool {
    let last = intermediate.len() + 1;
    if index == 0 {
        *start = point;
    } else if index == last {
        *end = point;
    } else if let Some(slot) = intermediate.get_mut(index - 1) {
        *slot = point;
    } else {
        return false;
    }
    true
}

impl ShapeTrait for Line {
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_creation() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert_eq!(line.point_count(), 2);
        assert_eq!(line.all_points(), vec![line.start, line.end]);
    }

    #[test]
    fn test_from_points_requires_two() {
        assert!(Line::from_points(vec![Point::new(1.0, 1.0)]).is_none());
        let line = Line::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap();
        assert_eq!(line.start, Point::new(0.0, 0.0));
        assert_eq!(line.end, Point::new(10.0, 0.0));
        assert_eq!(line.intermediate_points, vec![Point::new(5.0, 5.0)]);
    }

    #[test]
    fn test_set_point() {
        let mut line = Line::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(line.set_point(1, Point::new(5.0, 10.0)));
        assert!(line.set_point(2, Point::new(20.0, 0.0)));
        assert!(!line.set_point(3, Point::ZERO));
        assert_eq!(
            line.all_points(),
            vec![
                Point::new(0.0, 0.0),
                Point::new(5.0, 10.0),
                Point::new(20.0, 0.0)
            ]
        );
    }

    #[test]
    fn test_hit_test_on_line() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!(line.hit_test(Point::new(50.0, 0.0)));
        assert!(line.hit_test(Point::new(50.0, 9.0)));
        assert!(!line.hit_test(Point::new(50.0, 10.0)));
        assert!(!line.hit_test(Point::new(50.0, 20.0)));
    }

    #[test]
    fn test_bounds() {
        let line = Line::new(Point::new(100.0, 50.0), Point::new(0.0, 0.0));
        assert_eq!(line.bounds(), Rect::new(0.0, 0.0, 100.0, 50.0));
    }
}
