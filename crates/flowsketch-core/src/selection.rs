//! Selection handles and drag manipulation.

use crate::shapes::{Shape, ShapeTrait, Text};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Radius of a drawn handle marker in pixels.
pub const HANDLE_RADIUS: f64 = 6.0;
/// Handle hit tolerance in pixels (strict).
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Font size change per pixel of vertical drag on a text handle.
const TEXT_RESIZE_FACTOR: f64 = 0.3;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle for box-like shapes.
    Corner(Corner),
    /// Edge midpoint handle for box-like shapes.
    Edge(Edge),
    /// First or last point of a line/arrow.
    Endpoint(Endpoint),
    /// Interior point of a line/arrow (index into the full point list).
    Interior(usize),
    /// Radius handle for circles.
    Radius,
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Line endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    Start,
    End,
}

impl HandleKind {
    /// Stable string id (`tl`, `mr`, `p1`, `mid_2`, `r`, ...).
    pub fn id(&self) -> String {
        match self {
            HandleKind::Corner(Corner::TopLeft) => "tl".to_string(),
            HandleKind::Corner(Corner::TopRight) => "tr".to_string(),
            HandleKind::Corner(Corner::BottomLeft) => "bl".to_string(),
            HandleKind::Corner(Corner::BottomRight) => "br".to_string(),
            HandleKind::Edge(Edge::Top) => "tm".to_string(),
            HandleKind::Edge(Edge::Right) => "mr".to_string(),
            HandleKind::Edge(Edge::Bottom) => "bm".to_string(),
            HandleKind::Edge(Edge::Left) => "ml".to_string(),
            HandleKind::Endpoint(Endpoint::Start) => "p1".to_string(),
            HandleKind::Endpoint(Endpoint::End) => "p2".to_string(),
            HandleKind::Interior(i) => format!("mid_{i}"),
            HandleKind::Radius => "r".to_string(),
        }
    }

    /// Parse a handle id produced by [`HandleKind::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        let kind = match id {
            "tl" => HandleKind::Corner(Corner::TopLeft),
            "tr" => HandleKind::Corner(Corner::TopRight),
            "bl" => HandleKind::Corner(Corner::BottomLeft),
            "br" => HandleKind::Corner(Corner::BottomRight),
            "tm" => HandleKind::Edge(Edge::Top),
            "mr" => HandleKind::Edge(Edge::Right),
            "bm" => HandleKind::Edge(Edge::Bottom),
            "ml" => HandleKind::Edge(Edge::Left),
            "p1" => HandleKind::Endpoint(Endpoint::Start),
            "p2" => HandleKind::Endpoint(Endpoint::End),
            "r" => HandleKind::Radius,
            other => HandleKind::Interior(other.strip_prefix("mid_")?.parse().ok()?),
        };
        Some(kind)
    }

    /// Which box edges (left, top, right, bottom) a box handle drags.
    fn box_edges(&self) -> Option<(bool, bool, bool, bool)> {
        match self {
            HandleKind::Corner(Corner::TopLeft) => Some((true, true, false, false)),
            HandleKind::Corner(Corner::TopRight) => Some((false, true, true, false)),
            HandleKind::Corner(Corner::BottomLeft) => Some((true, false, false, true)),
            HandleKind::Corner(Corner::BottomRight) => Some((false, false, true, true)),
            HandleKind::Edge(Edge::Top) => Some((false, true, false, false)),
            HandleKind::Edge(Edge::Right) => Some((false, false, true, false)),
            HandleKind::Edge(Edge::Bottom) => Some((false, false, false, true)),
            HandleKind::Edge(Edge::Left) => Some((true, false, false, false)),
            _ => None,
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in surface coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point lies strictly within [`HANDLE_HIT_TOLERANCE`] of this handle.
    pub fn hit_test(&self, point: Point) -> bool {
        (point - self.position).hypot() < HANDLE_HIT_TOLERANCE
    }
}

/// Get the selection handles for a shape.
pub fn get_handles(shape: &Shape) -> Vec<Handle> {
    match shape {
        Shape::Line(line) => point_handles(&line.all_points()),
        Shape::Arrow(arrow) => point_handles(&arrow.all_points()),
        Shape::Circle(circle) => vec![Handle::new(circle.radius_point(), HandleKind::Radius)],
        Shape::Path(_) => Vec::new(),
        Shape::Rectangle(_) | Shape::Ellipse(_) | Shape::Triangle(_) | Shape::Text(_) => {
            box_handles(shape.bounds())
        }
    }
}

/// Eight handles around a bounding box, in `tl, tm, tr, ml, mr, bl, bm, br` order.
fn box_handles(bounds: Rect) -> Vec<Handle> {
    let center = bounds.center();
    vec![
        Handle::new(Point::new(bounds.x0, bounds.y0), HandleKind::Corner(Corner::TopLeft)),
        Handle::new(Point::new(center.x, bounds.y0), HandleKind::Edge(Edge::Top)),
        Handle::new(Point::new(bounds.x1, bounds.y0), HandleKind::Corner(Corner::TopRight)),
        Handle::new(Point::new(bounds.x0, center.y), HandleKind::Edge(Edge::Left)),
        Handle::new(Point::new(bounds.x1, center.y), HandleKind::Edge(Edge::Right)),
        Handle::new(Point::new(bounds.x0, bounds.y1), HandleKind::Corner(Corner::BottomLeft)),
        Handle::new(Point::new(center.x, bounds.y1), HandleKind::Edge(Edge::Bottom)),
        Handle::new(Point::new(bounds.x1, bounds.y1), HandleKind::Corner(Corner::BottomRight)),
    ]
}

/// `p1`, one `mid_<i>` per interior point, then `p2`.
fn point_handles(points: &[Point]) -> Vec<Handle> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };
    let Some((&last, interior)) = rest.split_last() else {
        return vec![Handle::new(first, HandleKind::Endpoint(Endpoint::Start))];
    };
    let mut handles = vec![Handle::new(first, HandleKind::Endpoint(Endpoint::Start))];
    for (i, &pt) in interior.iter().enumerate() {
        handles.push(Handle::new(pt, HandleKind::Interior(i + 1)));
    }
    handles.push(Handle::new(last, HandleKind::Endpoint(Endpoint::End)));
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(shape: &Shape, point: Point) -> Option<HandleKind> {
    get_handles(shape)
        .into_iter()
        .find(|handle| handle.hit_test(point))
        .map(|handle| handle.kind)
}

/// State of an active drag on a single shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Index of the shape being dragged.
    pub index: usize,
    /// The handle being dragged (None = moving the whole shape).
    pub handle: Option<HandleKind>,
    /// Starting point of the drag.
    pub start_point: Point,
    /// Current point of the drag.
    pub current_point: Point,
    /// Shape as it was when the drag started.
    pub original_shape: Shape,
}

impl DragSession {
    /// Create a new drag session.
    pub fn new(
        index: usize,
        handle: Option<HandleKind>,
        start_point: Point,
        original_shape: Shape,
    ) -> Self {
        Self {
            index,
            handle,
            start_point,
            current_point: start_point,
            original_shape,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Shape resulting from applying the current drag to the snapshot.
    pub fn apply(&self) -> Shape {
        apply_manipulation(
            &self.original_shape,
            self.handle,
            self.delta(),
            self.current_point,
        )
    }
}

/// Apply a handle manipulation to a snapshot of a shape and return the result.
///
/// `delta` is the drag offset since the snapshot was taken; `pointer` is the current pointer
/// position (used by the circle radius handle, which follows the pointer absolutely).
/// Handles that do not apply to the shape's kind leave it unchanged.
pub fn apply_manipulation(
    shape: &Shape,
    handle: Option<HandleKind>,
    delta: Vec2,
    pointer: Point,
) -> Shape {
    let mut shape = shape.clone();
    let kind = shape.kind();

    let Some(handle) = handle else {
        shape.translate(delta);
        return shape;
    };

    match (&mut shape, handle) {
        (Shape::Line(line), HandleKind::Endpoint(end)) => {
            let index = match end {
                Endpoint::Start => 0,
                Endpoint::End => line.point_count() - 1,
            };
            let moved = line.all_points()[index] + delta;
            line.set_point(index, moved);
        }
        (Shape::Line(line), HandleKind::Interior(index)) => {
            if let Some(&pt) = line.all_points().get(index) {
                line.set_point(index, pt + delta);
            }
        }
        (Shape::Arrow(arrow), HandleKind::Endpoint(end)) => {
            let index = match end {
                Endpoint::Start => 0,
                Endpoint::End => arrow.point_count() - 1,
            };
            let moved = arrow.all_points()[index] + delta;
            arrow.set_point(index, moved);
        }
        (Shape::Arrow(arrow), HandleKind::Interior(index)) => {
            if let Some(&pt) = arrow.all_points().get(index) {
                arrow.set_point(index, pt + delta);
            }
        }
        (Shape::Circle(circle), HandleKind::Radius) => {
            circle.radius = (pointer - circle.center).hypot();
        }
        (Shape::Text(text), HandleKind::Corner(_) | HandleKind::Edge(_)) => {
            text.font_size = (text.font_size + delta.y * TEXT_RESIZE_FACTOR).max(Text::MIN_FONT_SIZE);
        }
        (Shape::Rectangle(rect), _) => {
            if let Some(b) = resize_box(rect.as_rect(), handle, delta) {
                rect.position = Point::new(b.x0, b.y0);
                rect.width = b.x1 - b.x0;
                rect.height = b.y1 - b.y0;
            }
        }
        (Shape::Ellipse(ellipse), _) => {
            if let Some(b) = resize_box(ellipse.bounds(), handle, delta) {
                ellipse.center = b.center();
                ellipse.radius_x = b.width().abs() / 2.0;
                ellipse.radius_y = b.height().abs() / 2.0;
            }
        }
        (Shape::Triangle(tri), _) => {
            let points_up = tri.points_up();
            if let Some(b) = resize_box(tri.bounds(), handle, delta) {
                let (apex_y, base_y) = if points_up { (b.y0, b.y1) } else { (b.y1, b.y0) };
                tri.start = Point::new(b.x0, apex_y);
                tri.end = Point::new(b.x1, base_y);
            }
        }
        _ => {
            log::debug!("Handle {} does not apply to {}", handle.id(), kind.name());
        }
    }

    shape
}

/// Move the edges of a normalized box selected by a box handle.
///
/// The result is not re-normalized, so dragging an edge past its opposite yields a
/// negative extent.
fn resize_box(bounds: Rect, handle: HandleKind, delta: Vec2) -> Option<Rect> {
    let (left, top, right, bottom) = handle.box_edges()?;
    let mut b = bounds;
    if left {
        b.x0 += delta.x;
    }
    if top {
        b.y0 += delta.y;
    }
    if right {
        b.x1 += delta.x;
    }
    if bottom {
        b.y1 += delta.y;
    }
    Some(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Arrow, Circle, Ellipse, Line, Path, Rectangle, Triangle};

    const EPS: f64 = 1e-9;

    fn handle_at(handles: &[Handle], id: &str) -> Point {
        handles
            .iter()
            .find(|h| h.kind.id() == id)
            .map(|h| h.position)
            .unwrap()
    }

    #[test]
    fn test_box_handles_reconstruct_bounds() {
        let shapes: Vec<Shape> = vec![
            Rectangle::new(Point::new(10.0, 20.0), 40.0, 30.0).into(),
            Rectangle::new(Point::new(50.0, 50.0), -40.0, -30.0).into(),
            Ellipse::new(Point::new(0.0, 0.0), 25.0, 10.0).into(),
            Triangle::new(Point::new(5.0, 90.0), Point::new(65.0, 10.0)).into(),
            Text::new(Point::new(3.0, 40.0), "label".to_string()).into(),
        ];
        for shape in shapes {
            let handles = get_handles(&shape);
            let ids: Vec<String> = handles.iter().map(|h| h.kind.id()).collect();
            assert_eq!(ids, ["tl", "tm", "tr", "ml", "mr", "bl", "bm", "br"]);

            let tl = handle_at(&handles, "tl");
            let br = handle_at(&handles, "br");
            let bounds = shape.bounds();
            assert!((tl.x - bounds.x0).abs() < EPS && (tl.y - bounds.y0).abs() < EPS);
            assert!((br.x - bounds.x1).abs() < EPS && (br.y - bounds.y1).abs() < EPS);
            let tm = handle_at(&handles, "tm");
            assert!((tm.x - bounds.center().x).abs() < EPS);
        }
    }

    #[test]
    fn test_line_handles() {
        let line = Line::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 10.0),
        ])
        .unwrap();
        let ids: Vec<String> = get_handles(&line.into()).iter().map(|h| h.kind.id()).collect();
        assert_eq!(ids, ["p1", "mid_1", "mid_2", "p2"]);
    }

    #[test]
    fn test_circle_and_path_handles() {
        let circle: Shape = Circle::new(Point::new(10.0, 10.0), 5.0).into();
        let handles = get_handles(&circle);
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].position, Point::new(15.0, 10.0));
        assert_eq!(handles[0].kind, HandleKind::Radius);

        let path: Shape = Path::new(vec![Point::ZERO, Point::new(5.0, 5.0)]).into();
        assert!(get_handles(&path).is_empty());
    }

    #[test]
    fn test_handle_ids_round_trip() {
        for id in ["tl", "tm", "tr", "ml", "mr", "bl", "bm", "br", "p1", "p2", "mid_3", "r"] {
            assert_eq!(HandleKind::from_id(id).unwrap().id(), id);
        }
        assert!(HandleKind::from_id("mid_x").is_none());
        assert!(HandleKind::from_id("zz").is_none());
    }

    #[test]
    fn test_handle_hit_test() {
        let handle = Handle::new(Point::new(50.0, 50.0), HandleKind::Radius);
        assert!(handle.hit_test(Point::new(50.0, 50.0)));
        assert!(handle.hit_test(Point::new(55.0, 55.0)));
        assert!(!handle.hit_test(Point::new(58.0, 50.0)));
    }

    #[test]
    fn test_hit_test_handles_first_match() {
        let rect: Shape = Rectangle::new(Point::new(0.0, 0.0), 100.0, 60.0).into();
        assert_eq!(
            hit_test_handles(&rect, Point::new(99.0, 61.0)),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(hit_test_handles(&rect, Point::new(50.0, 30.0)), None);
    }

    fn resized_rect(handle: &str, delta: Vec2) -> (f64, f64, f64, f64) {
        let rect: Shape = Rectangle::new(Point::new(10.0, 10.0), 40.0, 30.0).into();
        let result = apply_manipulation(&rect, HandleKind::from_id(handle), delta, Point::ZERO);
        let Shape::Rectangle(r) = result else {
            panic!("Expected Rectangle shape");
        };
        (r.position.x, r.position.y, r.width, r.height)
    }

    #[test]
    fn test_rectangle_corner_resize() {
        assert_eq!(resized_rect("br", Vec2::new(5.0, 5.0)), (10.0, 10.0, 45.0, 35.0));
        assert_eq!(resized_rect("tl", Vec2::new(5.0, 5.0)), (15.0, 15.0, 35.0, 25.0));
        assert_eq!(resized_rect("mr", Vec2::new(5.0, 5.0)), (10.0, 10.0, 45.0, 30.0));
        assert_eq!(resized_rect("tm", Vec2::new(5.0, 5.0)), (10.0, 15.0, 40.0, 25.0));
    }

    #[test]
    fn test_ellipse_resize_via_box() {
        let ellipse: Shape = Ellipse::new(Point::new(50.0, 50.0), 20.0, 10.0).into();
        let result = apply_manipulation(
            &ellipse,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(10.0, 20.0),
            Point::ZERO,
        );
        let Shape::Ellipse(e) = result else {
            panic!("Expected Ellipse shape");
        };
        assert_eq!(e.center, Point::new(55.0, 60.0));
        assert!((e.radius_x - 25.0).abs() < EPS);
        assert!((e.radius_y - 20.0).abs() < EPS);
    }

    #[test]
    fn test_triangle_resize_keeps_orientation() {
        let tri: Shape = Triangle::new(Point::new(0.0, 100.0), Point::new(100.0, 0.0)).into();
        let result = apply_manipulation(
            &tri,
            Some(HandleKind::Edge(Edge::Bottom)),
            Vec2::new(0.0, 20.0),
            Point::ZERO,
        );
        let Shape::Triangle(t) = result else {
            panic!("Expected Triangle shape");
        };
        assert!(!t.points_up());
        assert_eq!(t.start, Point::new(0.0, 120.0));
        assert_eq!(t.end, Point::new(100.0, 0.0));
    }

    #[test]
    fn test_line_point_handles() {
        let line: Shape = Line::from_points(vec![
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 0.0),
        ])
        .unwrap()
        .into();
        let delta = Vec2::new(10.0, -10.0);
        let moved_mid = apply_manipulation(&line, Some(HandleKind::Interior(1)), delta, Point::ZERO);
        let Shape::Line(l) = moved_mid else {
            panic!("Expected Line shape");
        };
        assert_eq!(l.intermediate_points, vec![Point::new(60.0, 40.0)]);

        let moved_end = apply_manipulation(
            &line,
            Some(HandleKind::Endpoint(Endpoint::End)),
            delta,
            Point::ZERO,
        );
        let Shape::Line(l) = moved_end else {
            panic!("Expected Line shape");
        };
        assert_eq!(l.end, Point::new(110.0, -10.0));
        assert_eq!(l.start, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_arrow_start_handle() {
        let arrow: Shape = Arrow::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).into();
        let result = apply_manipulation(
            &arrow,
            Some(HandleKind::Endpoint(Endpoint::Start)),
            Vec2::new(-5.0, 5.0),
            Point::ZERO,
        );
        let Shape::Arrow(a) = result else {
            panic!("Expected Arrow shape");
        };
        assert_eq!(a.start, Point::new(-5.0, 5.0));
    }

    #[test]
    fn test_circle_radius_follows_pointer() {
        let circle: Shape = Circle::new(Point::new(0.0, 0.0), 10.0).into();
        let result = apply_manipulation(
            &circle,
            Some(HandleKind::Radius),
            Vec2::new(100.0, 100.0),
            Point::new(30.0, 40.0),
        );
        let Shape::Circle(c) = result else {
            panic!("Expected Circle shape");
        };
        assert!((c.radius - 50.0).abs() < EPS);
    }

    #[test]
    fn test_text_resize_changes_font_size() {
        let text: Shape = Text::new(Point::new(0.0, 20.0), "hi".to_string()).into();
        let grown = apply_manipulation(
            &text,
            Some(HandleKind::Corner(Corner::BottomRight)),
            Vec2::new(0.0, 10.0),
            Point::ZERO,
        );
        let Shape::Text(t) = grown else {
            panic!("Expected Text shape");
        };
        assert!((t.font_size - 21.0).abs() < EPS);

        let shrunk = apply_manipulation(
            &text,
            Some(HandleKind::Edge(Edge::Top)),
            Vec2::new(0.0, -100.0),
            Point::ZERO,
        );
        let Shape::Text(t) = shrunk else {
            panic!("Expected Text shape");
        };
        assert!((t.font_size - Text::MIN_FONT_SIZE).abs() < EPS);
    }

    #[test]
    fn test_move_and_mismatched_handle() {
        let rect: Shape = Rectangle::new(Point::new(10.0, 10.0), 40.0, 30.0).into();
        let moved = apply_manipulation(&rect, None, Vec2::new(5.0, -5.0), Point::ZERO);
        assert_eq!(moved.bounds(), Rect::new(15.0, 5.0, 55.0, 35.0));

        let unchanged = apply_manipulation(&rect, Some(HandleKind::Radius), Vec2::new(5.0, 5.0), Point::ZERO);
        assert_eq!(unchanged, rect);
    }

    #[test]
    fn test_drag_session_delta() {
        let rect: Shape = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0).into();
        let mut session = DragSession::new(0, None, Point::new(5.0, 5.0), rect);
        session.current_point = Point::new(8.0, 1.0);
        assert_eq!(session.delta(), Vec2::new(3.0, -4.0));
        assert_eq!(session.apply().bounds(), Rect::new(3.0, -4.0, 13.0, 6.0));
    }
}
