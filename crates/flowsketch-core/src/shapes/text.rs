//! Text shape.

use super::{SerializableColor, ShapeStyle, ShapeTrait, average_scale};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// A single line of text anchored at its left baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    /// Left end of the baseline.
    pub position: Point,
    /// Text content.
    pub content: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family name.
    pub font_family: String,
    /// Explicit text color; falls back to the stroke color when absent.
    #[serde(default)]
    pub text_color: Option<SerializableColor>,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 18.0;
    pub const DEFAULT_FONT_FAMILY: &'static str = "Arial";
    /// Smallest font size reachable by resizing.
    pub const MIN_FONT_SIZE: f64 = 8.0;
    /// Estimated horizontal advance per character, as a fraction of the font size.
    const CHAR_ADVANCE: f64 = 0.6;

    /// Create a new text shape.
    pub fn new(position: Point, content: String) -> Self {
        Self {
            position,
            content,
            font_size: Self::DEFAULT_FONT_SIZE,
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            text_color: None,
            style: ShapeStyle::default(),
        }
    }

    /// Set font size (builder pattern).
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Set font family (builder pattern).
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Color the text is painted in.
    pub fn color(&self) -> SerializableColor {
        self.text_color.unwrap_or(self.style.stroke_color)
    }

    /// Estimated rendered width.
    pub fn approximate_width(&self) -> f64 {
        Self::CHAR_ADVANCE * self.font_size * self.content.chars().count() as f64
    }
}

impl ShapeTrait for Text {
    fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y - self.font_size,
            self.position.x + self.approximate_width(),
            self.position.y,
        )
    }

    fn hit_test(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    fn to_path(&self) -> BezPath {
        // Text is rendered separately; the path is its bounding box
        self.bounds().to_path(0.1)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn transform(&mut self, affine: Affine) {
        self.position = affine * self.position;
        let scale = average_scale(affine);
        if (scale - 1.0).abs() > f64::EPSILON {
            self.font_size *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_creation() {
        let text = Text::new(Point::new(10.0, 20.0), "Hello".to_string());
        assert_eq!(text.content, "Hello");
        assert!((text.font_size - 18.0).abs() < f64::EPSILON);
        assert_eq!(text.font_family, "Arial");
        assert_eq!(text.color(), SerializableColor::BLACK);
    }

    #[test]
    fn test_bounds() {
        let text = Text::new(Point::new(10.0, 40.0), "abcd".to_string()).with_font_size(20.0);
        let bounds = text.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 58.0).abs() < 1e-9);
        assert!((bounds.y1 - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new(Point::new(0.0, 20.0), "Hi".to_string());
        assert!(text.hit_test(Point::new(5.0, 10.0)));
        assert!(text.hit_test(Point::new(0.0, 20.0)));
        assert!(!text.hit_test(Point::new(5.0, 25.0)));
        assert!(!text.hit_test(Point::new(40.0, 10.0)));
    }

    #[test]
    fn test_explicit_text_color() {
        let mut text = Text::new(Point::ZERO, "x".to_string());
        text.text_color = Some(SerializableColor::new(255, 0, 0, 255));
        assert_eq!(text.color(), SerializableColor::new(255, 0, 0, 255));
    }
}
