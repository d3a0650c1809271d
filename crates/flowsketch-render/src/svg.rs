//! Standalone SVG rendering of interchange records.

use crate::renderer::{RenderResult, RendererError};
use flowsketch_core::color::SerializableColor;
use flowsketch_core::interchange::{
    CoordinateSpace, RecordKind, ShapeRecord, export_shapes, records_from_document,
};
use flowsketch_core::shapes::{Arrow, Shape, arrowhead_points};
use kurbo::Point;
use serde_json::Value;
use std::fmt::Write;

const DEFAULT_STROKE: &str = "#000000";
const DEFAULT_STROKE_WIDTH: f64 = 1.0;
const NO_FILL: &str = "none";

/// Renders interchange records into an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderer {
    width: f64,
    height: f64,
    background: Option<String>,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl SvgRenderer {
    /// Create a renderer for a `width` x `height` canvas on a white background.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Some("white".to_string()),
        }
    }

    /// Set the background fill; `"none"` or an empty string omits the background.
    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        let background = background.into();
        self.background = if background.is_empty() || background == NO_FILL {
            None
        } else {
            Some(background)
        };
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Render a shape list through the interchange export.
    pub fn render_shapes(&self, shapes: &[Shape], space: &CoordinateSpace) -> RenderResult<String> {
        self.render_records(&export_shapes(shapes, space))
    }

    /// Render a raw interchange document. Undecodable records are skipped.
    pub fn render_document(&self, document: &Value) -> RenderResult<String> {
        let records = records_from_document(document)
            .map_err(|e| RendererError::RenderFailed(e.to_string()))?;
        self.render_records(&records)
    }

    /// Render interchange records.
    pub fn render_records(&self, records: &[ShapeRecord]) -> RenderResult<String> {
        let (w, h) = (num(self.width), num(self.height));
        let mut out = String::new();
        write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        if let Some(background) = &self.background {
            write!(
                out,
                r#"<rect width="{w}" height="{h}" fill="{}"/>"#,
                escape(background)
            )?;
        }
        for record in records {
            if !write_record(&mut out, record)? {
                log::warn!(
                    "Skipping {} record without geometry",
                    record.shape_type.as_str()
                );
            }
        }
        out.push_str("</svg>");
        Ok(out)
    }
}

/// Write one record. Returns `Ok(false)` when the record lacks its geometry.
fn write_record(out: &mut String, record: &ShapeRecord) -> RenderResult<bool> {
    let stroke = resolve_paint(record.stroke_color.as_deref(), DEFAULT_STROKE);
    let width = num(record.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH));
    let fill = resolve_paint(record.fill_color.as_deref(), NO_FILL);
    let paint = format!(r#"stroke="{stroke}" stroke-width="{width}""#);

    match record.shape_type {
        RecordKind::Polyline => {
            let Some(points) = record.kurbo_points().filter(|p| p.len() >= 2) else {
                return Ok(false);
            };
            write!(
                out,
                r#"<polyline points="{}" {paint} fill="none"/>"#,
                point_list(&points)
            )?;
        }
        RecordKind::Arrow => {
            let Some(points) = record.kurbo_points().filter(|p| p.len() >= 2) else {
                return Ok(false);
            };
            if let [a, b] = points[..] {
                write!(
                    out,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {paint}/>"#,
                    num(a.x),
                    num(a.y),
                    num(b.x),
                    num(b.y)
                )?;
            } else {
                write!(
                    out,
                    r#"<polyline points="{}" {paint} fill="none"/>"#,
                    point_list(&points)
                )?;
            }

            let length = record.arrowhead_size.unwrap_or(Arrow::MIN_HEAD_LENGTH);
            let n = points.len();
            if record.head_at_end() {
                let head = arrowhead_points(points[n - 2], points[n - 1], length);
                write!(out, r#"<polygon points="{}" fill="{stroke}"/>"#, point_list(&head))?;
            }
            if record.head_at_start() {
                let head = arrowhead_points(points[1], points[0], length);
                write!(out, r#"<polygon points="{}" fill="{stroke}"/>"#, point_list(&head))?;
            }
        }
        RecordKind::Rectangle => {
            let (Some(c), Some(s)) = (record.center(), record.scale()) else {
                return Ok(false);
            };
            let (sw, sh) = (s.x.abs(), s.y.abs());
            write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}" {paint} fill="{fill}"/>"#,
                num(c.x - sw / 2.0),
                num(c.y - sh / 2.0),
                num(sw),
                num(sh)
            )?;
        }
        RecordKind::Circle => {
            let (Some(c), Some(sx)) = (record.center(), record.scale_x) else {
                return Ok(false);
            };
            write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}" {paint} fill="{fill}"/>"#,
                num(c.x),
                num(c.y),
                num(sx.abs() / 2.0)
            )?;
        }
        RecordKind::Ellipse => {
            let (Some(c), Some(s)) = (record.center(), record.scale()) else {
                return Ok(false);
            };
            write!(
                out,
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" {paint} fill="{fill}"/>"#,
                num(c.x),
                num(c.y),
                num(s.x.abs() / 2.0),
                num(s.y.abs() / 2.0)
            )?;
        }
        RecordKind::Triangle => {
            let (Some(c), Some(s)) = (record.center(), record.scale()) else {
                return Ok(false);
            };
            // Apex on the start edge, base on the end edge
            let vertices = [
                Point::new(c.x, c.y - s.y / 2.0),
                Point::new(c.x - s.x / 2.0, c.y + s.y / 2.0),
                Point::new(c.x + s.x / 2.0, c.y + s.y / 2.0),
            ];
            write!(
                out,
                r#"<polygon points="{}" {paint} fill="{fill}"/>"#,
                point_list(&vertices)
            )?;
        }
        RecordKind::Text => {
            let (Some(anchor), Some(content)) = (record.center(), record.text.as_deref()) else {
                return Ok(false);
            };
            let color = resolve_paint(
                record.text_color.as_deref().or(record.stroke_color.as_deref()),
                DEFAULT_STROKE,
            );
            write!(
                out,
                r#"<text x="{}" y="{}" fill="{}" font-size="{}" font-family="{}">{}</text>"#,
                num(anchor.x),
                num(anchor.y),
                color,
                num(record.font_size.unwrap_or(18.0)),
                escape(record.font_family.as_deref().unwrap_or("Arial")),
                escape(content)
            )?;
        }
    }
    Ok(true)
}

/// Resolve a paint value to `#rrggbb` or `none`.
fn resolve_paint(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        None => default.to_string(),
        Some(v) if v.is_empty() || v.eq_ignore_ascii_case(NO_FILL) => NO_FILL.to_string(),
        Some(v) => SerializableColor::resolve(v).to_hex(),
    }
}

fn point_list(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a coordinate with at most three decimals.
fn num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

/// Escape XML special characters in text and attribute values.
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
