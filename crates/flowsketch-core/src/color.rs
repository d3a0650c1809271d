//! Color values and resolution of loosely written color names.
//!
//! A color string resolves in this order:
//! 1. CSS color syntax (hex, `rgb()`, `hsl()`, named colors) through `peniko::color`.
//! 2. A sketch phrase: an optional run of modifiers (`pastel`, `dark`, `desaturate-20`, ...)
//!    followed by a base color, e.g. `"baby matcha"` or `"desaturate 30% navy"`.
//! 3. The input with spaces removed, so `"papaya whip"` finds `papayawhip`.
//!
//! Anything else resolves to black.

use peniko::Color;
use peniko::color::{AlphaColor, Hsl, Srgb, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Base colors that are not CSS names.
const SKETCH_COLORS: &[(&str, &str)] = &[
    ("matcha", "#a3c686"),
    ("baby blue", "#a7c7e7"),
    ("baby pink", "#f6c1cf"),
    ("baby purple", "#cab8ff"),
    ("pastel blue", "#aec6ff"),
    ("pastel green", "#bfe3b4"),
    ("pastel yellow", "#fff4a3"),
    ("pastel pink", "#ffcfe1"),
    ("pastel purple", "#cbb9ff"),
    ("mint", "#aee5c9"),
    ("peach", "#ffcba4"),
    ("cream", "#fffdd0"),
    ("sage", "#9caf88"),
    ("charcoal", "#36454f"),
];

/// Modifier words as (saturation, lightness) shifts in HSL percentage points.
const MODIFIERS: &[(&str, f32, f32)] = &[
    ("baby", -25.0, 20.0),
    ("pastel", -30.0, 18.0),
    ("light", 0.0, 15.0),
    ("dark", 0.0, -15.0),
    ("bright", 20.0, 0.0),
    ("deep", 10.0, -10.0),
    ("neon", 35.0, 0.0),
];

impl SerializableColor {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Resolve a color string; `None` when nothing matches.
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.trim().to_ascii_lowercase();
        if name.is_empty() {
            return None;
        }
        css_color(&name)
            .or_else(|| phrase_color(&name))
            .or_else(|| css_color(&name.replace(' ', "")))
    }

    /// Resolve a color string, falling back to black.
    pub fn resolve(input: &str) -> Self {
        Self::parse(input).unwrap_or_else(|| {
            log::debug!("Unrecognized color {input:?}, using black");
            Self::BLACK
        })
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Shift saturation and lightness by percentage points, keeping hue and alpha.
    pub fn adjust_hsl(self, d_saturation: f32, d_lightness: f32) -> Self {
        self.map_hsl(|s, l| {
            (
                (s + d_saturation).clamp(0.0, 100.0),
                (l + d_lightness).clamp(0.0, 100.0),
            )
        })
    }

    /// Scale saturation down by `percent` (clamped to 0..=100).
    pub fn desaturate(self, percent: f32) -> Self {
        let keep = 1.0 - percent.clamp(0.0, 100.0) / 100.0;
        self.map_hsl(|s, l| (s * keep, l))
    }

    fn map_hsl(self, f: impl FnOnce(f32, f32) -> (f32, f32)) -> Self {
        let [h, s, l, a] = Color::from(self).convert::<Hsl>().components;
        // Achromatic input has no defined hue
        let h = if h.is_finite() { h } else { 0.0 };
        let (s, l) = f(s, l);
        AlphaColor::<Hsl>::new([h, s, l, a]).convert::<Srgb>().into()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.to_rgba8().to_u8_array();
        Self::new(r, g, b, a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

fn css_color(name: &str) -> Option<SerializableColor> {
    let color = parse_color(name).ok()?;
    Some(color.to_alpha_color::<Srgb>().into())
}

fn sketch_color(name: &str) -> Option<SerializableColor> {
    SKETCH_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .and_then(|(_, hex)| css_color(hex))
}

/// Resolve `modifier* base`, trying the longest base first.
fn phrase_color(name: &str) -> Option<SerializableColor> {
    let words: Vec<&str> = name.split_whitespace().collect();
    (0..words.len()).rev().find_map(|split| {
        let base_name = words[split..].join(" ");
        let base = sketch_color(&base_name).or_else(|| css_color(&base_name))?;
        Some(apply_modifiers(base, &words[..split]))
    })
}

fn apply_modifiers(mut color: SerializableColor, words: &[&str]) -> SerializableColor {
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if let Some(&(_, ds, dl)) = MODIFIERS.iter().find(|(known, ..)| *known == word) {
            color = color.adjust_hsl(ds, dl);
        } else if let Some(percent) = desaturate_amount(word) {
            color = color.desaturate(percent);
        } else if word == "desaturate" {
            // Two-word form: `desaturate 20%`
            let percent = words
                .get(i + 1)
                .and_then(|next| next.strip_suffix('%'))
                .and_then(percent_digits);
            if let Some(percent) = percent {
                color = color.desaturate(percent);
                i += 1;
            }
        }
        i += 1;
    }
    color
}

/// Amount of a one-word desaturation such as `desaturate-20`, `desaturate_20%` or `desaturate20`.
fn desaturate_amount(word: &str) -> Option<f32> {
    let rest = word.strip_prefix("desaturate")?;
    let rest = rest.strip_prefix(['-', '_']).unwrap_or(rest);
    percent_digits(rest.strip_suffix('%').unwrap_or(rest))
}

fn percent_digits(digits: &str) -> Option<f32> {
    if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u16>().ok().map(f32::from)
}

/// Parse a fill value; `"none"` and empty strings mean no fill.
pub fn parse_fill(input: &str) -> Option<SerializableColor> {
    let fill = input.trim();
    if fill.is_empty() || fill.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(SerializableColor::resolve(fill))
    }
}

/// Format a fill value, writing `"none"` for an absent fill.
pub fn format_fill(fill: Option<SerializableColor>) -> String {
    fill.map_or_else(|| "none".to_string(), |c| c.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(color: SerializableColor, r: u8, g: u8, b: u8) -> bool {
        color.r.abs_diff(r) <= 1 && color.g.abs_diff(g) <= 1 && color.b.abs_diff(b) <= 1
    }

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(SerializableColor::parse("#000"), Some(SerializableColor::BLACK));
        assert_eq!(
            SerializableColor::parse("#2980b9"),
            Some(SerializableColor::new(0x29, 0x80, 0xb9, 255))
        );
        assert_eq!(
            SerializableColor::parse("#ff000080"),
            Some(SerializableColor::new(255, 0, 0, 128))
        );
        assert_eq!(SerializableColor::parse("#12345"), None);
        assert_eq!(SerializableColor::parse("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_css_functions_and_names() {
        assert_eq!(
            SerializableColor::parse("Yellow"),
            Some(SerializableColor::new(255, 255, 0, 255))
        );
        assert_eq!(
            SerializableColor::parse("rgb(10, 20, 30)"),
            Some(SerializableColor::new(10, 20, 30, 255))
        );
        let green = SerializableColor::parse("hsl(120, 100%, 50%)").unwrap();
        assert!(near(green, 0, 255, 0));
        assert_eq!(SerializableColor::parse("rgb(10, 20)"), None);
    }

    #[test]
    fn test_names_beyond_the_sketch_table() {
        assert_eq!(
            SerializableColor::parse("lightgray"),
            Some(SerializableColor::new(211, 211, 211, 255))
        );
        // Spaces are dropped when nothing else matches
        assert_eq!(
            SerializableColor::parse("papaya whip"),
            Some(SerializableColor::new(255, 239, 213, 255))
        );
    }

    #[test]
    fn test_unknown_resolves_to_black() {
        assert_eq!(SerializableColor::parse("not-a-color"), None);
        assert_eq!(SerializableColor::resolve("not-a-color"), SerializableColor::BLACK);
        assert_eq!(SerializableColor::resolve("   "), SerializableColor::BLACK);
    }

    #[test]
    fn test_sketch_colors() {
        assert_eq!(
            SerializableColor::parse("Matcha"),
            Some(SerializableColor::new(0xa3, 0xc6, 0x86, 255))
        );
        assert_eq!(
            SerializableColor::parse("pastel blue"),
            Some(SerializableColor::new(0xae, 0xc6, 0xff, 255))
        );
    }

    #[test]
    fn test_modifiers() {
        let dark_red = SerializableColor::resolve("dark red");
        assert!((170..=186).contains(&dark_red.r));
        assert!(dark_red.g <= 1 && dark_red.b <= 1);

        let matcha = SerializableColor::resolve("matcha");
        let pastel = SerializableColor::resolve("pastel matcha");
        let sum = |c: SerializableColor| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
        assert!(sum(pastel) > sum(matcha));

        // Unknown words before the base are ignored
        assert_eq!(
            SerializableColor::resolve("fancy navy"),
            SerializableColor::resolve("navy")
        );
    }

    #[test]
    fn test_desaturate_forms() {
        let gray = SerializableColor::resolve("desaturate-100 red");
        assert!(gray.r.abs_diff(gray.g) <= 1 && gray.g.abs_diff(gray.b) <= 1);
        assert!((126..=129).contains(&gray.r));

        let half = SerializableColor::resolve("desaturate 50% red");
        assert!(near(half, 191, 64, 64));
        assert_eq!(SerializableColor::resolve("desaturate_50% red"), half);
        assert_eq!(desaturate_amount("desaturate20"), Some(20.0));
        assert_eq!(desaturate_amount("desaturate-2000"), None);
        assert_eq!(desaturate_amount("saturate-20"), None);
    }

    #[test]
    fn test_adjust_hsl_clamps() {
        let white = SerializableColor::WHITE.adjust_hsl(0.0, 40.0);
        assert_eq!(white, SerializableColor::WHITE);
        let black = SerializableColor::new(10, 10, 10, 255).adjust_hsl(0.0, -50.0);
        assert_eq!(black, SerializableColor::BLACK);
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::new(0x29, 0x80, 0xb9, 255).to_hex(), "#2980b9");
        assert_eq!(SerializableColor::new(255, 0, 0, 128).to_hex(), "#ff000080");
    }

    #[test]
    fn test_fill_none() {
        assert_eq!(parse_fill("none"), None);
        assert_eq!(parse_fill(""), None);
        assert_eq!(parse_fill("red"), Some(SerializableColor::new(255, 0, 0, 255)));
        assert_eq!(format_fill(None), "none");
        assert_eq!(format_fill(Some(SerializableColor::WHITE)), "#ffffff");
    }

    #[test]
    fn test_peniko_round_trip() {
        let color = SerializableColor::new(12, 34, 56, 200);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}
