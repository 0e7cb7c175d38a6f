//! fOS Chart Render - Chart Rendering Backends
//!
//! Drives a 2D graphics backend from a backend-agnostic sequence of chart
//! drawing commands.
//!
//! This crate provides:
//! - The `Renderer` drawing contract
//! - A raster renderer backed by a tiny-skia Pixmap, saved as PNG
//! - A vector renderer producing SVG
//! - A stateful graphics context (path, paint, dash, font)
//! - Text measurement shared by both backends

mod bounding_box;
mod context;
mod encode;
pub mod config;
pub mod raster;
pub mod svg;

pub use bounding_box::{BoundingBox, BoxCorners, Point};
pub use chart_text::{Font, FontDatabase, TextError};
pub use config::RenderConfig;
pub use context::GraphicContext;
pub use raster::RasterRenderer;
pub use svg::SvgRenderer;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

/// Color (RGBA)
///
/// Deserializes from either a hex string (`"#4169e1"`) or an
/// `{ r, g, b, a }` map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        let byte = |shift: u32| ((value >> shift) & 0xff) as u8;
        let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 17;

        match digits.len() {
            3 => Some(Color::rgb(nibble(8), nibble(4), nibble(0))),
            6 => Some(Color::rgb(byte(16), byte(8), byte(0))),
            8 => Some(Color::rgba(byte(24), byte(16), byte(8), byte(0))),
            _ => None,
        }
    }

    /// CSS `rgba(...)` notation, as used in SVG styles
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{:.1})", self.r, self.g, self.b, self.a as f64 / 255.0)
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl TryFrom<ColorValue> for Color {
    type Error = String;

    fn try_from(value: ColorValue) -> std::result::Result<Self, Self::Error> {
        match value {
            ColorValue::Hex(hex) => {
                Color::from_hex(&hex).ok_or_else(|| format!("invalid hex color {:?}", hex))
            }
            ColorValue::Rgba { r, g, b, a } => Ok(Color::rgba(r, g, b, a)),
        }
    }
}

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot create a {width}x{height} graphics context")]
    Initialization { width: u32, height: u32 },

    #[error("Image encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Text(#[from] TextError),
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Backend-agnostic chart drawing commands.
///
/// Coordinates are integer pixels; every operation mutates the renderer in
/// place. Renderers are single-threaded and owned by one caller.
pub trait Renderer {
    /// Resolution used to convert font points to pixels
    fn dpi(&self) -> f64;

    fn set_dpi(&mut self, dpi: f64);

    fn set_stroke_color(&mut self, color: Color);

    fn set_fill_color(&mut self, color: Color);

    fn set_stroke_width(&mut self, width: f64);

    /// Dash pattern for subsequent strokes, phase 0. An empty slice means solid.
    fn set_stroke_dash_array(&mut self, dash_array: &[f64]);

    fn move_to(&mut self, x: i32, y: i32);

    fn line_to(&mut self, x: i32, y: i32);

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32);

    /// Elliptical arc around (`cx`, `cy`), angles in radians
    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64);

    fn close(&mut self);

    fn stroke(&mut self);

    fn fill(&mut self);

    fn fill_stroke(&mut self);

    /// Marker circle: four quadratic segments through the compass points,
    /// filled and stroked.
    fn circle(&mut self, radius: f64, x: i32, y: i32);

    fn set_font(&mut self, font: Arc<Font>);

    /// Font size in points
    fn set_font_size(&mut self, size: f64);

    /// Sets the text color; also becomes the fill and stroke color
    fn set_font_color(&mut self, color: Color);

    /// Draw `body` with its baseline origin at (`x`, `y`)
    fn text(&mut self, body: &str, x: i32, y: i32);

    /// Rotate subsequent text about its origin
    fn set_text_rotation(&mut self, radians: f64);

    fn clear_text_rotation(&mut self);

    /// Measure `body` with the current font, anchored at (0, 0)
    fn try_measure_text(&self, body: &str) -> chart_text::Result<BoundingBox>;

    /// Measure `body`, returning an all-zero box when measurement fails
    fn measure_text(&self, body: &str) -> BoundingBox {
        self.try_measure_text(body).unwrap_or_else(|err| {
            tracing::debug!("Text measurement failed for {:?}: {}", body, err);
            BoundingBox::default()
        })
    }

    /// Write the rendered output
    fn save(&mut self, w: &mut dyn Write) -> Result<()>;
}

/// Creates a renderer for the given output size
pub type RendererProvider = fn(u32, u32) -> Result<Box<dyn Renderer>>;

/// PNG renderer provider
pub fn png_renderer(width: u32, height: u32) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(RasterRenderer::new(width, height)?))
}

/// SVG renderer provider
pub fn svg_renderer(width: u32, height: u32) -> Result<Box<dyn Renderer>> {
    Ok(Box::new(SvgRenderer::new(width, height)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_constants() {
        assert_eq!(Color::WHITE.r, 255);
        assert_eq!(Color::BLACK.r, 0);
        assert_eq!(Color::TRANSPARENT.a, 0);
        assert_eq!(Color::default(), Color::TRANSPARENT);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(Color::from_hex("#ff0000"), Some(Color::RED));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::GREEN));
        assert_eq!(Color::from_hex("#f00"), Some(Color::RED));
        assert_eq!(Color::from_hex("#0000ff80"), Some(Color::BLUE.with_alpha(0x80)));
        assert_eq!(Color::from_hex("#ü0"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex(""), None);
    }

    #[test]
    fn test_color_deserialize() {
        let hex: Color = serde_json::from_str(r##""#4169e1""##).unwrap();
        assert_eq!(hex, Color::rgb(0x41, 0x69, 0xe1));

        let map: Color = serde_json::from_str(r#"{"r": 1, "g": 2, "b": 3, "a": 4}"#).unwrap();
        assert_eq!(map, Color::rgba(1, 2, 3, 4));

        assert!(serde_json::from_str::<Color>(r#""not a color""#).is_err());
    }

    #[test]
    fn test_color_to_css() {
        assert_eq!(Color::RED.to_css(), "rgba(255,0,0,1.0)");
        assert_eq!(Color::TRANSPARENT.to_css(), "rgba(0,0,0,0.0)");
    }

    #[test]
    fn test_providers() {
        let providers: [RendererProvider; 2] = [png_renderer, svg_renderer];
        for provider in providers {
            let renderer = provider(32, 16).unwrap();
            assert_eq!(renderer.dpi(), config::DEFAULT_DPI);
            assert!(provider(0, 16).is_err());
        }
    }

    #[test]
    fn test_measure_without_font_is_zero() {
        let renderer = png_renderer(10, 10).unwrap();
        assert!(matches!(renderer.try_measure_text("abc"), Err(TextError::NoFont)));
        assert_eq!(renderer.measure_text("abc"), BoundingBox::default());
    }
}
