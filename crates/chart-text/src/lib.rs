//! fOS Chart Text - Font handling for chart rendering
//!
//! This crate provides the text side of the chart renderers:
//! - Font loading (ttf-parser) and system font matching (fontdb)
//! - String layout with pair kerning
//! - Glyph outlines as tiny-skia paths
//! - String bounds for text measurement

pub mod font;
pub mod layout;
mod outline;

pub use font::{Font, FontDatabase};
pub use layout::{GlyphPosition, TextBounds, TextLayout};

/// Points per inch. Font sizes are given in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert a font size in points to pixels at the given resolution
pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points * dpi / POINTS_PER_INCH
}

/// Text error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("No font selected")]
    NoFont,

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Failed to parse font: {0}")]
    FontParsing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_to_pixels() {
        assert_eq!(points_to_pixels(72.0, 96.0), 96.0);
        assert_eq!(points_to_pixels(12.0, 72.0), 12.0);
        assert_eq!(points_to_pixels(0.0, 300.0), 0.0);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(TextError::NoFont.to_string(), "No font selected");
        assert_eq!(
            TextError::FontNotFound("Arial".into()).to_string(),
            "Font not found: Arial"
        );
    }
}
