//! Single-line string layout
//!
//! Places glyphs along the baseline using horizontal advances and `kern`
//! pairs, then produces either an outline path or the string bounds.

mod bounds;

pub use bounds::TextBounds;

use tiny_skia::PathBuilder;
use ttf_parser::{Face, GlyphId};

use crate::font::{kerning, Font};
use crate::outline::OutlineSink;
use crate::Result;

/// A glyph and its pen offset from the string origin, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    pub glyph_id: GlyphId,
    pub x: f64,
}

/// A laid-out string for one font and pixel size
pub struct TextLayout<'f> {
    face: Face<'f>,
    scale: f64,
    glyphs: Vec<GlyphPosition>,
    advance: f64,
}

impl<'f> TextLayout<'f> {
    /// Lay out `text` with `font` at `size_px` pixels per em.
    ///
    /// Characters missing from the font use glyph 0 (`.notdef`).
    pub fn new(font: &'f Font, text: &str, size_px: f64) -> Result<Self> {
        let face = font.face()?;
        let scale = size_px / font.units_per_em() as f64;

        let mut glyphs = Vec::with_capacity(text.len());
        let mut cursor = 0.0;
        let mut prev: Option<GlyphId> = None;

        for c in text.chars() {
            let glyph_id = face.glyph_index(c).unwrap_or(GlyphId(0));
            if let Some(prev) = prev {
                cursor += kerning(&face, prev, glyph_id) as f64 * scale;
            }
            glyphs.push(GlyphPosition { glyph_id, x: cursor });
            cursor += face.glyph_hor_advance(glyph_id).unwrap_or(0) as f64 * scale;
            prev = Some(glyph_id);
        }

        Ok(Self {
            face,
            scale,
            glyphs,
            advance: cursor,
        })
    }

    /// Positioned glyphs
    pub fn glyphs(&self) -> &[GlyphPosition] {
        &self.glyphs
    }

    /// Total pen advance in pixels
    pub fn advance(&self) -> f64 {
        self.advance
    }

    /// Font units to pixels factor
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Append glyph outlines with the string origin at (`x`, `baseline`)
    pub fn append_path(&self, builder: &mut PathBuilder, x: f64, baseline: f64) {
        for glyph in &self.glyphs {
            let mut sink = OutlineSink::new(builder, self.scale, x + glyph.x, baseline);
            // Glyphs without an outline (spaces) only advance the pen.
            let _ = self.face.outline_glyph(glyph.glyph_id, &mut sink);
        }
    }

    /// Union of the inked glyph boxes, relative to the string origin.
    ///
    /// The pen origin is not part of the result, so a string drawn above
    /// the baseline has a negative `bottom`. Strings without any outline
    /// give all-zero bounds.
    pub fn bounds(&self) -> TextBounds {
        self.glyphs
            .iter()
            .filter_map(|glyph| {
                let rect = self.face.glyph_bounding_box(glyph.glyph_id)?;
                Some(TextBounds {
                    left: glyph.x + rect.x_min as f64 * self.scale,
                    top: -(rect.y_max as f64) * self.scale,
                    right: glyph.x + rect.x_max as f64 * self.scale,
                    bottom: -(rect.y_min as f64) * self.scale,
                })
            })
            .reduce(|mut bounds, glyph| {
                bounds.include(glyph.left, glyph.top, glyph.right, glyph.bottom);
                bounds
            })
            .unwrap_or_default()
    }
}
