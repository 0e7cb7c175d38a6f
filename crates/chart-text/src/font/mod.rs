//! Font loading and matching module

mod database;

pub use database::FontDatabase;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ttf_parser::{name_id, Face, GlyphId};

use crate::{Result, TextError};

/// A parsed, shareable scalable font.
///
/// The font data is owned and validated once; renderers hold the font
/// through an `Arc` and never parse font files themselves.
#[derive(Clone)]
pub struct Font {
    data: Arc<[u8]>,
    index: u32,
    units_per_em: u16,
    family: Option<String>,
}

impl Font {
    /// Parse a font face from data
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, index: u32) -> Result<Self> {
        let data = data.into();
        let face = Face::parse(&data, index).map_err(|e| TextError::FontParsing(e.to_string()))?;
        let units_per_em = face.units_per_em();
        let family = family_name(&face);

        tracing::debug!("Parsed font {:?} ({} units/em)", family, units_per_em);

        Ok(Self {
            data,
            index,
            units_per_em,
            family,
        })
    }

    /// Load the first face of a font file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data, 0)
    }

    /// Parse the underlying ttf-parser face
    pub fn face(&self) -> Result<Face<'_>> {
        Face::parse(&self.data, self.index).map_err(|e| TextError::FontParsing(e.to_string()))
    }

    /// Raw font file bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Units per em
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Family name from the `name` table, if present
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// Face index within a font collection
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish()
    }
}

fn family_name(face: &Face<'_>) -> Option<String> {
    [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
        .into_iter()
        .find_map(|id| {
            face.names()
                .into_iter()
                .filter(|name| name.name_id == id && name.is_unicode())
                .find_map(|name| name.to_string())
        })
}

/// Horizontal kerning between two glyphs, in font units
pub(crate) fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    face.tables()
        .kern
        .as_ref()
        .and_then(|kern| {
            kern.subtables
                .into_iter()
                .filter(|subtable| subtable.horizontal && !subtable.variable)
                .find_map(|subtable| subtable.glyphs_kerning(left, right))
        })
        .unwrap_or(0)
}
