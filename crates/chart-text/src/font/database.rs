//! Font database for finding installed fonts

use fontdb::{Database, FaceInfo, Family, Query, Source};
use std::sync::Arc;

use super::Font;
use crate::{Result, TextError};

const SANS_SERIF: &[&str] =
    &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Arial", "Helvetica"];
const SERIF: &[&str] = &["DejaVu Serif", "Liberation Serif", "Noto Serif", "Times New Roman"];
const MONOSPACE: &[&str] =
    &["DejaVu Sans Mono", "Liberation Mono", "Noto Sans Mono", "Courier New"];

/// Font database for loading and matching fonts
pub struct FontDatabase {
    db: Database,
}

impl FontDatabase {
    /// Create a new empty font database
    pub fn new() -> Self {
        Self {
            db: Database::new(),
        }
    }

    /// Create a font database with system fonts loaded
    pub fn with_system_fonts() -> Self {
        let mut db = Self::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    }

    /// Load system fonts into the database
    pub fn load_system_fonts(&mut self) {
        self.db.load_system_fonts();
        self.resolve_generic_families();
    }

    /// Load a font from file
    pub fn load_font_file(&mut self, path: &std::path::Path) -> Result<()> {
        self.db.load_font_file(path)?;
        self.resolve_generic_families();
        Ok(())
    }

    /// Load a font from memory
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_source(Source::Binary(Arc::new(data)));
        self.resolve_generic_families();
    }

    /// Point each generic family at an installed family.
    ///
    /// fontdb only knows the generic names it was told (Arial, Times New
    /// Roman, ...), so a generic stays unchanged while its family is present.
    fn resolve_generic_families(&mut self) {
        if let Some(name) = self.generic_family(Family::SansSerif, SANS_SERIF, |face| {
            !face.monospaced && !is_serif_name(face)
        }) {
            tracing::debug!("Using {:?} for sans-serif", name);
            self.db.set_sans_serif_family(name);
        }
        if let Some(name) = self.generic_family(Family::Serif, SERIF, |face| {
            !face.monospaced && is_serif_name(face)
        }) {
            tracing::debug!("Using {:?} for serif", name);
            self.db.set_serif_family(name);
        }
        if let Some(name) =
            self.generic_family(Family::Monospace, MONOSPACE, |face| face.monospaced)
        {
            tracing::debug!("Using {:?} for monospace", name);
            self.db.set_monospace_family(name);
        }
    }

    /// Replacement family for `generic`, or `None` when the current one is
    /// installed or nothing fits
    fn generic_family(
        &self,
        generic: Family<'_>,
        preferred: &[&str],
        fits: impl Fn(&FaceInfo) -> bool,
    ) -> Option<String> {
        if self.has_family(self.db.family_name(&generic)) {
            return None;
        }

        preferred
            .iter()
            .find(|name| self.has_family(name))
            .map(|name| name.to_string())
            .or_else(|| {
                self.db
                    .faces()
                    .filter(|face| fits(face))
                    .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            })
    }

    fn has_family(&self, name: &str) -> bool {
        self.db
            .faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    }

    /// Find the first face matching one of `families`, in priority order.
    ///
    /// The generic names `serif`, `sans-serif` and `monospace` map to the
    /// corresponding generic families.
    pub fn query(&self, families: &[&str]) -> Result<Font> {
        let families: Vec<Family<'_>> = families.iter().map(|name| family(name)).collect();

        let id = self
            .db
            .query(&Query {
                families: &families,
                ..Query::default()
            })
            .ok_or_else(|| TextError::FontNotFound(describe(&families)))?;

        self.db
            .with_face_data(id, |data, index| Font::from_bytes(data.to_vec(), index))
            .ok_or_else(|| TextError::FontNotFound(describe(&families)))?
    }

    /// Number of loaded fonts
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if database is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

fn family<'a>(name: &'a str) -> Family<'a> {
    match name {
        "serif" => Family::Serif,
        "sans-serif" => Family::SansSerif,
        "monospace" => Family::Monospace,
        name => Family::Name(name),
    }
}

fn is_serif_name(face: &FaceInfo) -> bool {
    face.families
        .iter()
        .any(|(name, _)| name.contains("Serif") && !name.contains("Sans"))
}

fn describe(families: &[Family<'_>]) -> String {
    families
        .iter()
        .map(|family| match family {
            Family::Name(name) => name.to_string(),
            Family::Serif => "serif".to_string(),
            Family::SansSerif => "sans-serif".to_string(),
            Family::Monospace => "monospace".to_string(),
            Family::Cursive => "cursive".to_string(),
            Family::Fantasy => "fantasy".to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
