//! Edge case tests for chart-text

use chart_text::{points_to_pixels, Font, FontDatabase, TextError, TextLayout};
use tiny_skia::PathBuilder;

fn system_font() -> Option<Font> {
    FontDatabase::with_system_fonts()
        .query(&["DejaVu Sans", "Liberation Sans", "sans-serif"])
        .ok()
}

// ============================================================================
// FONT LOADING
// ============================================================================

#[test]
fn test_parse_empty_data() {
    assert!(matches!(Font::from_bytes(Vec::new(), 0), Err(TextError::FontParsing(_))));
}

#[test]
fn test_parse_garbage_data() {
    let garbage: Vec<u8> = (0..512).map(|i| (i * 31 % 251) as u8).collect();
    assert!(Font::from_bytes(garbage, 0).is_err());
}

#[test]
fn test_missing_font_file() {
    let result = Font::from_file("/nonexistent/chart-font.ttf");
    assert!(matches!(result, Err(TextError::Io(_))));
}

#[test]
fn test_query_falls_through_families() {
    let Some(font) = system_font() else { return };
    let db = FontDatabase::with_system_fonts();
    let fallback = db.query(&["No Such Family 1234", "sans-serif"]).unwrap();
    assert!(fallback.units_per_em() > 0);
    assert!(font.units_per_em() > 0);
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn test_empty_layout() {
    let Some(font) = system_font() else { return };
    let layout = TextLayout::new(&font, "", 12.0).unwrap();
    assert!(layout.glyphs().is_empty());
    assert_eq!(layout.advance(), 0.0);
    assert_eq!(layout.bounds().width(), 0.0);
}

#[test]
fn test_whitespace_advances_without_ink() {
    let Some(font) = system_font() else { return };
    let layout = TextLayout::new(&font, "   ", 12.0).unwrap();
    assert!(layout.advance() > 0.0);
    assert_eq!(layout.bounds().height(), 0.0);

    let mut builder = PathBuilder::new();
    layout.append_path(&mut builder, 0.0, 10.0);
    assert!(builder.finish().is_none());
}

#[test]
fn test_unmapped_characters_use_notdef() {
    let Some(font) = system_font() else { return };
    let layout = TextLayout::new(&font, "\u{10FFFD}", 12.0).unwrap();
    assert_eq!(layout.glyphs().len(), 1);
    assert_eq!(layout.glyphs()[0].glyph_id.0, 0);
}

#[test]
fn test_advance_scales_with_size() {
    let Some(font) = system_font() else { return };
    let small = TextLayout::new(&font, "Scale", points_to_pixels(10.0, 96.0)).unwrap();
    let large = TextLayout::new(&font, "Scale", points_to_pixels(20.0, 96.0)).unwrap();
    assert!((large.advance() - 2.0 * small.advance()).abs() < 1e-6);
}

#[test]
fn test_glyphs_left_to_right() {
    let Some(font) = system_font() else { return };
    let layout = TextLayout::new(&font, "abcdef", 16.0).unwrap();
    let xs: Vec<f64> = layout.glyphs().iter().map(|g| g.x).collect();
    assert_eq!(xs[0], 0.0);
    assert!(xs.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn test_bounds_straddle_baseline() {
    let Some(font) = system_font() else { return };
    let bounds = TextLayout::new(&font, "gH", 20.0).unwrap().bounds();
    assert!(bounds.top < 0.0, "cap height sits above the baseline");
    assert!(bounds.bottom > 0.0, "descender sits below the baseline");
}

#[test]
fn test_outline_follows_origin() {
    let Some(font) = system_font() else { return };
    let layout = TextLayout::new(&font, "H", 20.0).unwrap();

    let mut builder = PathBuilder::new();
    layout.append_path(&mut builder, 100.0, 50.0);
    let rect = builder.finish().unwrap().bounds();

    assert!(rect.left() >= 100.0);
    assert!(rect.bottom() <= 50.5);
    assert!(rect.top() < 50.0);
}
