//! Graphics context - stateful drawing on a pixel buffer
//!
//! Holds the current path and paint state and rasterizes onto a tiny-skia
//! Pixmap. The pixmap is created with the context and never resized.

use std::sync::Arc;

use chart_text::{points_to_pixels, Font, TextBounds, TextError, TextLayout};
use tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, StrokeDash, Transform,
};

use crate::config::{DEFAULT_DPI, DEFAULT_FONT_SIZE};
use crate::{Color, RenderError, Result};

/// Stateful graphics context bound to one pixmap
pub struct GraphicContext {
    pixmap: Pixmap,
    path: PathBuilder,
    stroke_color: Color,
    fill_color: Color,
    line_width: f64,
    dash: Option<StrokeDash>,
    fill_rule: FillRule,
    dpi: f64,
    font: Option<Arc<Font>>,
    font_size: f64,
}

impl GraphicContext {
    /// Create a context with a transparent `width`x`height` pixmap
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::Initialization { width, height })?;

        Ok(Self {
            pixmap,
            path: PathBuilder::new(),
            stroke_color: Color::BLACK,
            fill_color: Color::WHITE,
            line_width: 1.0,
            dash: None,
            fill_rule: FillRule::Winding,
            dpi: DEFAULT_DPI,
            font: None,
            font_size: DEFAULT_FONT_SIZE,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// The pixel buffer
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Fill the whole buffer with a color
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    pub fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    /// Set the dash pattern and phase. An empty pattern means solid.
    ///
    /// Odd-length patterns are repeated once so on/off segments alternate.
    /// Patterns tiny-skia cannot dash (negative entries, zero total
    /// length) fall back to a solid stroke.
    pub fn set_line_dash(&mut self, dashes: &[f64], offset: f64) {
        if dashes.is_empty() {
            self.dash = None;
            return;
        }

        let mut array: Vec<f32> = dashes.iter().map(|&d| d as f32).collect();
        if array.len() % 2 != 0 {
            array.extend_from_within(..);
        }

        self.dash = StrokeDash::new(array, offset as f32);
        if self.dash.is_none() {
            tracing::debug!("Unusable dash pattern {:?}, stroking solid", dashes);
        }
    }

    /// Whether strokes are currently dashed
    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    pub fn font(&self) -> Option<&Arc<Font>> {
        self.font.as_ref()
    }

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.font = Some(font);
    }

    /// Font size in points
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    /// Font size in pixels at the current DPI
    pub fn font_size_px(&self) -> f64 {
        points_to_pixels(self.font_size, self.dpi)
    }

    // ------------------------------------------------------------------
    // Path construction
    // ------------------------------------------------------------------

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(x as f32, y as f32);
    }

    pub fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(x as f32, y as f32);
    }

    pub fn quad_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.path.quad_to(cx as f32, cy as f32, x as f32, y as f32);
    }

    pub fn cubic_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.path.cubic_to(c1x as f32, c1y as f32, c2x as f32, c2y as f32, x as f32, y as f32);
    }

    /// Append an elliptical arc around (`cx`, `cy`).
    ///
    /// Starts with a line from the current point, or a move when the path
    /// is empty. Each cubic segment spans at most a quarter turn.
    pub fn arc_to(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, start_angle: f64, delta: f64) {
        let start_x = cx + start_angle.cos() * rx;
        let start_y = cy + start_angle.sin() * ry;
        if self.path.is_empty() {
            self.move_to(start_x, start_y);
        } else {
            self.line_to(start_x, start_y);
        }

        if delta == 0.0 || !delta.is_finite() {
            return;
        }

        let segments = (delta.abs() / std::f64::consts::FRAC_PI_2).ceil().max(1.0) as usize;
        let step = delta / segments as f64;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let mut angle = start_angle;
        for _ in 0..segments {
            let next = angle + step;
            let (sin_a, cos_a) = angle.sin_cos();
            let (sin_b, cos_b) = next.sin_cos();

            let (x0, y0) = (cx + rx * cos_a, cy + ry * sin_a);
            let (x3, y3) = (cx + rx * cos_b, cy + ry * sin_b);
            self.cubic_curve_to(
                x0 - k * rx * sin_a,
                y0 + k * ry * cos_a,
                x3 + k * rx * sin_b,
                y3 - k * ry * cos_b,
                x3,
                y3,
            );
            angle = next;
        }
    }

    pub fn close(&mut self) {
        self.path.close();
    }

    /// Whether the current path has any segments
    pub fn has_path(&self) -> bool {
        !self.path.is_empty()
    }

    /// Discard the current path
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    // ------------------------------------------------------------------
    // Rasterization
    // ------------------------------------------------------------------

    /// Stroke the current path, then clear it
    pub fn stroke(&mut self) {
        if let Some(path) = self.take_path() {
            self.stroke_path(&path);
        }
    }

    /// Fill the current path, then clear it
    pub fn fill(&mut self) {
        if let Some(path) = self.take_path() {
            self.fill_path(&path);
        }
    }

    /// Fill then stroke the current path, then clear it
    pub fn fill_stroke(&mut self) {
        if let Some(path) = self.take_path() {
            self.fill_path(&path);
            self.stroke_path(&path);
        }
    }

    fn take_path(&mut self) -> Option<Path> {
        // `PathBuilder::default()` skips the implicit leading move; use `new()`.
        std::mem::replace(&mut self.path, PathBuilder::new()).finish()
    }

    fn fill_path(&mut self, path: &Path) {
        let paint = paint(self.fill_color);
        self.pixmap.fill_path(path, &paint, self.fill_rule, Transform::identity(), None);
    }

    fn stroke_path(&mut self, path: &Path) {
        let paint = paint(self.stroke_color);
        let stroke = Stroke {
            width: self.line_width as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: self.dash.clone(),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Append the outlines of `body` with its baseline origin at (`x`, `y`),
    /// rotated about that origin when `rotation` (radians) is given.
    pub fn create_string_path(
        &mut self,
        body: &str,
        x: f64,
        y: f64,
        rotation: Option<f64>,
    ) -> chart_text::Result<()> {
        let font = self.font.as_ref().ok_or(TextError::NoFont)?;
        let layout = TextLayout::new(font, body, self.font_size_px())?;

        match rotation {
            None => layout.append_path(&mut self.path, x, y),
            Some(radians) => {
                let mut glyphs = PathBuilder::new();
                layout.append_path(&mut glyphs, x, y);
                let transform =
                    Transform::from_rotate_at(radians.to_degrees() as f32, x as f32, y as f32);
                if let Some(path) = glyphs.finish().and_then(|path| path.transform(transform)) {
                    self.path.push_path(&path);
                }
            }
        }
        Ok(())
    }

    /// Raw bounds of `body` relative to its origin
    pub fn string_bounds(&self, body: &str) -> chart_text::Result<TextBounds> {
        let font = self.font.as_ref().ok_or(TextError::NoFont)?;
        Ok(TextLayout::new(font, body, self.font_size_px())?.bounds())
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = true;
    paint
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(ctx: &GraphicContext, x: u32, y: u32) -> u8 {
        ctx.pixmap().pixel(x, y).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn test_zero_size_fails() {
        assert!(matches!(
            GraphicContext::new(0, 10),
            Err(RenderError::Initialization { width: 0, height: 10 })
        ));
        assert!(GraphicContext::new(10, 0).is_err());
    }

    #[test]
    fn test_defaults() {
        let ctx = GraphicContext::new(8, 8).unwrap();
        assert_eq!(ctx.stroke_color(), Color::BLACK);
        assert_eq!(ctx.fill_color(), Color::WHITE);
        assert_eq!(ctx.line_width(), 1.0);
        assert_eq!(ctx.dpi(), DEFAULT_DPI);
        assert!(!ctx.is_dashed());
        assert!(ctx.font().is_none());
    }

    #[test]
    fn test_fill_clears_path() {
        let mut ctx = GraphicContext::new(20, 20).unwrap();
        ctx.set_fill_color(Color::RED);
        ctx.move_to(2.0, 2.0);
        ctx.line_to(18.0, 2.0);
        ctx.line_to(18.0, 18.0);
        ctx.line_to(2.0, 18.0);
        ctx.close();
        assert!(ctx.has_path());
        ctx.fill();
        assert!(!ctx.has_path());
        assert_eq!(alpha_at(&ctx, 10, 10), 255);
        assert_eq!(alpha_at(&ctx, 0, 0), 0);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let mut ctx = GraphicContext::new(10, 10).unwrap();
        ctx.stroke();
        ctx.fill();
        ctx.move_to(5.0, 5.0);
        ctx.fill_stroke();
        assert!(ctx.pixmap().pixels().iter().all(|p| p.alpha() == 0));
    }

    #[test]
    fn test_dash_patterns() {
        let mut ctx = GraphicContext::new(10, 10).unwrap();
        ctx.set_line_dash(&[4.0, 2.0], 0.0);
        assert!(ctx.is_dashed());
        ctx.set_line_dash(&[3.0], 0.0);
        assert!(ctx.is_dashed());
        ctx.set_line_dash(&[], 0.0);
        assert!(!ctx.is_dashed());
        ctx.set_line_dash(&[-1.0, 2.0], 0.0);
        assert!(!ctx.is_dashed());
        ctx.set_line_dash(&[0.0, 0.0], 0.0);
        assert!(!ctx.is_dashed());
    }

    #[test]
    fn test_arc_quarter_turn() {
        let mut ctx = GraphicContext::new(100, 100).unwrap();
        ctx.set_fill_color(Color::BLUE);
        ctx.move_to(50.0, 50.0);
        ctx.arc_to(50.0, 50.0, 40.0, 40.0, 0.0, std::f64::consts::FRAC_PI_2);
        ctx.close();
        ctx.fill();
        // Slice covers the lower-right quadrant (y grows downward)
        assert_eq!(alpha_at(&ctx, 65, 65), 255);
        assert_eq!(alpha_at(&ctx, 35, 35), 0);
        assert_eq!(alpha_at(&ctx, 65, 35), 0);
    }

    #[test]
    fn test_full_arc_starts_with_move() {
        let mut ctx = GraphicContext::new(100, 100).unwrap();
        ctx.set_fill_color(Color::GREEN);
        ctx.arc_to(50.0, 50.0, 30.0, 20.0, 0.0, std::f64::consts::TAU);
        ctx.fill();
        assert_eq!(alpha_at(&ctx, 50, 50), 255);
        assert_eq!(alpha_at(&ctx, 50, 25), 0);
        assert_eq!(alpha_at(&ctx, 75, 50), 255);
    }

    #[test]
    fn test_font_size_px() {
        let mut ctx = GraphicContext::new(4, 4).unwrap();
        ctx.set_font_size(12.0);
        ctx.set_dpi(144.0);
        assert_eq!(ctx.font_size_px(), 24.0);
    }

    #[test]
    fn test_text_without_font() {
        let mut ctx = GraphicContext::new(4, 4).unwrap();
        assert!(matches!(ctx.create_string_path("a", 0.0, 0.0, None), Err(TextError::NoFont)));
        assert!(matches!(ctx.string_bounds("a"), Err(TextError::NoFont)));
        assert!(!ctx.has_path());
    }
}
