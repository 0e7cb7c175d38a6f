//! Raster renderer - chart commands to a PNG bitmap

use std::io::Write;
use std::sync::Arc;

use chart_text::Font;

use crate::bounding_box::measured_box;
use crate::config::RenderConfig;
use crate::context::GraphicContext;
use crate::encode::{demultiplied_rgba, write_png};
use crate::{BoundingBox, Color, Renderer, Result};

/// Renders chart commands onto an RGBA pixel buffer
pub struct RasterRenderer {
    gc: GraphicContext,
    font_color: Color,
    rotation: Option<f64>,
}

impl RasterRenderer {
    /// Create a renderer with a transparent `width`x`height` buffer
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let gc = GraphicContext::new(width, height)?;
        tracing::debug!("Created {}x{} raster renderer", width, height);

        Ok(Self {
            gc,
            font_color: Color::BLACK,
            rotation: None,
        })
    }

    /// Create a renderer from configuration, painting the background if set
    pub fn with_config(config: &RenderConfig) -> Result<Self> {
        let mut renderer = Self::new(config.width, config.height)?;
        renderer.gc.set_dpi(config.dpi);
        if let Some(background) = config.background {
            renderer.gc.clear(background);
        }
        Ok(renderer)
    }

    pub fn width(&self) -> u32 {
        self.gc.width()
    }

    pub fn height(&self) -> u32 {
        self.gc.height()
    }

    /// Pixel color at (`x`, `y`), `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // `Pixmap::pixel` only checks the linear index, so x past the right
        // edge would wrap onto the next row.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        self.gc.pixmap().pixel(x, y).map(|pixel| {
            let c = pixel.demultiply();
            Color::rgba(c.red(), c.green(), c.blue(), c.alpha())
        })
    }

    /// Buffer contents as straight RGBA bytes, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        demultiplied_rgba(self.gc.pixmap())
    }

    /// Underlying graphics context
    pub fn context(&self) -> &GraphicContext {
        &self.gc
    }

    /// Currently selected font
    pub fn font(&self) -> Option<&Arc<Font>> {
        self.gc.font()
    }

    /// Font size in points
    pub fn font_size(&self) -> f64 {
        self.gc.font_size()
    }

    pub fn font_color(&self) -> Color {
        self.font_color
    }
}

impl Renderer for RasterRenderer {
    fn dpi(&self) -> f64 {
        self.gc.dpi()
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.gc.set_dpi(dpi);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.gc.set_stroke_color(color);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.gc.set_fill_color(color);
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.gc.set_line_width(width);
    }

    fn set_stroke_dash_array(&mut self, dash_array: &[f64]) {
        self.gc.set_line_dash(dash_array, 0.0);
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.gc.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.gc.line_to(x as f64, y as f64);
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        self.gc.quad_curve_to(cx as f64, cy as f64, x as f64, y as f64);
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64) {
        self.gc.arc_to(cx as f64, cy as f64, rx, ry, start_angle, delta);
    }

    fn close(&mut self) {
        self.gc.close();
    }

    fn stroke(&mut self) {
        self.gc.stroke();
    }

    fn fill(&mut self) {
        self.gc.fill();
    }

    fn fill_stroke(&mut self) {
        self.gc.fill_stroke();
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        let xf = x as f64;
        let yf = y as f64;
        self.gc.move_to(xf - radius, yf); // west
        self.gc.quad_curve_to(xf, yf, xf, yf - radius); // north
        self.gc.quad_curve_to(xf, yf, xf + radius, yf); // east
        self.gc.quad_curve_to(xf, yf, xf, yf + radius); // south
        self.gc.quad_curve_to(xf, yf, xf - radius, yf); // west
        self.gc.close();
        self.gc.fill_stroke();
    }

    fn set_font(&mut self, font: Arc<Font>) {
        self.gc.set_font(font);
    }

    fn set_font_size(&mut self, size: f64) {
        self.gc.set_font_size(size);
    }

    fn set_font_color(&mut self, color: Color) {
        self.font_color = color;
        self.gc.set_fill_color(color);
        self.gc.set_stroke_color(color);
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        match self.gc.create_string_path(body, x as f64, y as f64, self.rotation) {
            Ok(()) => self.gc.fill(),
            Err(err) => tracing::debug!("Skipping text {:?}: {}", body, err),
        }
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.rotation = Some(radians);
    }

    fn clear_text_rotation(&mut self) {
        self.rotation = None;
    }

    fn try_measure_text(&self, body: &str) -> chart_text::Result<BoundingBox> {
        let bounds = self.gc.string_bounds(body)?;
        Ok(measured_box(&bounds, self.rotation))
    }

    fn save(&mut self, w: &mut dyn Write) -> Result<()> {
        tracing::debug!("Encoding {}x{} PNG", self.width(), self.height());
        write_png(self.gc.pixmap(), w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let renderer = RasterRenderer::new(16, 9).unwrap();
        assert_eq!(renderer.width(), 16);
        assert_eq!(renderer.height(), 9);
        let rgba = renderer.to_rgba();
        assert_eq!(rgba.len(), 16 * 9 * 4);
        assert!(rgba.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_with_config_background() {
        let config = RenderConfig::new(8, 8).with_background(Color::WHITE);
        let renderer = RasterRenderer::with_config(&config).unwrap();
        assert_eq!(renderer.pixel(3, 3), Some(Color::WHITE));
        assert_eq!(renderer.pixel(8, 0), None);
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let config = RenderConfig::new(4, 3).with_background(Color::RED);
        let renderer = RasterRenderer::with_config(&config).unwrap();
        assert_eq!(renderer.pixel(3, 2), Some(Color::RED));
        assert_eq!(renderer.pixel(4, 0), None);
        assert_eq!(renderer.pixel(7, 1), None);
        assert_eq!(renderer.pixel(0, 3), None);
        assert_eq!(renderer.pixel(u32::MAX, u32::MAX), None);
    }

    #[test]
    fn test_with_config_dpi() {
        let config = RenderConfig { dpi: 72.0, ..RenderConfig::new(4, 4) };
        let renderer = RasterRenderer::with_config(&config).unwrap();
        assert_eq!(renderer.dpi(), 72.0);
    }

    #[test]
    fn test_font_color_sets_both_paints() {
        let mut renderer = RasterRenderer::new(4, 4).unwrap();
        renderer.set_font_color(Color::RED);
        assert_eq!(renderer.font_color(), Color::RED);
        assert_eq!(renderer.context().fill_color(), Color::RED);
        assert_eq!(renderer.context().stroke_color(), Color::RED);
    }

    #[test]
    fn test_font_size_bound_to_context() {
        let mut renderer = RasterRenderer::new(4, 4).unwrap();
        renderer.set_font_size(18.0);
        assert_eq!(renderer.font_size(), 18.0);
        assert_eq!(renderer.context().font_size(), 18.0);
    }

    #[test]
    fn test_set_font() {
        let Ok(font) = chart_text::FontDatabase::with_system_fonts().query(&["sans-serif"]) else {
            return;
        };
        let mut renderer = RasterRenderer::new(4, 4).unwrap();
        assert!(renderer.font().is_none());
        let font = Arc::new(font);
        renderer.set_font(Arc::clone(&font));
        assert!(renderer.font().is_some_and(|current| Arc::ptr_eq(current, &font)));
    }

    #[test]
    fn test_circle_clears_path() {
        let mut renderer = RasterRenderer::new(40, 40).unwrap();
        renderer.set_fill_color(Color::BLUE);
        renderer.circle(10.0, 20, 20);
        assert!(!renderer.context().has_path());
        assert_eq!(renderer.pixel(20, 20).map(|c| c.b), Some(255));
    }

    #[test]
    fn test_text_without_font_draws_nothing() {
        let mut renderer = RasterRenderer::new(20, 20).unwrap();
        renderer.text("hello", 2, 15);
        assert!(renderer.to_rgba().iter().all(|&b| b == 0));
    }
}
