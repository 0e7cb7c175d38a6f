//! Glyph outline to path conversion

use tiny_skia::PathBuilder;
use ttf_parser::OutlineBuilder;

/// Appends ttf-parser outlines to a tiny-skia path, placing the glyph
/// origin at (`origin_x`, `baseline`) and flipping the Y axis.
pub(crate) struct OutlineSink<'p> {
    builder: &'p mut PathBuilder,
    scale: f64,
    origin_x: f64,
    baseline: f64,
}

impl<'p> OutlineSink<'p> {
    pub(crate) fn new(
        builder: &'p mut PathBuilder,
        scale: f64,
        origin_x: f64,
        baseline: f64,
    ) -> Self {
        Self {
            builder,
            scale,
            origin_x,
            baseline,
        }
    }

    fn transform_x(&self, x: f32) -> f32 {
        (self.origin_x + x as f64 * self.scale) as f32
    }

    fn transform_y(&self, y: f32) -> f32 {
        (self.baseline - y as f64 * self.scale) as f32 // Flip Y axis
    }
}

impl OutlineBuilder for OutlineSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.transform_x(x), self.transform_y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.transform_x(x), self.transform_y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.transform_x(x1), self.transform_y(y1),
            self.transform_x(x2), self.transform_y(y2),
            self.transform_x(x), self.transform_y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
