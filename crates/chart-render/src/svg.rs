//! Vector renderer - chart commands to an SVG document
//!
//! Paths are accumulated as SVG path data and emitted as one `<path>` per
//! stroke or fill. Text is emitted as `<text>` elements and measured with
//! the same font metrics as the raster renderer.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

use chart_text::{points_to_pixels, Font, TextError, TextLayout};

use crate::bounding_box::measured_box;
use crate::config::{RenderConfig, DEFAULT_DPI, DEFAULT_FONT_SIZE};
use crate::{BoundingBox, Color, RenderError, Renderer, Result};

/// Renders chart commands as SVG elements
pub struct SvgRenderer {
    width: u32,
    height: u32,
    dpi: f64,
    background: Option<Color>,
    elements: Vec<String>,
    path: String,
    stroke_color: Color,
    fill_color: Color,
    stroke_width: f64,
    dash_array: Vec<f64>,
    font: Option<Arc<Font>>,
    font_size: f64,
    font_color: Color,
    rotation: Option<f64>,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::Initialization { width, height });
        }
        tracing::debug!("Created {}x{} SVG renderer", width, height);

        Ok(Self {
            width,
            height,
            dpi: DEFAULT_DPI,
            background: None,
            elements: Vec::new(),
            path: String::new(),
            stroke_color: Color::BLACK,
            fill_color: Color::WHITE,
            stroke_width: 1.0,
            dash_array: Vec::new(),
            font: None,
            font_size: DEFAULT_FONT_SIZE,
            font_color: Color::BLACK,
            rotation: None,
        })
    }

    pub fn with_config(config: &RenderConfig) -> Result<Self> {
        let mut renderer = Self::new(config.width, config.height)?;
        renderer.dpi = config.dpi;
        renderer.background = config.background;
        Ok(renderer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Elements emitted so far
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    /// Complete SVG document
    pub fn to_document(&self) -> String {
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        doc.push('\n');
        if let Some(background) = self.background {
            let _ = writeln!(
                doc,
                r#"<rect x="0" y="0" width="{}" height="{}" style="fill:{}"/>"#,
                self.width,
                self.height,
                background.to_css()
            );
        }
        for element in &self.elements {
            doc.push_str(element);
            doc.push('\n');
        }
        doc.push_str("</svg>\n");
        doc
    }

    fn path_command(&mut self, command: std::fmt::Arguments<'_>) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        let _ = self.path.write_fmt(command);
    }

    fn stroke_style(&self) -> String {
        let mut style = format!(
            "stroke-width:{};stroke:{}",
            format_number(self.stroke_width),
            self.stroke_color.to_css()
        );
        if !self.dash_array.is_empty() {
            let dashes: Vec<String> = self.dash_array.iter().map(|&d| format_number(d)).collect();
            let _ = write!(style, ";stroke-dasharray:{}", dashes.join(","));
        }
        style
    }

    fn emit_path(&mut self, style: String) {
        if self.path.is_empty() {
            return;
        }
        let data = std::mem::take(&mut self.path);
        self.elements.push(format!(r#"<path d="{}" style="{}"/>"#, data, style));
    }

    fn font_size_px(&self) -> f64 {
        points_to_pixels(self.font_size, self.dpi)
    }
}

impl Renderer for SvgRenderer {
    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_width = width;
    }

    fn set_stroke_dash_array(&mut self, dash_array: &[f64]) {
        self.dash_array = dash_array.to_vec();
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.path_command(format_args!("M {} {}", x, y));
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.path_command(format_args!("L {} {}", x, y));
    }

    fn quad_curve_to(&mut self, cx: i32, cy: i32, x: i32, y: i32) {
        self.path_command(format_args!("Q {} {} {} {}", cx, cy, x, y));
    }

    fn arc_to(&mut self, cx: i32, cy: i32, rx: f64, ry: f64, start_angle: f64, delta: f64) {
        let (cx, cy) = (cx as f64, cy as f64);
        let point = |angle: f64| (cx + rx * angle.cos(), cy + ry * angle.sin());

        let (sx, sy) = point(start_angle);
        let lead = if self.path.is_empty() { 'M' } else { 'L' };
        self.path_command(format_args!("{} {} {}", lead, format_number(sx), format_number(sy)));

        if delta == 0.0 || !delta.is_finite() {
            return;
        }

        // An arc whose end meets its start draws nothing in SVG, so full
        // turns are split in half.
        let delta = delta.clamp(-TAU, TAU);
        let halves = if delta.abs() >= TAU - f64::EPSILON { 2 } else { 1 };
        let step = delta / halves as f64;
        let sweep = if delta > 0.0 { 1 } else { 0 };
        let large_arc = if step.abs() > PI { 1 } else { 0 };

        for i in 1..=halves {
            let (ex, ey) = point(start_angle + step * i as f64);
            self.path_command(format_args!(
                "A {} {} 0 {} {} {} {}",
                format_number(rx),
                format_number(ry),
                large_arc,
                sweep,
                format_number(ex),
                format_number(ey)
            ));
        }
    }

    fn close(&mut self) {
        self.path_command(format_args!("Z"));
    }

    fn stroke(&mut self) {
        let style = format!("{};fill:none", self.stroke_style());
        self.emit_path(style);
    }

    fn fill(&mut self) {
        let style = format!("stroke-width:0;stroke:none;fill:{}", self.fill_color.to_css());
        self.emit_path(style);
    }

    fn fill_stroke(&mut self) {
        let style = format!("{};fill:{}", self.stroke_style(), self.fill_color.to_css());
        self.emit_path(style);
    }

    fn circle(&mut self, radius: f64, x: i32, y: i32) {
        let (xf, yf) = (x as f64, y as f64);
        let (w, e) = (format_number(xf - radius), format_number(xf + radius));
        let (n, s) = (format_number(yf - radius), format_number(yf + radius));
        self.path_command(format_args!(
            "M {w} {y} Q {x} {y} {x} {n} Q {x} {y} {e} {y} Q {x} {y} {x} {s} Q {x} {y} {w} {y} Z"
        ));
        self.fill_stroke();
    }

    fn set_font(&mut self, font: Arc<Font>) {
        self.font = Some(font);
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn set_font_color(&mut self, color: Color) {
        self.font_color = color;
        self.fill_color = color;
        self.stroke_color = color;
    }

    fn text(&mut self, body: &str, x: i32, y: i32) {
        let mut style = format!(
            "fill:{};font-size:{}px",
            self.font_color.to_css(),
            format_number(self.font_size_px())
        );
        if let Some(family) = self.font.as_ref().and_then(|font| font.family()) {
            let _ = write!(style, ";font-family:'{}'", escape_text(family));
        }

        let transform = self
            .rotation
            .map(|radians| {
                format!(
                    r#" transform="rotate({},{},{})""#,
                    format_number(radians.to_degrees()),
                    x,
                    y
                )
            })
            .unwrap_or_default();

        self.elements.push(format!(
            r#"<text x="{}" y="{}" style="{}"{}>{}</text>"#,
            x,
            y,
            style,
            transform,
            escape_text(body)
        ));
    }

    fn set_text_rotation(&mut self, radians: f64) {
        self.rotation = Some(radians);
    }

    fn clear_text_rotation(&mut self) {
        self.rotation = None;
    }

    fn try_measure_text(&self, body: &str) -> chart_text::Result<BoundingBox> {
        let font = self.font.as_ref().ok_or(TextError::NoFont)?;
        let bounds = TextLayout::new(font, body, self.font_size_px())?.bounds();
        Ok(measured_box(&bounds, self.rotation))
    }

    fn save(&mut self, w: &mut dyn Write) -> Result<()> {
        tracing::debug!(
            "Writing {}x{} SVG ({} elements)",
            self.width,
            self.height,
            self.elements.len()
        );
        w.write_all(self.to_document().as_bytes())?;
        w.flush()?;
        Ok(())
    }
}

/// Shortest decimal form, at most two fractional digits
fn format_number(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Escape XML special characters
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
