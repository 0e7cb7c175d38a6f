//! Render a small sample line chart to PNG and SVG
//!
//! Usage: render-sample [OUTPUT_DIR] [--config FILE]

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chart_render::{
    png_renderer, svg_renderer, Color, Font, FontDatabase, RenderConfig, Renderer, RendererProvider,
};
use tracing_subscriber::EnvFilter;

const SERIES: [f64; 8] = [3.0, 7.5, 6.0, 9.0, 4.5, 8.0, 11.0, 10.0];
const PADDING: i32 = 48;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut output_dir = PathBuf::from(".");
    let mut config = RenderConfig::new(640, 360).with_background(Color::WHITE);

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config needs a file path")?;
            config = load_config(Path::new(&path))?;
        } else {
            output_dir = PathBuf::from(arg);
        }
    }

    let font = FontDatabase::with_system_fonts()
        .query(&["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica", "sans-serif"])
        .map(Arc::new)
        .map_err(|err| tracing::warn!("{}, labels will be skipped", err))
        .ok();

    let providers: [(&str, RendererProvider); 2] = [("png", png_renderer), ("svg", svg_renderer)];
    for (extension, provider) in providers {
        let mut renderer = provider(config.width, config.height)?;
        renderer.set_dpi(config.dpi);
        draw_chart(renderer.as_mut(), &config, font.clone());

        let path = output_dir.join(format!("sample.{extension}"));
        save(renderer.as_mut(), &path)?;
        tracing::info!("Wrote {}", path.display());
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<RenderConfig> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(file).with_context(|| format!("parsing {}", path.display()))
}

fn save(renderer: &mut dyn Renderer, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    renderer
        .save(&mut writer)
        .with_context(|| format!("writing {}", path.display()))
}

fn draw_chart(r: &mut dyn Renderer, config: &RenderConfig, font: Option<Arc<Font>>) {
    let width = config.width as i32;
    let height = config.height as i32;
    let (left, top) = (PADDING, PADDING / 2);
    let (right, bottom) = (width - PADDING / 2, height - PADDING);

    if let Some(background) = config.background {
        r.set_fill_color(background);
        r.move_to(0, 0);
        r.line_to(width, 0);
        r.line_to(width, height);
        r.line_to(0, height);
        r.close();
        r.fill();
    }

    let max = SERIES.iter().cloned().fold(f64::MIN, f64::max).ceil();
    let step = (right - left) as f64 / (SERIES.len() - 1) as f64;
    let x_at = |i: usize| left + (step * i as f64) as i32;
    let y_at = |v: f64| bottom - ((bottom - top) as f64 * v / max) as i32;

    // Grid
    r.set_stroke_color(Color::rgb(0xdd, 0xdd, 0xdd));
    r.set_stroke_width(1.0);
    r.set_stroke_dash_array(&[4.0, 4.0]);
    for step in 1..=4 {
        let y = y_at(max * step as f64 / 4.0);
        r.move_to(left, y);
        r.line_to(right, y);
        r.stroke();
    }
    r.set_stroke_dash_array(&[]);

    // Axes
    r.set_stroke_color(Color::rgb(0x33, 0x33, 0x33));
    r.move_to(left, top);
    r.line_to(left, bottom);
    r.line_to(right, bottom);
    r.stroke();

    // Area under the series
    r.set_fill_color(Color::rgba(0x41, 0x69, 0xe1, 0x40));
    r.move_to(x_at(0), bottom);
    for (i, v) in SERIES.iter().enumerate() {
        r.line_to(x_at(i), y_at(*v));
    }
    r.line_to(x_at(SERIES.len() - 1), bottom);
    r.close();
    r.fill();

    // Series line and markers
    r.set_stroke_color(Color::rgb(0x41, 0x69, 0xe1));
    r.set_stroke_width(2.0);
    r.move_to(x_at(0), y_at(SERIES[0]));
    for (i, v) in SERIES.iter().enumerate().skip(1) {
        r.line_to(x_at(i), y_at(*v));
    }
    r.stroke();

    r.set_fill_color(Color::WHITE);
    for (i, v) in SERIES.iter().enumerate() {
        r.circle(4.0, x_at(i), y_at(*v));
    }

    let Some(font) = font else { return };

    // Labels
    r.set_font(font);
    r.set_font_size(9.0);
    r.set_font_color(Color::rgb(0x33, 0x33, 0x33));
    for (i, _) in SERIES.iter().enumerate() {
        let label = format!("Q{}", i + 1);
        let text_box = r.measure_text(&label);
        r.text(&label, x_at(i) - text_box.width() / 2, bottom + 8 + text_box.height());
    }

    let title = "Requests per second";
    r.set_text_rotation(-std::f64::consts::FRAC_PI_2);
    let title_box = r.measure_text(title);
    r.text(title, PADDING / 2, (top + bottom + title_box.height()) / 2);
    r.clear_text_rotation();
}
