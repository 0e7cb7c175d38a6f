//! Renderer configuration

use serde::{Deserialize, Serialize};

use crate::Color;

/// Default resolution, in dots per inch
pub const DEFAULT_DPI: f64 = 96.0;

/// Default font size, in points
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Renderer configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Resolution used to size text
    pub dpi: f64,

    /// Canvas color painted before any drawing (transparent when unset)
    pub background: Option<Color>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 400,
            dpi: DEFAULT_DPI,
            background: None,
        }
    }
}

impl RenderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}
