//! Configuration type definitions.

use std::path::PathBuf;
use std::time::Duration;

use super::enums::{CapStyle, ColorSpec, SmoothingMode};
use crate::draw::{Color, Smoothing, StrokeStyle, WHITE};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Paint canvas settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Canvas width in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_width")]
    pub width: i32,

    /// Canvas height in pixels (valid range: 16 - 8192)
    #[serde(default = "default_canvas_height")]
    pub height: i32,

    /// Background the canvas is cleared to; "transparent" keeps an alpha channel
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background: default_background(),
        }
    }
}

impl CanvasConfig {
    pub fn background_color(&self) -> Color {
        self.background.to_color_or(WHITE)
    }
}

/// Pen defaults for the paint canvas.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default pen color - either a named color (red, green, blue, yellow, orange, pink, white, black)
    /// or an RGB array like `[255, 0, 0]` for red
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default pen width in pixels (valid range: 1.0 - 100.0)
    #[serde(default = "default_thickness")]
    pub default_thickness: f64,

    /// Stroke end cap (round, butt, square)
    #[serde(default = "default_cap")]
    pub cap: CapStyle,

    /// Interpolation between pointer samples (none, quadratic)
    #[serde(default = "default_smoothing")]
    pub smoothing: SmoothingMode,

    /// Minimum pointer travel in pixels before quadratic smoothing accepts a
    /// new sample (valid range: 0.0 - 32.0)
    #[serde(default = "default_touch_tolerance")]
    pub touch_tolerance: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_thickness: default_thickness(),
            cap: default_cap(),
            smoothing: default_smoothing(),
            touch_tolerance: default_touch_tolerance(),
        }
    }
}

impl DrawingConfig {
    /// The pen style new strokes start with.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.default_color.to_color(), self.default_thickness)
            .with_cap(self.cap.into())
            .with_smoothing(self.smoothing(self.smoothing))
    }

    /// Expands a smoothing mode with the configured tolerance.
    pub fn smoothing(&self, mode: SmoothingMode) -> Smoothing {
        match mode {
            SmoothingMode::None => Smoothing::None,
            SmoothingMode::Quadratic => Smoothing::Quadratic {
                tolerance: self.touch_tolerance,
            },
        }
    }
}

/// Raster export settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory exported drawings are written to (defaults to the pictures directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// File name without extension; chrono format specifiers are expanded
    #[serde(default = "default_filename_template")]
    pub filename_template: String,

    /// Replace an existing file instead of picking "name (1).png"
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename_template: default_filename_template(),
            overwrite: false,
        }
    }
}

/// Doodle recognizer settings.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RecognizerConfig {
    /// Model artifact path (defaults to `model.ddlm` in the config directory)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Brush width on the 28x28 grid in grid pixels (valid range: 0.5 - 8.0)
    #[serde(default = "default_brush_width")]
    pub brush_width: f64,

    /// Inference timeout in milliseconds (valid range: 100 - 60000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            brush_width: default_brush_width(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl RecognizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> i32 {
    800
}

fn default_canvas_height() -> i32 {
    600
}

fn default_background() -> ColorSpec {
    ColorSpec::Name("white".to_string())
}

fn default_color() -> ColorSpec {
    ColorSpec::Name("black".to_string())
}

fn default_thickness() -> f64 {
    8.0
}

fn default_cap() -> CapStyle {
    CapStyle::Round
}

fn default_smoothing() -> SmoothingMode {
    SmoothingMode::Quadratic
}

fn default_touch_tolerance() -> f64 {
    4.0
}

fn default_filename_template() -> String {
    "drawing".to_string()
}

fn default_brush_width() -> f64 {
    2.0
}

fn default_timeout_ms() -> u64 {
    2000
}
