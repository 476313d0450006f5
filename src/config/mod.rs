//! Configuration file support for doodlepad.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/doodlepad/config.toml`. Settings include the canvas size, pen
//! defaults, export location and recognizer tuning.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{CapStyle, ColorSpec, SmoothingMode};
pub use types::{CanvasConfig, DrawingConfig, ExportConfig, RecognizerConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::export::{ExportRequest, file::expand_tilde};

const APP_DIR: &str = "doodlepad";
const MODEL_FILE_NAME: &str = "model.ddlm";

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// width = 800
/// height = 600
/// background = "white"
///
/// [drawing]
/// default_color = "red"
/// default_thickness = 4.0
///
/// [export]
/// filename_template = "drawing_%Y-%m-%d"
///
/// [recognizer]
/// brush_width = 2.0
/// ```
#[derive(Debug, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Paint canvas size and background
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Pen defaults (color, thickness, cap, smoothing)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Where and how drawings are exported
    #[serde(default)]
    pub export: ExportConfig,

    /// Doodle recognizer settings
    #[serde(default)]
    pub recognizer: RecognizerConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.width` / `canvas.height`: 16 - 8192
    /// - `drawing.default_thickness`: 1.0 - 100.0
    /// - `drawing.touch_tolerance`: 0.0 - 32.0
    /// - `recognizer.brush_width`: 0.5 - 8.0
    /// - `recognizer.timeout_ms`: 100 - 60000
    fn validate_and_clamp(&mut self) {
        // Canvas size: 16 - 8192
        if !(16..=8192).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {}, clamping to 16-8192 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(16, 8192);
        }

        if !(16..=8192).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {}, clamping to 16-8192 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(16, 8192);
        }

        // Thickness: 1.0 - 100.0
        if !(1.0..=100.0).contains(&self.drawing.default_thickness) {
            log::warn!(
                "Invalid default_thickness {:.1}, clamping to 1.0-100.0 range",
                self.drawing.default_thickness
            );
            self.drawing.default_thickness = clamp_f64(self.drawing.default_thickness, 1.0, 100.0);
        }

        // Touch tolerance: 0.0 - 32.0
        if !(0.0..=32.0).contains(&self.drawing.touch_tolerance) {
            log::warn!(
                "Invalid touch_tolerance {:.1}, clamping to 0.0-32.0 range",
                self.drawing.touch_tolerance
            );
            self.drawing.touch_tolerance = clamp_f64(self.drawing.touch_tolerance, 0.0, 32.0);
        }

        // Recognizer brush: 0.5 - 8.0
        if !(0.5..=8.0).contains(&self.recognizer.brush_width) {
            log::warn!(
                "Invalid recognizer brush_width {:.1}, clamping to 0.5-8.0 range",
                self.recognizer.brush_width
            );
            self.recognizer.brush_width = clamp_f64(self.recognizer.brush_width, 0.5, 8.0);
        }

        // Timeout: 100 - 60000 ms
        if !(100..=60_000).contains(&self.recognizer.timeout_ms) {
            log::warn!(
                "Invalid recognizer timeout_ms {}, clamping to 100-60000 range",
                self.recognizer.timeout_ms
            );
            self.recognizer.timeout_ms = self.recognizer.timeout_ms.clamp(100, 60_000);
        }

        if self.export.filename_template.trim().is_empty() {
            log::warn!("Empty export filename_template, falling back to 'drawing'");
            self.export.filename_template = "drawing".to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/doodlepad/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined, or the file
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config directory.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path, or the
    /// directory or file cannot be written.
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&config_path, Self::example_toml())
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// The documented example configuration shipped with the binary.
    pub fn example_toml() -> &'static str {
        include_str!("../../config.example.toml")
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> Schema {
        schemars::schema_for!(Config)
    }

    /// Resolved model artifact path: the configured one, or `model.ddlm` next to
    /// the config file.
    pub fn model_path(&self) -> Option<PathBuf> {
        match &self.recognizer.model_path {
            Some(path) => Some(expand_tilde(&path.to_string_lossy())),
            None => dirs::config_dir().map(|dir| dir.join(APP_DIR).join(MODEL_FILE_NAME)),
        }
    }

    /// Export request built from the `[export]` section.
    ///
    /// `directory_override` takes precedence over the configured directory.
    pub fn export_request(&self, directory_override: Option<&Path>) -> ExportRequest {
        let mut request = ExportRequest::from_template(&self.export.filename_template)
            .with_overwrite(self.export.overwrite);

        let directory = directory_override
            .map(Path::to_path_buf)
            .or_else(|| {
                self.export
                    .directory
                    .as_ref()
                    .map(|dir| expand_tilde(&dir.to_string_lossy()))
            });
        if let Some(directory) = directory {
            request = request.with_directory(directory);
        }
        request
    }
}

/// Clamps a float, mapping NaN to `min`.
fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
