//! Configuration enum types.

use crate::draw::{Color, StrokeCap, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// default_color = "red"
///
/// # Custom RGB color (0-255 per component)
/// default_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black, transparent
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`] struct.
    ///
    /// Unknown color names fall back to `fallback` with a warning. RGB arrays
    /// are converted from the 0-255 range with full opacity.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!(
                    "Unknown color '{}', using {}",
                    name,
                    crate::util::color_to_name(&fallback).to_lowercase()
                );
                fallback
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// Converts to a pen color, falling back to black.
    pub fn to_color(&self) -> Color {
        self.to_color_or(BLACK)
    }
}

/// Line cap used for strokes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CapStyle {
    Round,
    Butt,
    Square,
}

impl From<CapStyle> for StrokeCap {
    fn from(style: CapStyle) -> Self {
        match style {
            CapStyle::Round => StrokeCap::Round,
            CapStyle::Butt => StrokeCap::Butt,
            CapStyle::Square => StrokeCap::Square,
        }
    }
}

/// Interpolation between sparse pointer samples.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SmoothingMode {
    /// Straight segments through every sample
    None,
    /// Quadratic curves through sample midpoints
    Quadratic,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_spec_conversions() {
        assert_eq!(ColorSpec::Name("blue".into()).to_color(), BLUE);
        assert_eq!(ColorSpec::Name("mauve".into()).to_color(), BLACK);
        assert_eq!(ColorSpec::Name("mauve".into()).to_color_or(WHITE), WHITE);
        assert_eq!(ColorSpec::Rgb([255, 0, 0]).to_color(), RED);
    }

    #[test]
    fn cap_style_maps_to_stroke_cap() {
        assert_eq!(StrokeCap::from(CapStyle::Butt), StrokeCap::Butt);
        assert_eq!(StrokeCap::from(CapStyle::Round), StrokeCap::Round);
    }
}
