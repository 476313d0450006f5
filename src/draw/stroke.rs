//! Stroke definitions for the paint canvas.

use super::color::{BLACK, Color};

/// A sampled pointer position in raster pixel coordinates.
pub type Point = (f64, f64);

/// How the ends of a stroke are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrokeCap {
    /// Semicircular ends; single-point strokes render as dots
    #[default]
    Round,
    /// Ends flush with the first and last point
    Butt,
    /// Square ends extending half the width past the end points
    Square,
}

impl StrokeCap {
    pub(crate) fn to_cairo(self) -> cairo::LineCap {
        match self {
            StrokeCap::Round => cairo::LineCap::Round,
            StrokeCap::Butt => cairo::LineCap::Butt,
            StrokeCap::Square => cairo::LineCap::Square,
        }
    }
}

/// Interpolation applied between sparse samples when a stroke is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Smoothing {
    /// Straight segments through every sample
    #[default]
    None,
    /// Quadratic curves through sample midpoints; samples closer than
    /// `tolerance` on both axes to the last accepted sample are skipped
    Quadratic { tolerance: f64 },
}

/// Drawing attributes captured when a stroke begins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Line width in pixels
    pub width: f64,
    /// End cap
    pub cap: StrokeCap,
    /// Interpolation between samples
    pub smoothing: Smoothing,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: BLACK,
            width: 4.0,
            cap: StrokeCap::Round,
            smoothing: Smoothing::None,
        }
    }
}

impl StrokeStyle {
    /// Plain round-capped polyline style.
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    pub fn with_cap(mut self, cap: StrokeCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

/// One committed pointer-down-to-pointer-up gesture.
///
/// Strokes are immutable: the only way to build one is through
/// [`StrokeBuilder::finish`] or [`Stroke::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    style: StrokeStyle,
}

impl Stroke {
    pub fn new(points: Vec<Point>, style: StrokeStyle) -> Self {
        Self { points, style }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
}

/// Accumulates samples for the stroke currently under the pointer.
#[derive(Clone, Debug)]
pub struct StrokeBuilder {
    points: Vec<Point>,
    style: StrokeStyle,
}

impl StrokeBuilder {
    pub fn new(start: Point, style: StrokeStyle) -> Self {
        Self {
            points: vec![start],
            style,
        }
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn finish(self) -> Stroke {
        Stroke::new(self.points, self.style)
    }
}
