//! The fixed 28x28 raster freehand doodles are drawn onto.

use crate::draw::{
    BLACK, Canvas, Point, RasterError, RasterSnapshot, Smoothing, Stroke, StrokeCap, StrokeStyle,
    TRANSPARENT,
};
use crate::util::scale_point;

pub const GRID_WIDTH: usize = 28;
pub const GRID_HEIGHT: usize = 28;
pub const GRID_CHANNELS: usize = 1;
pub const BATCH_SIZE: usize = 1;
pub const GRID_PIXELS: usize = GRID_WIDTH * GRID_HEIGHT * GRID_CHANNELS;

/// Brush width used when none is configured, in grid pixels.
pub const DEFAULT_BRUSH_WIDTH: f64 = 2.0;

/// Transparent 28x28 canvas. Only the alpha channel matters to the classifier.
#[derive(Debug)]
pub struct RecognitionRaster {
    canvas: Canvas,
    brush: StrokeStyle,
}

impl RecognitionRaster {
    /// Allocates a blank grid painted with an opaque brush of `brush_width`.
    pub fn new(brush_width: f64) -> Result<Self, RasterError> {
        let canvas = Canvas::new(GRID_WIDTH as i32, GRID_HEIGHT as i32, TRANSPARENT)?;
        let brush = StrokeStyle::new(BLACK, brush_width)
            .with_cap(StrokeCap::Round)
            .with_smoothing(Smoothing::None);
        Ok(Self { canvas, brush })
    }

    pub fn brush(&self) -> &StrokeStyle {
        &self.brush
    }

    /// Resets every pixel to alpha 0.
    pub fn clear(&mut self) {
        if let Err(err) = self.canvas.clear() {
            log::error!("Failed to clear recognition grid: {}", err);
        }
    }

    /// Rasterizes a gesture given in grid coordinates.
    pub fn paint(&mut self, points: &[Point]) {
        if points.is_empty() {
            return;
        }
        let stroke = Stroke::new(points.to_vec(), self.brush);
        if let Err(err) = self.canvas.composite(&stroke) {
            log::error!("Failed to paint on recognition grid: {}", err);
        }
    }

    /// Rasterizes a gesture captured in a `source_width` x `source_height` view.
    pub fn paint_scaled(&mut self, points: &[Point], source_width: f64, source_height: f64) {
        let target = (GRID_WIDTH as f64, GRID_HEIGHT as f64);
        let scaled: Vec<Point> = points
            .iter()
            .map(|&point| scale_point(point, (source_width, source_height), target))
            .collect();
        self.paint(&scaled);
    }

    /// Copies the current pixels.
    pub fn snapshot(&self) -> Result<RasterSnapshot, RasterError> {
        self.canvas.snapshot()
    }

    /// Alpha values in row-major order, `GRID_PIXELS` long.
    pub fn alphas(&self) -> Result<Vec<u8>, RasterError> {
        let snapshot = self.snapshot()?;
        Ok(snapshot.pixels().map(|word| (word >> 24) as u8).collect())
    }

    /// True if nothing has been drawn since the last clear.
    pub fn is_blank(&self) -> Result<bool, RasterError> {
        Ok(self.alphas()?.iter().all(|&alpha| alpha == 0))
    }
}
