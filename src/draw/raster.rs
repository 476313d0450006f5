//! Pixel buffers backing the paint canvas and the recognition grid.
//!
//! [`Canvas`] owns a Cairo image surface in premultiplied ARGB32 layout and is
//! always rebuilt from strokes, never edited in place. [`RasterSnapshot`] is
//! an immutable copy handed out for export and comparison.

use std::fmt;

use super::color::Color;
use super::render::{render_background, render_stroke, render_strokes};
use super::stroke::Stroke;
use thiserror::Error;

/// Errors raised by the raster backend.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Invalid raster size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Raster data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] cairo::IoError),
}

/// Fixed-size drawing target.
pub struct Canvas {
    surface: cairo::ImageSurface,
    background: Color,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish()
    }
}

impl Canvas {
    /// Allocates a canvas filled with `background`.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self, RasterError> {
        if width <= 0 || height <= 0 {
            return Err(RasterError::InvalidSize { width, height });
        }

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
        let canvas = Self {
            surface,
            background,
        };
        canvas.clear()?;
        Ok(canvas)
    }

    pub fn width(&self) -> i32 {
        self.surface.width()
    }

    pub fn height(&self) -> i32 {
        self.surface.height()
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Resets every pixel to the background color.
    pub fn clear(&self) -> Result<(), RasterError> {
        let ctx = cairo::Context::new(&self.surface)?;
        render_background(&ctx, self.background);
        Ok(())
    }

    /// Draws one stroke on top of the current pixels.
    pub fn composite(&self, stroke: &Stroke) -> Result<(), RasterError> {
        let ctx = cairo::Context::new(&self.surface)?;
        render_stroke(&ctx, stroke);
        Ok(())
    }

    /// Clears to the background and replays `strokes` in order.
    pub fn rebuild(&self, strokes: &[Stroke]) -> Result<(), RasterError> {
        let ctx = cairo::Context::new(&self.surface)?;
        render_background(&ctx, self.background);
        render_strokes(&ctx, strokes);
        Ok(())
    }

    /// Copies the current pixels.
    pub fn snapshot(&self) -> Result<RasterSnapshot, RasterError> {
        let mut data = Vec::new();
        self.surface.with_data(|bytes| data.extend_from_slice(bytes))?;
        Ok(RasterSnapshot {
            width: self.width(),
            height: self.height(),
            stride: self.surface.stride(),
            data,
        })
    }
}

/// Immutable copy of a raster in premultiplied ARGB32 layout.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterSnapshot {
    width: i32,
    height: i32,
    stride: i32,
    data: Vec<u8>,
}

impl fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterSnapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RasterSnapshot {
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn stride(&self) -> i32 {
        self.stride
    }

    /// Raw bytes, `stride * height` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied ARGB word at (x, y), or `None` outside the raster.
    pub fn argb(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.stride + x * 4) as usize;
        let bytes: [u8; 4] = self.data.get(offset..offset + 4)?.try_into().ok()?;
        Some(u32::from_ne_bytes(bytes))
    }

    /// Alpha channel at (x, y).
    pub fn alpha(&self, x: i32, y: i32) -> Option<u8> {
        self.argb(x, y).map(|word| (word >> 24) as u8)
    }

    /// Every pixel word in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).filter_map(move |x| self.argb(x, y)))
    }

    /// True if every pixel equals `argb`.
    pub fn is_uniform(&self, argb: u32) -> bool {
        self.pixels().all(|pixel| pixel == argb)
    }

    /// Encodes the snapshot as a PNG file.
    pub fn to_png(&self) -> Result<Vec<u8>, RasterError> {
        let surface = cairo::ImageSurface::create_for_data(
            self.data.clone(),
            cairo::Format::ARgb32,
            self.width,
            self.height,
            self.stride,
        )?;

        let mut buffer = Vec::new();
        surface.write_to_png(&mut buffer)?;
        Ok(buffer)
    }
}
