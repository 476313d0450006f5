//! Stroke model and Cairo rasterization for the paint canvas.
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Stroke`] and [`StrokeStyle`]: committed gestures and their attributes
//! - [`StrokeHistory`]: append-only list of strokes, the canvas source of truth
//! - [`Canvas`] and [`RasterSnapshot`]: the derived pixel buffer
//! - [`DrawingSurface`]: begin/extend/end/undo/export over all of the above

pub mod color;
pub mod history;
pub mod raster;
pub mod render;
pub mod stroke;
pub mod surface;


pub use color::Color;
pub use history::StrokeHistory;
pub use raster::{Canvas, RasterError, RasterSnapshot};
pub use render::{render_background, render_stroke, render_strokes};
pub use stroke::{Point, Smoothing, Stroke, StrokeBuilder, StrokeCap, StrokeStyle};
pub use surface::DrawingSurface;

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
