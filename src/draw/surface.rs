//! Paint canvas state machine: open stroke, committed history, cached raster.

use log::{debug, error, info};

use super::color::Color;
use super::history::StrokeHistory;
use super::raster::{Canvas, RasterError, RasterSnapshot};
use super::stroke::{Point, Stroke, StrokeBuilder, StrokeStyle};
use crate::input::PointerEvent;

/// Free-form drawing surface with single-level-at-a-time undo.
///
/// Pointer input arrives as explicit `begin_stroke` / `extend_stroke` /
/// `end_stroke` calls. Committed strokes are composited onto the cached
/// raster; undo drops the newest stroke and replays the rest from a blank
/// canvas because anti-aliased compositing cannot be reversed.
#[derive(Debug)]
pub struct DrawingSurface {
    history: StrokeHistory,
    open: Option<StrokeBuilder>,
    canvas: Canvas,
}

impl DrawingSurface {
    /// Creates a blank surface of the given size.
    pub fn new(width: i32, height: i32, background: Color) -> Result<Self, RasterError> {
        let canvas = Canvas::new(width, height, background)?;
        info!("Drawing surface ready ({}x{})", width, height);
        Ok(Self {
            history: StrokeHistory::new(),
            open: None,
            canvas,
        })
    }

    pub fn width(&self) -> i32 {
        self.canvas.width()
    }

    pub fn height(&self) -> i32 {
        self.canvas.height()
    }

    pub fn background(&self) -> Color {
        self.canvas.background()
    }

    /// Committed strokes in draw order.
    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    /// True while a stroke is open (pointer held down).
    pub fn is_drawing(&self) -> bool {
        self.open.is_some()
    }

    /// Samples of the open stroke, for live previews.
    pub fn open_points(&self) -> Option<&[Point]> {
        self.open.as_ref().map(StrokeBuilder::points)
    }

    /// Starts a stroke at `point`. A second pointer-down while a stroke is
    /// open is ignored.
    pub fn begin_stroke(&mut self, point: Point, style: StrokeStyle) {
        if self.open.is_some() {
            debug!("Ignoring pointer-down at {:?}: stroke already open", point);
            return;
        }
        self.open = Some(StrokeBuilder::new(point, style));
    }

    /// Appends a sample to the open stroke; no-op when idle.
    pub fn extend_stroke(&mut self, point: Point) {
        if let Some(open) = self.open.as_mut() {
            open.push(point);
        }
    }

    /// Commits the open stroke; no-op when idle.
    pub fn end_stroke(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };

        let stroke = open.finish();
        if let Err(e) = self.canvas.composite(&stroke) {
            error!("Failed to composite stroke: {}", e);
        }
        debug!(
            "Committed stroke #{} ({} points)",
            self.history.len() + 1,
            stroke.points().len()
        );
        self.history.push(stroke);
    }

    /// Removes the newest committed stroke and rebuilds the raster from the
    /// remaining history. Returns the removed stroke, or `None` when the
    /// history is empty (nothing changes).
    pub fn undo(&mut self) -> Option<Stroke> {
        let removed = self.history.undo()?;
        if let Err(e) = self.canvas.rebuild(self.history.strokes()) {
            error!("Failed to rebuild canvas after undo: {}", e);
        }
        debug!("Undo: {} strokes remain", self.history.len());
        Some(removed)
    }

    /// Snapshot of the committed drawing.
    pub fn export_raster(&self) -> Result<RasterSnapshot, RasterError> {
        self.canvas.snapshot()
    }

    /// Routes a pointer event to the matching stroke transition.
    pub fn handle_pointer(&mut self, event: PointerEvent, style: StrokeStyle) {
        match event {
            PointerEvent::Down { x, y } => self.begin_stroke((x, y), style),
            PointerEvent::Move { x, y } => self.extend_stroke((x, y)),
            PointerEvent::Up => self.end_stroke(),
        }
    }
}
