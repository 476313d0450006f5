//! Ordered record of committed strokes.

use super::stroke::Stroke;

/// Append-only list of committed strokes, newest last.
///
/// This is the source of truth for the paint canvas; the raster is derived
/// from it. Only the most recent stroke can be removed and there is no redo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
}

impl StrokeHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a committed stroke (drawn on top of existing strokes).
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    /// Removes and returns the most recently committed stroke, if any.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    /// Strokes in draw order (first = bottom layer, last = top layer).
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
