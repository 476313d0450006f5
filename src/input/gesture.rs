//! Collects pointer events into complete gestures.

use super::events::PointerEvent;
use crate::draw::Point;

/// Accumulates the samples of one pointer-down-to-pointer-up gesture.
///
/// Used by surfaces that consume whole gestures at once (the recognition
/// grid) rather than incremental begin/extend/end calls.
#[derive(Debug, Default)]
pub struct GestureTracker {
    points: Option<Vec<Point>>,
}

impl GestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True between a pointer-down and the matching pointer-up.
    pub fn is_active(&self) -> bool {
        self.points.is_some()
    }

    /// Feeds an event; returns the finished gesture on pointer-up.
    ///
    /// A pointer-down during an active gesture is ignored, matching the
    /// paint canvas. Moves and ups without a gesture are dropped.
    pub fn handle(&mut self, event: PointerEvent) -> Option<Vec<Point>> {
        match event {
            PointerEvent::Down { x, y } => {
                if self.points.is_none() {
                    self.points = Some(vec![(x, y)]);
                }
                None
            }
            PointerEvent::Move { x, y } => {
                if let Some(points) = self.points.as_mut() {
                    points.push((x, y));
                }
                None
            }
            PointerEvent::Up => self.points.take(),
        }
    }

    /// Drops any gesture in progress.
    pub fn cancel(&mut self) {
        self.points = None;
    }
}
