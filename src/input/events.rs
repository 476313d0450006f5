//! Pointer event types delivered by whatever hosts the drawing modules.

use crate::util::scale_point;

/// A single pointer (touch or primary mouse button) event.
///
/// Coordinates are in the pixel space of the view that produced them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed (starts a gesture)
    Down { x: f64, y: f64 },
    /// Pointer dragged while pressed
    Move { x: f64, y: f64 },
    /// Pointer released (ends the gesture)
    Up,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<(f64, f64)> {
        match *self {
            PointerEvent::Down { x, y } | PointerEvent::Move { x, y } => Some((x, y)),
            PointerEvent::Up => None,
        }
    }

    /// Maps the event from a `source` sized view onto a `target` sized raster.
    pub fn scaled(self, source: (f64, f64), target: (f64, f64)) -> Self {
        match self {
            PointerEvent::Down { x, y } => {
                let (x, y) = scale_point((x, y), source, target);
                PointerEvent::Down { x, y }
            }
            PointerEvent::Move { x, y } => {
                let (x, y) = scale_point((x, y), source, target);
                PointerEvent::Move { x, y }
            }
            PointerEvent::Up => PointerEvent::Up,
        }
    }
}
