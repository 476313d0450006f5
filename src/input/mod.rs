//! Pointer input plumbing.
//!
//! The drawing modules never talk to a UI toolkit. Hosts translate their
//! native touch or mouse events into [`PointerEvent`]s; the shell reads them
//! from a [`GestureScript`].

pub mod events;
pub mod gesture;
pub mod script;

pub use events::PointerEvent;
pub use gesture::GestureTracker;
pub use script::{GestureScript, ScriptAction};
