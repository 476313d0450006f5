//! Library exports for doodlepad.
//!
//! The paint canvas (`draw`), its PNG export (`export`) and the doodle
//! recognizer (`doodle`) are usable without the command-line shell, which
//! only replays gesture scripts through them.

pub mod config;
pub mod doodle;
pub mod draw;
pub mod export;
pub mod input;
pub mod util;

pub use config::Config;
