//! JSON gesture scripts replayed by the command-line shell.
//!
//! A script stands in for a touch screen: it lists pointer events and the
//! button presses (undo, clear, style changes) a user would make.
//!
//! ```json
//! {
//!   "source_size": [280, 280],
//!   "actions": [
//!     { "op": "style", "color": "red", "width": 4 },
//!     { "op": "down", "x": 0, "y": 0 },
//!     { "op": "move", "x": 10, "y": 10 },
//!     { "op": "up" },
//!     { "op": "undo" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::events::PointerEvent;
use crate::config::{CapStyle, ColorSpec, SmoothingMode};

/// One scripted user action.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Change the pen used by subsequent strokes; omitted fields keep their value
    Style {
        #[serde(default)]
        color: Option<ColorSpec>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        cap: Option<CapStyle>,
        #[serde(default)]
        smoothing: Option<SmoothingMode>,
    },
    Down {
        x: f64,
        y: f64,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up,
    /// Undo button on the paint canvas
    Undo,
    /// Clear button on the recognition pad
    Clear,
}

impl ScriptAction {
    /// The pointer event this action represents, if it is one.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            ScriptAction::Down { x, y } => Some(PointerEvent::Down { x, y }),
            ScriptAction::Move { x, y } => Some(PointerEvent::Move { x, y }),
            ScriptAction::Up => Some(PointerEvent::Up),
            _ => None,
        }
    }
}

/// A parsed gesture script.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct GestureScript {
    /// Size of the view the coordinates were captured in. When absent,
    /// coordinates are already in raster pixels.
    #[serde(default)]
    pub source_size: Option<[f64; 2]>,

    pub actions: Vec<ScriptAction>,
}

impl GestureScript {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read gesture script {}", path.display()))?;
        let script = Self::from_json(&json)
            .with_context(|| format!("Failed to parse gesture script {}", path.display()))?;
        log::debug!(
            "Loaded gesture script {} ({} actions)",
            path.display(),
            script.actions.len()
        );
        Ok(script)
    }
}
