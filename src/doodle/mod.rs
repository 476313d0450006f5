//! Doodle recognition on a fixed 28x28 grid.
//!
//! Gestures are painted onto a [`RecognitionRaster`], converted to a
//! normalized [`InputTensor`] and scored by a [`Classifier`] over a fixed
//! ten-label vocabulary. [`Recognizer`] ties a loaded model to the grid and
//! [`RecognitionService`] moves inference onto a tokio worker.

pub mod classifier;
pub mod grid;
pub mod labels;
pub mod model;
pub mod present;
pub mod recognizer;
pub mod service;
pub mod tensor;

#[cfg(test)]
mod tests;

pub use classifier::{ClassificationResult, Classifier, ClassifyError, arg_max, classify};
pub use grid::{
    BATCH_SIZE, DEFAULT_BRUSH_WIDTH, GRID_CHANNELS, GRID_HEIGHT, GRID_PIXELS, GRID_WIDTH,
    RecognitionRaster,
};
pub use labels::{LABEL_COUNT, LABELS};
pub use model::{DenseModel, ModelError};
pub use present::present;
pub use recognizer::{MODEL_LOADED_MESSAGE, RecognizeError, Recognizer};
pub use service::{RecognitionOutcome, RecognitionService, RecognitionStatus};
pub use tensor::{InputTensor, to_tensor};
