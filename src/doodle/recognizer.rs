//! Owns the classifier and runs recognize actions on the grid.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::classifier::{ClassificationResult, Classifier, ClassifyError, classify};
use super::grid::RecognitionRaster;
use super::model::DenseModel;
use super::tensor::{InputTensor, to_tensor};
use crate::draw::RasterError;

/// Status line shown after a successful model load.
pub const MODEL_LOADED_MESSAGE: &str = "The model was loaded successfully.";

/// Errors from a recognize action.
#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("Recognition is disabled: the model is not loaded")]
    Disabled,

    #[error("Failed to read recognition grid: {0}")]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error("Recognition service is not running")]
    ServiceStopped,
}

/// Classifier handle acquired once at startup.
///
/// A failed load leaves the recognizer disabled. Drawing and export do not
/// depend on it.
pub struct Recognizer {
    classifier: Option<Arc<dyn Classifier>>,
    status: String,
}

impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("enabled", &self.is_enabled())
            .field("status", &self.status)
            .finish()
    }
}

impl Recognizer {
    /// Loads the model artifact at `path`. Never fails.
    pub fn load(path: &Path) -> Self {
        match DenseModel::load(path) {
            Ok(model) => Self::with_classifier(Arc::new(model)),
            Err(err) => {
                log::error!("Failed to load model {}: {}", path.display(), err);
                Self::disabled(err)
            }
        }
    }

    pub fn with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
            status: MODEL_LOADED_MESSAGE.to_string(),
        }
    }

    /// A recognizer whose model could not be acquired.
    pub fn disabled(reason: impl fmt::Display) -> Self {
        Self {
            classifier: None,
            status: format!("Failed to load the model: {}", reason),
        }
    }

    /// Whether the recognize action is available.
    pub fn is_enabled(&self) -> bool {
        self.classifier.is_some()
    }

    /// User-visible load status.
    pub fn status_message(&self) -> &str {
        &self.status
    }

    pub fn classifier(&self) -> Option<Arc<dyn Classifier>> {
        self.classifier.clone()
    }

    /// Builds the classifier input for the grid.
    ///
    /// A blank grid is a no-op and yields `Ok(None)`.
    pub fn prepare(&self, raster: &RecognitionRaster) -> Result<Option<InputTensor>, RecognizeError> {
        if !self.is_enabled() {
            return Err(RecognizeError::Disabled);
        }

        if raster.is_blank()? {
            log::debug!("Recognition grid is blank, nothing to classify");
            return Ok(None);
        }

        Ok(Some(to_tensor(raster)?))
    }

    /// Classifies the grid, see [`prepare`](Self::prepare).
    pub fn recognize(
        &self,
        raster: &RecognitionRaster,
    ) -> Result<Option<ClassificationResult>, RecognizeError> {
        let classifier = self.classifier.as_ref().ok_or(RecognizeError::Disabled)?;
        let Some(tensor) = self.prepare(raster)? else {
            return Ok(None);
        };

        let result = classify(classifier.as_ref(), &tensor)?;
        log::info!(
            "Recognized '{}' ({:.2}%)",
            result.top_label(),
            100.0 * result.top_probability()
        );
        Ok(Some(result))
    }
}
