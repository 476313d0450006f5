//! Classifier capability and the result it produces.

use std::time::{Duration, Instant};

use thiserror::Error;

use super::labels::{LABEL_COUNT, LABELS};
use super::tensor::InputTensor;

/// Scores an input tensor against the label vocabulary.
///
/// Implementations block the calling thread. They must return exactly
/// [`LABEL_COUNT`] probabilities, index-aligned with [`LABELS`].
pub trait Classifier: Send + Sync {
    fn classify(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifyError>;
}

/// Errors returned by a classifier backend.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifyError {
    #[error("Classifier returned {actual} probabilities, expected {expected}")]
    OutputLength { expected: usize, actual: usize },

    #[error("Classifier failed: {0}")]
    Backend(String),
}

/// Per-label probabilities for one recognize action.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    probabilities: [f32; LABEL_COUNT],
    top: usize,
    elapsed: Duration,
}

impl ClassificationResult {
    /// Validates the classifier output and picks the arg-max label.
    pub fn new(probabilities: Vec<f32>, elapsed: Duration) -> Result<Self, ClassifyError> {
        let actual = probabilities.len();
        let probabilities: [f32; LABEL_COUNT] =
            probabilities
                .try_into()
                .map_err(|_| ClassifyError::OutputLength {
                    expected: LABEL_COUNT,
                    actual,
                })?;
        let top = arg_max(&probabilities).unwrap_or(0);
        Ok(Self {
            probabilities,
            top,
            elapsed,
        })
    }

    pub fn probabilities(&self) -> &[f32; LABEL_COUNT] {
        &self.probabilities
    }

    pub fn top_index(&self) -> usize {
        self.top
    }

    pub fn top_label(&self) -> &'static str {
        LABELS[self.top]
    }

    pub fn top_probability(&self) -> f32 {
        self.probabilities[self.top]
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Label and probability pairs in vocabulary order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f32)> + '_ {
        LABELS.iter().copied().zip(self.probabilities.iter().copied())
    }
}

/// Index of the largest value. The first maximum wins and NaN never does.
///
/// Returns `None` for an empty slice or one holding only NaN.
pub fn arg_max(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, max)) if value <= max => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Runs `classifier` on `input`, timing the call.
pub fn classify<C>(classifier: &C, input: &InputTensor) -> Result<ClassificationResult, ClassifyError>
where
    C: Classifier + ?Sized,
{
    let started = Instant::now();
    let probabilities = classifier.classify(input)?;
    let elapsed = started.elapsed();
    log::debug!("Inference took {:?}", elapsed);
    ClassificationResult::new(probabilities, elapsed)
}
