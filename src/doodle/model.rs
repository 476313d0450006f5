//! Packaged model artifact: a softmax regression over the grid pixels.
//!
//! Layout, all integers and floats little-endian:
//!
//! | offset | size              | field                                   |
//! |--------|-------------------|-----------------------------------------|
//! | 0      | 4                 | magic `DDLM`                            |
//! | 4      | 4                 | `u32` format version (1)                |
//! | 8      | 4                 | `u32` input count (784)                 |
//! | 12     | 4                 | `u32` class count (10)                  |
//! | 16     | 4 * classes * in  | `f32` weights, one row per class        |
//! | ...    | 4 * classes       | `f32` biases                            |

use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;
use ndarray::{Array1, Array2, ArrayView1};
use thiserror::Error;

use super::classifier::{Classifier, ClassifyError};
use super::grid::GRID_PIXELS;
use super::labels::LABEL_COUNT;
use super::tensor::InputTensor;

pub const MODEL_MAGIC: &[u8; 4] = b"DDLM";
pub const MODEL_VERSION: u32 = 1;
const HEADER_LEN: usize = 16;

/// Errors raised while loading a model artifact.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("not a doodle model (bad magic)")]
    BadMagic,

    #[error("unsupported model version {0}")]
    UnsupportedVersion(u32),

    #[error("model shape {inputs}x{classes} does not match {expected_inputs}x{expected_classes}")]
    ShapeMismatch {
        inputs: usize,
        classes: usize,
        expected_inputs: usize,
        expected_classes: usize,
    },

    #[error("model file truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Dense single-layer classifier loaded from a `.ddlm` artifact.
#[derive(Debug, Clone)]
pub struct DenseModel {
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl DenseModel {
    /// Memory-maps and validates the artifact at `path`.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and copied into owned arrays before
        // this function returns.
        let mmap = unsafe { Mmap::map(&file)? };
        let model = Self::parse(&mmap)?;
        log::info!(
            "Loaded model from {} ({} bytes)",
            path.display(),
            mmap.len()
        );
        Ok(model)
    }

    /// Parses an in-memory artifact.
    pub fn parse(bytes: &[u8]) -> Result<Self, ModelError> {
        if bytes.len() < HEADER_LEN {
            return Err(ModelError::Truncated {
                expected: HEADER_LEN,
                actual: bytes.len(),
            });
        }
        if &bytes[0..4] != MODEL_MAGIC {
            return Err(ModelError::BadMagic);
        }

        let version = read_u32(bytes, 4);
        if version != MODEL_VERSION {
            return Err(ModelError::UnsupportedVersion(version));
        }

        let inputs = read_u32(bytes, 8) as usize;
        let classes = read_u32(bytes, 12) as usize;
        if inputs != GRID_PIXELS || classes != LABEL_COUNT {
            return Err(ModelError::ShapeMismatch {
                inputs,
                classes,
                expected_inputs: GRID_PIXELS,
                expected_classes: LABEL_COUNT,
            });
        }

        let expected = HEADER_LEN + 4 * (classes * inputs + classes);
        if bytes.len() < expected {
            return Err(ModelError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }

        let floats: Vec<f32> = bytes[HEADER_LEN..expected]
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        let (weights, bias) = floats.split_at(classes * inputs);
        Self::from_parts(weights.to_vec(), bias.to_vec())
    }

    /// Builds a model from row-major `weights` (`classes x inputs`) and `bias`.
    pub fn from_parts(weights: Vec<f32>, bias: Vec<f32>) -> Result<Self, ModelError> {
        let shape_error = |weights: usize, bias: usize| ModelError::ShapeMismatch {
            inputs: weights / bias.max(1),
            classes: bias,
            expected_inputs: GRID_PIXELS,
            expected_classes: LABEL_COUNT,
        };
        if bias.len() != LABEL_COUNT || weights.len() != LABEL_COUNT * GRID_PIXELS {
            return Err(shape_error(weights.len(), bias.len()));
        }

        let weights = Array2::from_shape_vec((LABEL_COUNT, GRID_PIXELS), weights)
            .map_err(|_| shape_error(LABEL_COUNT * GRID_PIXELS, LABEL_COUNT))?;
        Ok(Self {
            weights,
            bias: Array1::from_vec(bias),
        })
    }

    /// Serializes the model in the artifact format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + 4 * (self.weights.len() + self.bias.len()));
        bytes.extend_from_slice(MODEL_MAGIC);
        bytes.extend_from_slice(&MODEL_VERSION.to_le_bytes());
        bytes.extend_from_slice(&(GRID_PIXELS as u32).to_le_bytes());
        bytes.extend_from_slice(&(LABEL_COUNT as u32).to_le_bytes());
        for value in self.weights.iter().chain(self.bias.iter()) {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    /// Writes the artifact to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), ModelError> {
        fs::write(path, self.to_bytes())?;
        log::debug!("Wrote model artifact to {}", path.display());
        Ok(())
    }
}

impl Classifier for DenseModel {
    fn classify(&self, input: &InputTensor) -> Result<Vec<f32>, ClassifyError> {
        let features: Vec<f32> = input.values().collect();
        if features.len() != GRID_PIXELS {
            return Err(ClassifyError::Backend(format!(
                "expected {} input values, got {}",
                GRID_PIXELS,
                features.len()
            )));
        }

        let logits = self.weights.dot(&ArrayView1::from(&features[..])) + &self.bias;
        Ok(softmax(&logits).to_vec())
    }
}

fn softmax(x: &Array1<f32>) -> Array1<f32> {
    let max = x.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exp: Array1<f32> = x.mapv(|v| (v - max).exp());
    let sum: f32 = exp.sum();
    exp / sum
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
