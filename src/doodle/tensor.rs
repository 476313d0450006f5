//! Conversion from the recognition grid to the classifier's input tensor.

use ndarray::Array4;

use super::grid::{BATCH_SIZE, GRID_CHANNELS, GRID_HEIGHT, GRID_WIDTH, RecognitionRaster};
use crate::draw::RasterError;

/// Normalized input of shape `[batch, height, width, channel]`, values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    data: Array4<f32>,
}

impl InputTensor {
    /// All-zero tensor, the encoding of a blank grid.
    pub fn zeros() -> Self {
        Self {
            data: Array4::zeros((BATCH_SIZE, GRID_HEIGHT, GRID_WIDTH, GRID_CHANNELS)),
        }
    }

    /// Builds a tensor from row-major alpha values.
    ///
    /// Missing trailing values are treated as transparent.
    pub fn from_alphas(alphas: &[u8]) -> Self {
        let data = Array4::from_shape_fn(
            (BATCH_SIZE, GRID_HEIGHT, GRID_WIDTH, GRID_CHANNELS),
            |(_, h, w, _)| {
                let alpha = alphas.get(h * GRID_WIDTH + w).copied().unwrap_or(0);
                f32::from(alpha) / 255.0
            },
        );
        Self { data }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    /// Value at `[0][h][w][0]`.
    pub fn get(&self, h: usize, w: usize) -> Option<f32> {
        self.data.get((0, h, w, 0)).copied()
    }

    /// Flattened values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied()
    }
}

/// `tensor[0][h][w][0] = alpha(w, h) / 255`.
pub fn to_tensor(raster: &RecognitionRaster) -> Result<InputTensor, RasterError> {
    let alphas = raster.alphas()?;
    Ok(InputTensor::from_alphas(&alphas))
}
