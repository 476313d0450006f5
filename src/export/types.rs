//! Data types for raster export.

use std::path::PathBuf;
use thiserror::Error;

use crate::draw::RasterError;

/// File name used when no template is configured.
pub const DEFAULT_FILE_NAME: &str = "drawing.png";

/// MIME type of every exported raster.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Where and under what name an exported raster should be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// File name including extension.
    pub file_name: String,
    /// MIME type advertised for the stored file.
    pub mime_type: String,
    /// Target directory.
    pub directory: PathBuf,
    /// Replace an existing file instead of picking a free name.
    pub overwrite: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            mime_type: PNG_MIME_TYPE.to_string(),
            directory: default_directory(),
            overwrite: false,
        }
    }
}

impl ExportRequest {
    /// Request whose file name is expanded from a chrono template.
    pub fn from_template(template: &str) -> Self {
        Self {
            file_name: super::file::generate_filename(template, "png"),
            ..Self::default()
        }
    }

    pub fn with_directory(mut self, directory: PathBuf) -> Self {
        self.directory = directory;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// The user's pictures directory, falling back to the home directory.
pub fn default_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Errors that can occur while exporting a raster.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode raster: {0}")]
    Encode(#[from] RasterError),

    #[error("Failed to save drawing: {0}")]
    SaveError(#[from] std::io::Error),

    #[error("Invalid file name '{0}'")]
    InvalidFileName(String),
}
