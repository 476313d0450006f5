//! Raster export for the paint canvas.
//!
//! Snapshots are encoded as PNG and handed to a [`RasterStore`]. The default
//! store writes `drawing.png` into the user's pictures directory without
//! clobbering earlier exports.

pub mod file;
pub mod types;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use crate::draw::RasterSnapshot;

pub use file::FileRasterStore;
pub use types::{DEFAULT_FILE_NAME, ExportError, ExportRequest, PNG_MIME_TYPE};

/// Abstraction over where exported PNG bytes end up. Mocked in tests.
pub trait RasterStore: Send + Sync {
    fn store(&self, png_data: &[u8], request: &ExportRequest) -> Result<PathBuf, ExportError>;
}

/// Encodes `snapshot` as PNG and stores it.
///
/// Returns the location reported by the store.
pub fn export_raster(
    snapshot: &RasterSnapshot,
    store: &dyn RasterStore,
    request: &ExportRequest,
) -> Result<PathBuf, ExportError> {
    log::debug!(
        "Exporting {}x{} raster as {}",
        snapshot.width(),
        snapshot.height(),
        request.file_name
    );

    let png = snapshot.to_png()?;
    let path = store.store(&png, request)?;

    log::info!("Exported drawing to {}", path.display());
    Ok(path)
}
