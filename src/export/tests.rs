use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use tempfile::TempDir;

use super::{ExportError, ExportRequest, FileRasterStore, RasterStore, export_raster};
use crate::draw::{BLUE, DrawingSurface, RED, StrokeStyle, WHITE};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

#[derive(Clone, Default)]
struct MockStore {
    should_fail: bool,
    stored: Arc<Mutex<Vec<(Vec<u8>, ExportRequest)>>>,
}

impl RasterStore for MockStore {
    fn store(&self, png_data: &[u8], request: &ExportRequest) -> Result<PathBuf, ExportError> {
        if self.should_fail {
            return Err(ExportError::SaveError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.stored
            .lock()
            .unwrap()
            .push((png_data.to_vec(), request.clone()));
        Ok(request.directory.join(&request.file_name))
    }
}

fn sketched_surface() -> DrawingSurface {
    let mut surface = DrawingSurface::new(32, 24, WHITE).unwrap();
    surface.begin_stroke((2.0, 2.0), StrokeStyle::new(RED, 4.0));
    surface.extend_stroke((20.0, 12.0));
    surface.end_stroke();
    surface.begin_stroke((4.0, 20.0), StrokeStyle::new(BLUE, 2.0));
    surface.extend_stroke((28.0, 20.0));
    surface.end_stroke();
    surface
}

#[test]
fn default_request_targets_drawing_png() {
    let request = ExportRequest::default();
    assert_eq!(request.file_name, "drawing.png");
    assert_eq!(request.mime_type, "image/png");
    assert!(!request.overwrite);
}

#[test]
fn export_hands_png_bytes_to_store() {
    let surface = sketched_surface();
    let store = MockStore::default();
    let request = ExportRequest::default().with_directory(PathBuf::from("/virtual"));

    let snapshot = surface.export_raster().unwrap();
    let path = export_raster(&snapshot, &store, &request).unwrap();

    assert_eq!(path, PathBuf::from("/virtual/drawing.png"));
    let stored = store.stored.lock().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(&stored[0].0[..8], &PNG_SIGNATURE);
    assert_eq!(stored[0].1, request);
}

#[test]
fn store_failure_is_returned() {
    let surface = sketched_surface();
    let store = MockStore {
        should_fail: true,
        ..MockStore::default()
    };

    let snapshot = surface.export_raster().unwrap();
    let result = export_raster(&snapshot, &store, &ExportRequest::default());
    assert!(matches!(result, Err(ExportError::SaveError(_))));
    assert_eq!(surface.history().len(), 2);
}

#[test]
fn file_store_writes_decodable_png() {
    let temp = TempDir::new().unwrap();
    let surface = sketched_surface();
    let request = ExportRequest::default().with_directory(temp.path().to_path_buf());

    let snapshot = surface.export_raster().unwrap();
    let path = export_raster(&snapshot, &FileRasterStore, &request).unwrap();

    let mut file = std::fs::File::open(&path).unwrap();
    let decoded = cairo::ImageSurface::create_from_png(&mut file).unwrap();
    assert_eq!(decoded.width(), 32);
    assert_eq!(decoded.height(), 24);
}
