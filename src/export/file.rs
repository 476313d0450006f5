//! File saving for exported drawings.

use super::RasterStore;
use super::types::{ExportError, ExportRequest};
use chrono::Local;
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores exported drawings as files on the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileRasterStore;

impl RasterStore for FileRasterStore {
    fn store(&self, png_data: &[u8], request: &ExportRequest) -> Result<PathBuf, ExportError> {
        save_drawing(png_data, request)
    }
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
/// * `format` - File extension (e.g., "png")
///
/// A template chrono cannot format is used verbatim.
pub fn generate_filename(template: &str, format: &str) -> String {
    let now = Local::now();
    let mut filename = String::new();
    if write!(filename, "{}", now.format(template)).is_err() {
        log::warn!("Invalid filename template '{}', using it verbatim", template);
        filename = template.to_string();
    }
    format!("{}.{}", filename, format)
}

/// Ensure the save directory exists, creating it if necessary.
///
/// Returns the canonicalized path to the directory.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Picks the path a file should be written to.
///
/// With `overwrite` the plain name is used. Otherwise an existing
/// `drawing.png` yields `drawing (1).png`, then `drawing (2).png`, and so on.
pub fn unique_path(directory: &Path, file_name: &str, overwrite: bool) -> PathBuf {
    let candidate = directory.join(file_name);
    if overwrite || !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &extension {
            Some(ext) => directory.join(format!("{stem} ({n}).{ext}")),
            None => directory.join(format!("{stem} ({n})")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Save encoded image data as described by `request`.
///
/// Returns the path of the written file.
pub fn save_drawing(image_data: &[u8], request: &ExportRequest) -> Result<PathBuf, ExportError> {
    validate_file_name(&request.file_name)?;

    let directory = ensure_directory_exists(&request.directory)?;
    let file_path = unique_path(&directory, &request.file_name, request.overwrite);

    log::info!(
        "Saving drawing to: {} ({} bytes, {})",
        file_path.display(),
        image_data.len(),
        request.mime_type
    );

    fs::write(&file_path, image_data)?;

    let written_size = fs::metadata(&file_path)?.len();
    log::debug!("File written: {} bytes", written_size);

    Ok(file_path)
}

fn validate_file_name(file_name: &str) -> Result<(), ExportError> {
    let trimmed = file_name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains('/')
        || trimmed.contains('\\')
    {
        return Err(ExportError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request_in(dir: &Path) -> ExportRequest {
        ExportRequest::default().with_directory(dir.to_path_buf())
    }

    #[test]
    fn test_generate_filename() {
        let filename = generate_filename("drawing_%Y%m%d", "png");
        assert!(filename.starts_with("drawing_2"));
        assert!(filename.ends_with(".png"));
        assert_eq!(generate_filename("drawing", "png"), "drawing.png");
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/Pictures");
        assert!(!expanded.to_string_lossy().starts_with("~"));

        let no_tilde = expand_tilde("/absolute/path");
        assert_eq!(no_tilde, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn save_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");

        let path = save_drawing(b"png", &request_in(&nested)).unwrap();
        assert_eq!(path.file_name().unwrap(), "drawing.png");
        assert_eq!(fs::read(&path).unwrap(), b"png");
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let temp = TempDir::new().unwrap();
        let request = request_in(temp.path());

        let first = save_drawing(b"one", &request).unwrap();
        let second = save_drawing(b"two", &request).unwrap();
        let third = save_drawing(b"three", &request).unwrap();

        assert_eq!(first.file_name().unwrap(), "drawing.png");
        assert_eq!(second.file_name().unwrap(), "drawing (1).png");
        assert_eq!(third.file_name().unwrap(), "drawing (2).png");
        assert_eq!(fs::read(&first).unwrap(), b"one");
    }

    #[test]
    fn overwrite_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let request = request_in(temp.path()).with_overwrite(true);

        save_drawing(b"one", &request).unwrap();
        let path = save_drawing(b"two", &request).unwrap();

        assert_eq!(path.file_name().unwrap(), "drawing.png");
        assert_eq!(fs::read(&path).unwrap(), b"two");
    }

    #[test]
    fn rejects_path_like_file_names() {
        let temp = TempDir::new().unwrap();
        let mut request = request_in(temp.path());
        request.file_name = "../escape.png".to_string();

        assert!(matches!(
            save_drawing(b"png", &request),
            Err(ExportError::InvalidFileName(_))
        ));
    }
}
