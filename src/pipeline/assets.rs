//! Asset resolution: unpack the photo archive and find each row's photo.
//!
//! Photos are matched purely by name: the row for model `M100` uses
//! `M100.jpg` at the top level of the extracted archive. A row without a
//! photo is dropped from the catalogue without complaint; the run's stats
//! count it, nothing else does.

use crate::error::CatalogueError;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Make the product photos available as a directory.
///
/// A ZIP archive is extracted into `extract_to`, overwriting files left by
/// earlier runs. A directory is used in place.
pub fn prepare_images(images: &Path, extract_to: &Path) -> Result<PathBuf, CatalogueError> {
    if images.is_dir() {
        debug!("Using image directory {} in place", images.display());
        return Ok(images.to_path_buf());
    }
    if !images.is_file() {
        return Err(CatalogueError::InputNotFound {
            path: images.to_path_buf(),
        });
    }
    extract_archive(images, extract_to)?;
    Ok(extract_to.to_path_buf())
}

/// Unpack every entry of the ZIP at `archive` into `dest`.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<usize, CatalogueError> {
    let failed = |detail: String| CatalogueError::ArchiveFailed {
        path: archive.to_path_buf(),
        detail,
    };

    let file = std::fs::File::open(archive).map_err(|e| failed(e.to_string()))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| failed(e.to_string()))?;
    let entries = zip.len();
    zip.extract(dest).map_err(|e| failed(e.to_string()))?;

    info!(
        "Extracted {} entries from {} into {}",
        entries,
        archive.display(),
        dest.display()
    );
    Ok(entries)
}

/// Expected photo location for a model identifier.
pub fn image_path_for(images_dir: &Path, model: &str) -> PathBuf {
    images_dir.join(format!("{model}.jpg"))
}

/// The row's photo, if it exists.
pub fn resolve_image(images_dir: &Path, model: &str) -> Option<PathBuf> {
    let path = image_path_for(images_dir, model);
    if path.is_file() {
        Some(path)
    } else {
        debug!("No photo for model '{}' at {}", model, path.display());
        None
    }
}
