//! Output packaging: put the finished PDF on disk.

use crate::error::CatalogueError;
use std::path::Path;
use tracing::debug;

/// Write `bytes` to `path`, replacing whatever was there.
///
/// Uses atomic write (temp file + rename) so a reader never sees a
/// half-written catalogue.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CatalogueError> {
    let io_err = |e| CatalogueError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    std::fs::write(&tmp_path, bytes).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
