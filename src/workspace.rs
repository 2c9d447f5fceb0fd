//! On-disk layout shared by every run.
//!
//! ```text
//! <root>/
//!  ├─ uploads/images/      extracted product photos
//!  └─ output/
//!      ├─ cards/           one <model>.jpg per rendered card
//!      ├─ temp_logo.png    logo as embedded in the PDF
//!      └─ Giordano_Catalogue.pdf
//! ```
//!
//! The directories are created when missing and never cleaned up. Runs are
//! not isolated from each other: a second run overwrites the cards, logo and
//! PDF of the first.

use crate::error::CatalogueError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths of the working directories for one run.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create (if needed) the directory tree under `root`.
    pub fn prepare(root: impl Into<PathBuf>) -> Result<Self, CatalogueError> {
        let ws = Self { root: root.into() };
        for dir in [ws.images_dir(), ws.cards_dir()] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| CatalogueError::WorkspaceFailed { path: dir, source: e })?;
        }
        debug!("Workspace ready at {}", ws.root.display());
        Ok(ws)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    /// Where the image archive is unpacked.
    pub fn images_dir(&self) -> PathBuf {
        self.uploads_dir().join("images")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn cards_dir(&self) -> PathBuf {
        self.output_dir().join("cards")
    }

    pub fn logo_path(&self) -> PathBuf {
        self.output_dir().join("temp_logo.png")
    }

    pub fn catalogue_path(&self, output_name: &str) -> PathBuf {
        self.output_dir().join(output_name)
    }
}
