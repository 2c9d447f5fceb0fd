//! Result types returned by [`crate::generate`].

use crate::error::CatalogueError;
use crate::pipeline::card::Card;
use crate::pipeline::layout::CataloguePage;
use crate::pipeline::package;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct CatalogueOutput {
    /// The PDF bytes, identical to what was written to [`Self::path`].
    pub pdf: Vec<u8>,
    /// Where the PDF was written inside the workspace.
    pub path: PathBuf,
    /// Cards placed in the catalogue, in page order.
    pub cards: Vec<Card>,
    /// The page layout the PDF was built from.
    pub pages: Vec<CataloguePage>,
    pub stats: RunStats,
}

impl CatalogueOutput {
    /// Write an extra copy of the PDF to `dest`.
    pub fn copy_to(&self, dest: impl AsRef<Path>) -> Result<(), CatalogueError> {
        package::write_atomic(dest.as_ref(), &self.pdf)
    }
}

/// Counts and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Product rows read from the data file.
    pub rows_loaded: usize,
    pub cards_rendered: usize,
    /// Rows left out because `<model>.jpg` was missing.
    pub rows_skipped: usize,
    /// Pages in the written PDF, including the blank page of an empty run.
    pub pages: usize,
    pub logo: bool,
    pub pdf_bytes: usize,
    pub total_duration_ms: u64,
    pub card_duration_ms: u64,
    pub compose_duration_ms: u64,
}
