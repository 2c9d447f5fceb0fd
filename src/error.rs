//! Error types for the catalogue generator.
//!
//! There is exactly one error type, [`CatalogueError`], and every variant is
//! fatal: the run is a single linear pass and any failure aborts it before
//! the PDF is written. The one soft failure in the pipeline, a product row
//! whose photo is missing, is not an error at all; the row is skipped and
//! only counted in [`crate::output::RunStats::rows_skipped`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the catalogue library.
#[derive(Debug, Error)]
pub enum CatalogueError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// A required input file or directory does not exist.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// The delimited product file could not be parsed.
    #[error("Failed to parse CSV '{path}': {detail}")]
    CsvParse { path: PathBuf, detail: String },

    /// The spreadsheet could not be opened or its first sheet read.
    #[error("Failed to read spreadsheet '{path}': {detail}")]
    Spreadsheet { path: PathBuf, detail: String },

    /// The spreadsheet has no worksheets.
    #[error("Spreadsheet '{path}' does not contain any worksheets")]
    EmptyWorkbook { path: PathBuf },

    /// A header the card text depends on is absent from the CSV.
    #[error("CSV '{path}' has no '{column}' column\nExpected headers: Model, EAN, MRP, Discount, CSP, Inventory, Remarks")]
    MissingColumn { path: PathBuf, column: String },

    /// The image archive is not a readable ZIP or could not be unpacked.
    #[error("Failed to extract image archive '{path}': {detail}")]
    ArchiveFailed { path: PathBuf, detail: String },

    // ── Card errors ───────────────────────────────────────────────────────
    /// A product photo exists but could not be decoded.
    #[error("Failed to load image '{path}': {source}")]
    ImageLoadFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// MRP or CSP could not be coerced to an integer amount.
    #[error("Product '{model}': {field} value {value:?} is not a number")]
    InvalidPrice {
        model: String,
        field: &'static str,
        value: String,
    },

    /// The composed card could not be written to the cards directory.
    #[error("Failed to write card '{path}': {detail}")]
    CardWriteFailed { path: PathBuf, detail: String },

    /// The compiled-in fallback font could not be parsed.
    #[error("Failed to load card font: {0}")]
    FontFailed(String),

    /// The logo could not be decoded or saved.
    #[error("Failed to prepare logo '{path}': {detail}")]
    LogoFailed { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// lopdf rejected the assembled document.
    #[error("Failed to build catalogue PDF: {0}")]
    PdfBuildFailed(String),

    /// Could not create or write the output PDF.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create one of the workspace directories.
    #[error("Failed to prepare workspace directory '{path}': {source}")]
    WorkspaceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<lopdf::Error> for CatalogueError {
    fn from(e: lopdf::Error) -> Self {
        CatalogueError::PdfBuildFailed(e.to_string())
    }
}
