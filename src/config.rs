//! Configuration types for catalogue generation.
//!
//! Every knob lives in [`CatalogueConfig`], built via its
//! [`CatalogueConfigBuilder`]. The only choice the end user normally makes is
//! [`CardsPerRow`]; everything else has a default that reproduces the fixed
//! layout of the printed catalogue.

use crate::error::CatalogueError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// File name of the generated catalogue inside the output directory.
pub const DEFAULT_OUTPUT_NAME: &str = "Giordano_Catalogue.pdf";

/// Configuration for one catalogue run.
///
/// # Example
/// ```rust
/// use giordano_catalogue::{CardsPerRow, CatalogueConfig};
///
/// let config = CatalogueConfig::builder()
///     .cards_per_row(CardsPerRow::Three)
///     .workspace_root("/tmp/catalogue")
///     .build()
///     .unwrap();
/// assert_eq!(config.cards_per_row.count(), 3);
/// ```
#[derive(Clone)]
pub struct CatalogueConfig {
    /// Cards placed side by side in each of the two grid rows. Default: two.
    pub cards_per_row: CardsPerRow,

    /// Directory holding `uploads/` and `output/`. Default: current directory.
    ///
    /// The directories are reused across runs; a later run overwrites the
    /// cards and the PDF of an earlier one.
    pub workspace_root: PathBuf,

    /// File name of the PDF written into `output/`. Default: `Giordano_Catalogue.pdf`.
    pub output_name: String,

    /// TrueType font tried before the system font search list.
    pub font_path: Option<PathBuf>,

    /// Pixel size of the card text. Range: 8–96. Default: 24.
    ///
    /// Applies to whichever font is chosen, including the embedded fallback.
    pub font_size: f32,

    /// JPEG quality for card images. Range: 1–100. Default: 75.
    pub jpeg_quality: u8,

    /// Receives per-row events while the run progresses.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            cards_per_row: CardsPerRow::default(),
            workspace_root: PathBuf::from("."),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            font_path: None,
            font_size: 24.0,
            jpeg_quality: 75,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CatalogueConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogueConfig")
            .field("cards_per_row", &self.cards_per_row)
            .field("workspace_root", &self.workspace_root)
            .field("output_name", &self.output_name)
            .field("font_path", &self.font_path)
            .field("font_size", &self.font_size)
            .field("jpeg_quality", &self.jpeg_quality)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn CatalogueProgressCallback>"),
            )
            .finish()
    }
}

impl CatalogueConfig {
    /// Create a new builder for `CatalogueConfig`.
    pub fn builder() -> CatalogueConfigBuilder {
        CatalogueConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CatalogueConfig`].
#[derive(Debug)]
pub struct CatalogueConfigBuilder {
    config: CatalogueConfig,
}

impl CatalogueConfigBuilder {
    pub fn cards_per_row(mut self, n: CardsPerRow) -> Self {
        self.config.cards_per_row = n;
        self
    }

    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.workspace_root = root.into();
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = name.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = Some(path.into());
        self
    }

    pub fn font_size(mut self, px: f32) -> Self {
        self.config.font_size = px.clamp(8.0, 96.0);
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q.clamp(1, 100);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CatalogueConfig, CatalogueError> {
        let c = &self.config;
        let name = c.output_name.trim();
        if name.is_empty() {
            return Err(CatalogueError::InvalidConfig(
                "Output name must not be empty".into(),
            ));
        }
        if !name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(CatalogueError::InvalidConfig(format!(
                "Output name must end in .pdf, got '{}'",
                name
            )));
        }
        if name.contains(['/', '\\']) {
            return Err(CatalogueError::InvalidConfig(format!(
                "Output name must be a bare file name, got '{}'",
                name
            )));
        }
        if !c.font_size.is_finite() {
            return Err(CatalogueError::InvalidConfig(
                "Font size must be a finite number".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How many cards sit side by side in each grid row.
///
/// Every page holds two rows, so a page carries four or six cards. The
/// column offsets are fixed per choice so cards line up across pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardsPerRow {
    /// Two wide columns. (default)
    #[default]
    Two,
    /// Three narrow columns at 65 mm spacing. With 65 mm cards the columns
    /// touch edge to edge, leaving no gutter.
    Three,
}

impl CardsPerRow {
    /// Number of cards in one grid row.
    pub fn count(self) -> usize {
        match self {
            CardsPerRow::Two => 2,
            CardsPerRow::Three => 3,
        }
    }

    /// Cards per page: two rows of [`count`](Self::count).
    pub fn page_capacity(self) -> usize {
        self.count() * 2
    }

    /// Left edge of each column, in millimetres from the page's left edge.
    pub fn x_offsets_mm(self) -> &'static [f32] {
        match self {
            CardsPerRow::Two => &[10.0, 110.0],
            CardsPerRow::Three => &[10.0, 75.0, 140.0],
        }
    }
}

impl TryFrom<u8> for CardsPerRow {
    type Error = CatalogueError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            2 => Ok(CardsPerRow::Two),
            3 => Ok(CardsPerRow::Three),
            other => Err(CatalogueError::InvalidConfig(format!(
                "Cards per row must be 2 or 3, got {}",
                other
            ))),
        }
    }
}

impl fmt::Display for CardsPerRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}
