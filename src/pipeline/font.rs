//! Font selection for card text.
//!
//! Cards are printed with a TrueType font at a fixed pixel size. The first
//! readable file wins: an explicitly configured font, then `arial.ttf` in the
//! working directory, then a short list of well-known system locations. When
//! none of them loads, DejaVu Sans compiled into the binary is used, so a run
//! never fails for lack of a font and `₹` always has a glyph.

use crate::error::CatalogueError;
use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Font files tried after the configured one, in order.
const FONT_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// DejaVu Sans (Bitstream Vera licence, see `assets/fonts/LICENSE-DejaVu.txt`).
static EMBEDDED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Where the card font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Embedded,
}

/// The font card text is drawn with.
#[derive(Clone)]
pub struct CardFont {
    font: FontArc,
    scale: PxScale,
    source: FontSource,
}

impl std::fmt::Debug for CardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardFont")
            .field("source", &self.source)
            .field("px", &self.scale.y)
            .finish()
    }
}

impl CardFont {
    /// Load the first usable font file, falling back to the embedded one.
    pub fn load(preferred: Option<&Path>, size_px: f32) -> Result<Self, CatalogueError> {
        let candidates = preferred
            .map(Path::to_path_buf)
            .into_iter()
            .chain(FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            match FontArc::try_from_vec(bytes) {
                Ok(font) => {
                    debug!("Card font: {} at {}px", path.display(), size_px);
                    return Ok(Self {
                        font,
                        scale: PxScale::from(size_px),
                        source: FontSource::File(path),
                    });
                }
                Err(e) => debug!("Skipping unusable font {}: {}", path.display(), e),
            }
        }

        debug!("No TrueType font file found; using embedded DejaVu Sans");
        Self::embedded(size_px)
    }

    /// The compiled-in DejaVu Sans at `size_px`.
    pub fn embedded(size_px: f32) -> Result<Self, CatalogueError> {
        let font = FontArc::try_from_slice(EMBEDDED_FONT)
            .map_err(|e| CatalogueError::FontFailed(format!("embedded DejaVu Sans: {e}")))?;
        Ok(Self {
            font,
            scale: PxScale::from(size_px),
            source: FontSource::Embedded,
        })
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    pub fn draw(&self, canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale, &self.font, text);
    }
}
