//! Image encoding for the two places images leave memory.
//!
//! * Cards are written as baseline JPEG. The same bytes are later embedded
//!   verbatim in the PDF as `DCTDecode` streams, so the card on disk and the
//!   card in the catalogue are identical and nothing is re-encoded.
//! * The logo keeps its transparency: its colour and alpha planes are
//!   Flate-compressed separately so the PDF can use the alpha plane as a
//!   soft mask.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::io::Write;
use tracing::debug;

/// Encode a card as JPEG at the given quality (1–100).
pub fn encode_card(img: &RgbImage, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    debug!("Encoded card → {} bytes JPEG", buf.len());
    Ok(buf)
}

/// A logo split into PDF-ready compressed planes.
#[derive(Debug, Clone)]
pub struct LogoPlanes {
    pub width: u32,
    pub height: u32,
    /// Zlib-compressed 8-bit RGB samples.
    pub rgb: Vec<u8>,
    /// Zlib-compressed 8-bit alpha samples; `None` when fully opaque.
    pub alpha: Option<Vec<u8>>,
}

/// Split an RGBA logo into compressed colour and alpha planes.
pub fn encode_logo(img: &RgbaImage) -> std::io::Result<LogoPlanes> {
    let pixels = img.pixels().count();
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for p in img.pixels() {
        rgb.extend_from_slice(&p.0[..3]);
        alpha.push(p.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == u8::MAX);

    Ok(LogoPlanes {
        width: img.width(),
        height: img.height(),
        rgb: deflate(&rgb)?,
        alpha: if opaque { None } else { Some(deflate(&alpha)?) },
    })
}

/// Zlib-compress a buffer for a `FlateDecode` stream.
pub fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}
