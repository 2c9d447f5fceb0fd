//! Card rendering: product photo + white caption strip + three text lines.
//!
//! ```text
//!  0 ┌──────────────────────────┐
//!    │                          │
//!    │      photo, 500×500      │
//!    │                          │
//! 420├──────────────────────────┤
//!    │ Model: M100              │ 430
//!    │ MRP: ₹1999  Offer: ₹1499 │ 455
//!    │ Stock: 12  Bestseller    │ 480
//! 500└──────────────────────────┘
//! ```

use crate::error::CatalogueError;
use crate::pipeline::encode;
use crate::pipeline::font::CardFont;
use crate::product::ProductRow;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Card canvas edge in pixels.
pub const CARD_SIZE: u32 = 500;
/// Top edge of the caption strip.
pub const CAPTION_TOP: u32 = 420;
const TEXT_X: i32 = 10;
const LINE_Y: [i32; 3] = [430, 455, 480];

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A rendered card on disk, ready for the compositor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub model: String,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// The three caption lines for a product.
///
/// Fails when MRP or CSP is not a number.
pub fn card_lines(row: &ProductRow) -> Result<[String; 3], CatalogueError> {
    let mrp = row.mrp_amount()?;
    let csp = row.csp_amount()?;
    Ok([
        format!("Model: {}", row.model),
        format!("MRP: ₹{mrp}  Offer: ₹{csp}"),
        format!("Stock: {}  {}", row.inventory, row.remarks),
    ])
}

/// Compose the card image in memory.
pub fn compose_card(
    row: &ProductRow,
    photo_path: &Path,
    font: &CardFont,
) -> Result<RgbImage, CatalogueError> {
    // Prices first: a bad price must abort before any file is touched.
    let lines = card_lines(row)?;

    let photo = image::open(photo_path)
        .map_err(|e| CatalogueError::ImageLoadFailed {
            path: photo_path.to_path_buf(),
            source: e,
        })?
        .to_rgb8();
    let mut canvas =
        image::imageops::resize(&photo, CARD_SIZE, CARD_SIZE, FilterType::CatmullRom);

    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(0, CAPTION_TOP as i32).of_size(CARD_SIZE, CARD_SIZE - CAPTION_TOP),
        WHITE,
    );
    for (line, y) in lines.iter().zip(LINE_Y) {
        font.draw(&mut canvas, BLACK, TEXT_X, y, line);
    }

    Ok(canvas)
}

/// Render a card and write it to `cards_dir/<model>.jpg`, replacing any
/// earlier card for the same model.
pub fn render_card(
    row: &ProductRow,
    photo_path: &Path,
    font: &CardFont,
    cards_dir: &Path,
    jpeg_quality: u8,
) -> Result<Card, CatalogueError> {
    let canvas = compose_card(row, photo_path, font)?;
    let out_path = cards_dir.join(format!("{}.jpg", row.model));

    let bytes = encode::encode_card(&canvas, jpeg_quality).map_err(|e| {
        CatalogueError::CardWriteFailed {
            path: out_path.clone(),
            detail: e.to_string(),
        }
    })?;
    std::fs::write(&out_path, &bytes).map_err(|e| CatalogueError::CardWriteFailed {
        path: out_path.clone(),
        detail: e.to_string(),
    })?;

    debug!("Card {} → {} ({} bytes)", row.model, out_path.display(), bytes.len());

    Ok(Card {
        model: row.model.clone(),
        path: out_path,
        width: canvas.width(),
        height: canvas.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::Cell;

    fn row(model: &str, mrp: Cell, csp: Cell) -> ProductRow {
        ProductRow {
            model: model.into(),
            mrp,
            csp,
            inventory: Cell::Number(12.0),
            remarks: "Bestseller".into(),
            ..Default::default()
        }
    }

    fn write_photo(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(w, h, Rgb([200, 30, 30]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn caption_text() {
        let lines = card_lines(&row("M100", Cell::Number(1999.0), Cell::Number(1499.0))).unwrap();
        assert_eq!(lines[0], "Model: M100");
        assert_eq!(lines[1], "MRP: ₹1999  Offer: ₹1499");
        assert_eq!(lines[2], "Stock: 12  Bestseller");
    }

    #[test]
    fn caption_truncates_fractional_prices() {
        let lines = card_lines(&row(
            "M1",
            Cell::Number(1999.99),
            Cell::Text("1499.5".into()),
        ))
        .unwrap();
        assert_eq!(lines[1], "MRP: ₹1999  Offer: ₹1499");
    }

    #[test]
    fn caption_with_empty_stock_and_remarks() {
        let mut r = row("M1", Cell::Number(1.0), Cell::Number(1.0));
        r.inventory = Cell::Empty;
        r.remarks.clear();
        assert_eq!(card_lines(&r).unwrap()[2], "Stock:   ");
    }

    #[test]
    fn non_numeric_price_fails() {
        let err = card_lines(&row("M1", Cell::Number(10.0), Cell::Empty)).unwrap_err();
        assert!(matches!(err, CatalogueError::InvalidPrice { field: "CSP", .. }));
    }

    #[test]
    fn composed_card_is_square_with_white_strip() {
        let tmp = tempfile::tempdir().unwrap();
        let photo = write_photo(tmp.path(), "M1.png", 800, 300);

        let card = compose_card(
            &row("M1", Cell::Number(10.0), Cell::Number(5.0)),
            &photo,
            &CardFont::embedded(24.0).unwrap(),
        )
        .unwrap();

        assert_eq!(card.dimensions(), (CARD_SIZE, CARD_SIZE));
        // Right edge of the strip is beyond any text.
        assert_eq!(card.get_pixel(495, 421), &WHITE);
        assert_eq!(card.get_pixel(495, 499), &WHITE);
        // Photo shows above the strip.
        let px = card.get_pixel(250, 100).0;
        assert!(px[0] > 180 && px[1] < 60 && px[2] < 60, "got {px:?}");
        // Some text landed in the strip.
        let inked = (CAPTION_TOP..CARD_SIZE)
            .flat_map(|y| (0..CARD_SIZE).map(move |x| (x, y)))
            .filter(|&(x, y)| card.get_pixel(x, y).0[0] < 100)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn render_card_writes_jpeg_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let photo = write_photo(tmp.path(), "M1.jpg", 64, 64);
        let cards = tmp.path().join("cards");
        std::fs::create_dir_all(&cards).unwrap();
        std::fs::write(cards.join("M1.jpg"), b"stale").unwrap();

        let card = render_card(
            &row("M1", Cell::Number(10.0), Cell::Number(5.0)),
            &photo,
            &CardFont::embedded(24.0).unwrap(),
            &cards,
            75,
        )
        .unwrap();

        assert_eq!(card.path, cards.join("M1.jpg"));
        assert_eq!((card.width, card.height), (500, 500));
        let written = std::fs::read(&card.path).unwrap();
        assert_eq!(&written[..2], &[0xFF, 0xD8], "JPEG SOI marker");
        assert_eq!(image::image_dimensions(&card.path).unwrap(), (500, 500));
    }

    #[test]
    fn bad_price_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let photo = write_photo(tmp.path(), "M1.jpg", 16, 16);
        let cards = tmp.path().join("cards");
        std::fs::create_dir_all(&cards).unwrap();

        let result = render_card(
            &row("M1", Cell::Text("n/a".into()), Cell::Number(5.0)),
            &photo,
            &CardFont::embedded(24.0).unwrap(),
            &cards,
            75,
        );
        assert!(result.is_err());
        assert_eq!(std::fs::read_dir(&cards).unwrap().count(), 0);
    }

    #[test]
    fn undecodable_photo_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let photo = tmp.path().join("M1.jpg");
        std::fs::write(&photo, b"not an image").unwrap();
        let err = compose_card(
            &row("M1", Cell::Number(1.0), Cell::Number(1.0)),
            &photo,
            &CardFont::embedded(24.0).unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogueError::ImageLoadFailed { .. }));
    }
}
