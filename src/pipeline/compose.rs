//! PDF composition: place rendered cards on A4 pages with lopdf.
//!
//! The document is built object by object:
//!
//! * Every card JPEG goes into its own image XObject (`/Filter /DCTDecode`)
//!   exactly as it sits on disk.
//! * Each page gets a Flate-compressed content stream of `q cm Do Q` blocks
//!   and its own `/XObject` resources.
//! * The logo, when present, is one shared image XObject with an optional
//!   soft mask, drawn only from the first page.
//!
//! No creation date or document ID is written, so the same cards and logo
//! always serialise to the same bytes.

use crate::error::CatalogueError;
use crate::pipeline::card::Card;
use crate::pipeline::encode::{self, LogoPlanes};
use crate::pipeline::layout::{
    CataloguePage, CARD_WIDTH_MM, LOGO_WIDTH_MM, LOGO_X_MM, LOGO_Y_MM, PAGE_HEIGHT_MM,
    PAGE_WIDTH_MM,
};
use image::ImageFormat;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;
use tracing::debug;

/// PostScript points per millimetre.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

const LOGO_NAME: &str = "Logo";

/// Assemble the catalogue PDF and return its bytes.
///
/// `pages` must come from [`crate::pipeline::layout::layout`] over the same
/// `cards`. An empty `pages` yields a single blank page.
pub fn compose_pdf(
    cards: &[Card],
    pages: &[CataloguePage],
    logo: Option<&LogoPlanes>,
) -> Result<Vec<u8>, CatalogueError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let logo_id = match logo {
        Some(planes) if pages.iter().any(|p| p.logo) => Some(add_logo(&mut doc, planes)),
        _ => None,
    };

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len().max(1));
    for page in pages {
        let mut xobjects = Dictionary::new();
        let mut ops = Vec::new();

        if let (true, Some(id)) = (page.logo, logo_id) {
            if let Some(planes) = logo {
                let height_mm = LOGO_WIDTH_MM * planes.height as f32 / planes.width as f32;
                draw_image(&mut ops, LOGO_NAME, LOGO_X_MM, LOGO_Y_MM, LOGO_WIDTH_MM, height_mm);
                xobjects.set(LOGO_NAME, id);
            }
        }

        for placement in &page.placements {
            let card = cards.get(placement.card).ok_or_else(|| {
                CatalogueError::PdfBuildFailed(format!(
                    "page {} refers to card {} but only {} cards exist",
                    page.index + 1,
                    placement.card,
                    cards.len()
                ))
            })?;
            let name = format!("Im{}", placement.card);
            let image_id = add_card(&mut doc, card)?;
            let height_mm = CARD_WIDTH_MM * card.height as f32 / card.width as f32;
            draw_image(&mut ops, &name, placement.x_mm, placement.y_mm, CARD_WIDTH_MM, height_mm);
            xobjects.set(name, image_id);
        }

        let resources = dictionary! { "XObject" => xobjects };
        page_ids.push(add_page(&mut doc, pages_id, ops, resources)?);
        debug!(
            "Composed page {} with {} cards",
            page.index + 1,
            page.placements.len()
        );
    }

    if page_ids.is_empty() {
        page_ids.push(add_page(&mut doc, pages_id, Vec::new(), Dictionary::new())?);
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::from(*id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| CatalogueError::PdfBuildFailed(format!("serialising PDF: {e}")))?;
    Ok(bytes)
}

/// Decode the logo, save a PNG copy to `save_as` and split it for embedding.
pub fn load_logo(src: &Path, save_as: &Path) -> Result<LogoPlanes, CatalogueError> {
    let failed = |detail: String| CatalogueError::LogoFailed {
        path: src.to_path_buf(),
        detail,
    };
    if !src.is_file() {
        return Err(CatalogueError::InputNotFound {
            path: src.to_path_buf(),
        });
    }

    let rgba = image::open(src).map_err(|e| failed(e.to_string()))?.to_rgba8();
    rgba.save_with_format(save_as, ImageFormat::Png)
        .map_err(|e| failed(format!("saving {}: {}", save_as.display(), e)))?;
    debug!(
        "Logo {}x{} saved to {}",
        rgba.width(),
        rgba.height(),
        save_as.display()
    );

    encode::encode_logo(&rgba).map_err(|e| failed(e.to_string()))
}

/// Emit a `q w 0 0 h x y cm /name Do Q` block for a top-left mm box.
fn draw_image(ops: &mut Vec<Operation>, name: &str, x_mm: f32, y_mm: f32, w_mm: f32, h_mm: f32) {
    let w = w_mm * PT_PER_MM;
    let h = h_mm * PT_PER_MM;
    let x = x_mm * PT_PER_MM;
    let y = (PAGE_HEIGHT_MM - y_mm - h_mm) * PT_PER_MM;

    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![w.into(), 0.0f32.into(), 0.0f32.into(), h.into(), x.into(), y.into()],
    ));
    ops.push(Operation::new("Do", vec![name.into()]));
    ops.push(Operation::new("Q", vec![]));
}

fn add_card(doc: &mut Document, card: &Card) -> Result<ObjectId, CatalogueError> {
    let jpeg = std::fs::read(&card.path).map_err(|e| {
        CatalogueError::PdfBuildFailed(format!("reading card {}: {}", card.path.display(), e))
    })?;
    Ok(doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => card.width as i64,
            "Height" => card.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    )))
}

fn add_logo(doc: &mut Document, planes: &LogoPlanes) -> ObjectId {
    let mut dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => planes.width as i64,
        "Height" => planes.height as i64,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };
    if let Some(alpha) = &planes.alpha {
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => planes.width as i64,
                "Height" => planes.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            alpha.clone(),
        ));
        dict.set("SMask", mask_id);
    }
    doc.add_object(Stream::new(dict, planes.rgb.clone()))
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    ops: Vec<Operation>,
    resources: Dictionary,
) -> Result<ObjectId, CatalogueError> {
    let raw = Content { operations: ops }.encode()?;
    let compressed = encode::deflate(&raw)
        .map_err(|e| CatalogueError::PdfBuildFailed(format!("compressing page content: {e}")))?;
    let content_id = doc.add_object(Stream::new(
        dictionary! { "Filter" => "FlateDecode" },
        compressed,
    ));

    let media_box: Vec<Object> = vec![
        0.0f32.into(),
        0.0f32.into(),
        (PAGE_WIDTH_MM * PT_PER_MM).into(),
        (PAGE_HEIGHT_MM * PT_PER_MM).into(),
    ];
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => media_box,
        "Contents" => content_id,
        "Resources" => resources,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardsPerRow;
    use crate::pipeline::layout::layout;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn make_cards(dir: &Path, n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| {
                let img = RgbImage::from_pixel(50, 50, Rgb([i as u8 * 20, 0, 0]));
                let path = dir.join(format!("C{i}.jpg"));
                std::fs::write(&path, encode::encode_card(&img, 75).unwrap()).unwrap();
                Card {
                    model: format!("C{i}"),
                    path,
                    width: 50,
                    height: 50,
                }
            })
            .collect()
    }

    fn xobject_names(doc: &Document, page_id: ObjectId) -> Vec<String> {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        match resources.get(b"XObject") {
            Ok(obj) => obj
                .as_dict()
                .unwrap()
                .iter()
                .map(|(k, _)| String::from_utf8_lossy(k).into_owned())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn pages_follow_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let cards = make_cards(tmp.path(), 5);
        let pages = layout(cards.len(), CardsPerRow::Two, false);

        let bytes = compose_pdf(&cards, &pages, None).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));

        let doc = Document::load_mem(&bytes).unwrap();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(page_ids.len(), 2);
        assert_eq!(xobject_names(&doc, page_ids[0]).len(), 4);
        assert_eq!(xobject_names(&doc, page_ids[1]), vec!["Im4"]);
    }

    #[test]
    fn logo_lands_on_first_page_only() {
        let tmp = tempfile::tempdir().unwrap();
        let cards = make_cards(tmp.path(), 7);
        let pages = layout(cards.len(), CardsPerRow::Three, true);
        let mut logo = RgbaImage::from_pixel(40, 10, Rgba([0, 0, 255, 255]));
        logo.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        let planes = encode::encode_logo(&logo).unwrap();

        let bytes = compose_pdf(&cards, &pages, Some(&planes)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(page_ids.len(), 2);

        let first = xobject_names(&doc, page_ids[0]);
        assert!(first.contains(&"Logo".to_string()));
        assert_eq!(first.len(), 7);
        let second = xobject_names(&doc, page_ids[1]);
        assert_eq!(second, vec!["Im6"]);
    }

    /// `(xobject name, [a b c d e f])` for every `cm ... Do` pair on the page.
    fn placements_in_points(doc: &Document, page_id: ObjectId) -> Vec<(String, [f32; 6])> {
        let content = doc.get_and_decode_page_content(page_id).unwrap();
        let mut out = Vec::new();
        let mut matrix = None;
        for op in &content.operations {
            match op.operator.as_str() {
                "cm" => {
                    let m: Vec<f32> = op.operands.iter().map(|o| o.as_float().unwrap()).collect();
                    matrix = Some([m[0], m[1], m[2], m[3], m[4], m[5]]);
                }
                "Do" => {
                    let name = String::from_utf8_lossy(op.operands[0].as_name().unwrap()).into_owned();
                    out.push((name, matrix.take().unwrap()));
                }
                _ => {}
            }
        }
        out
    }

    fn assert_box(m: [f32; 6], x_mm: f32, top_mm: f32, w_mm: f32, h_mm: f32) {
        let mm = |pt: f32| pt * 25.4 / 72.0;
        let close = |a: f32, b: f32| (a - b).abs() < 0.05;
        assert!(close(mm(m[0]), w_mm), "width {} mm, want {w_mm}", mm(m[0]));
        assert_eq!((m[1], m[2]), (0.0, 0.0));
        assert!(close(mm(m[3]), h_mm), "height {} mm, want {h_mm}", mm(m[3]));
        assert!(close(mm(m[4]), x_mm), "x {} mm, want {x_mm}", mm(m[4]));
        // PDF y is the bottom edge measured from the page bottom.
        let top = 297.0 - mm(m[5]) - mm(m[3]);
        assert!(close(top, top_mm), "top {top} mm, want {top_mm}");
    }

    #[test]
    fn cards_and_logo_land_at_grid_coordinates() {
        let tmp = tempfile::tempdir().unwrap();
        let cards = make_cards(tmp.path(), 6);
        let pages = layout(cards.len(), CardsPerRow::Three, true);
        let planes = encode::encode_logo(&RgbaImage::from_pixel(40, 10, Rgba([0, 0, 255, 255]))).unwrap();

        let bytes = compose_pdf(&cards, &pages, Some(&planes)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = page_ids_of(&doc)[0];

        let media_box = doc
            .get_object(page_id)
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect::<Vec<_>>();
        assert!((media_box[2] - 595.28).abs() < 0.01);
        assert!((media_box[3] - 841.89).abs() < 0.01);

        let placed = placements_in_points(&doc, page_id);
        assert_eq!(placed.len(), 7);

        // 40×10 logo at 60 mm wide is 15 mm tall.
        assert_eq!(placed[0].0, "Logo");
        assert_box(placed[0].1, 75.0, 5.0, 60.0, 15.0);

        let expected = [
            (10.0, 30.0),
            (75.0, 30.0),
            (140.0, 30.0),
            (10.0, 155.0),
            (75.0, 155.0),
            (140.0, 155.0),
        ];
        for (i, ((name, m), (x, top))) in placed[1..].iter().zip(expected).enumerate() {
            assert_eq!(name, &format!("Im{i}"));
            assert_box(*m, x, top, 65.0, 65.0);
        }
    }

    #[test]
    fn two_per_row_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let cards = make_cards(tmp.path(), 4);
        let pages = layout(cards.len(), CardsPerRow::Two, false);

        let bytes = compose_pdf(&cards, &pages, None).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let placed = placements_in_points(&doc, page_ids_of(&doc)[0]);

        let expected = [(10.0, 30.0), (110.0, 30.0), (10.0, 155.0), (110.0, 155.0)];
        assert_eq!(placed.len(), 4);
        for ((_, m), (x, top)) in placed.iter().zip(expected) {
            assert_box(*m, x, top, 65.0, 65.0);
        }
    }

    fn page_ids_of(doc: &Document) -> Vec<ObjectId> {
        doc.get_pages().into_values().collect()
    }

    #[test]
    fn no_cards_gives_one_blank_page_without_logo() {
        let planes = encode::encode_logo(&RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]))).unwrap();
        let pages = layout(0, CardsPerRow::Two, true);

        let bytes = compose_pdf(&[], &pages, Some(&planes)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(page_ids.len(), 1);
        assert!(xobject_names(&doc, page_ids[0]).is_empty());
    }

    #[test]
    fn same_input_same_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let cards = make_cards(tmp.path(), 3);
        let pages = layout(cards.len(), CardsPerRow::Two, false);
        assert_eq!(
            compose_pdf(&cards, &pages, None).unwrap(),
            compose_pdf(&cards, &pages, None).unwrap()
        );
    }

    #[test]
    fn load_logo_saves_png_copy() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("logo.jpg");
        RgbImage::from_pixel(30, 12, Rgb([0, 90, 0])).save(&src).unwrap();
        let saved = tmp.path().join("temp_logo.png");

        let planes = load_logo(&src, &saved).unwrap();
        assert_eq!((planes.width, planes.height), (30, 12));
        assert!(planes.alpha.is_none());
        assert_eq!(image::image_dimensions(&saved).unwrap(), (30, 12));
    }

    #[test]
    fn load_logo_rejects_garbage() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("logo.png");
        std::fs::write(&src, b"nope").unwrap();
        assert!(matches!(
            load_logo(&src, &tmp.path().join("out.png")),
            Err(CatalogueError::LogoFailed { .. })
        ));
        assert!(matches!(
            load_logo(&tmp.path().join("missing.png"), &tmp.path().join("out.png")),
            Err(CatalogueError::InputNotFound { .. })
        ));
    }

    #[test]
    fn placement_past_card_list_is_an_error() {
        let pages = layout(2, CardsPerRow::Two, false);
        assert!(matches!(
            compose_pdf(&[], &pages, None),
            Err(CatalogueError::PdfBuildFailed(_))
        ));
    }
}
