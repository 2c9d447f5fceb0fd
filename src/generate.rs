//! The one-shot catalogue run.
//!
//! [`generate`] walks every stage in order and returns only after the PDF is
//! on disk. There is a single pass with no retries: a row without a photo is
//! skipped, and any other failure aborts the run before the PDF is written.

use crate::config::CatalogueConfig;
use crate::error::CatalogueError;
use crate::output::{CatalogueOutput, RunStats};
use crate::pipeline::{assets, card, compose, font::CardFont, input, layout, package};
use crate::workspace::Workspace;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Paths to the user-supplied files for one run.
#[derive(Debug, Clone)]
pub struct CatalogueInputs {
    /// Product table, CSV or spreadsheet.
    pub data: PathBuf,
    /// ZIP archive of `<model>.jpg` photos, or a directory holding them.
    pub images: PathBuf,
    /// Optional logo for the first page.
    pub logo: Option<PathBuf>,
}

impl CatalogueInputs {
    pub fn new(data: impl Into<PathBuf>, images: impl Into<PathBuf>) -> Self {
        Self {
            data: data.into(),
            images: images.into(),
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: impl Into<PathBuf>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// Build the catalogue PDF from `inputs`.
///
/// # Errors
/// Every error is fatal. Notably a non-numeric MRP or CSP on any row that
/// has a photo yields [`CatalogueError::InvalidPrice`] and no PDF is written.
pub fn generate(
    inputs: &CatalogueInputs,
    config: &CatalogueConfig,
) -> Result<CatalogueOutput, CatalogueError> {
    let total_start = Instant::now();
    info!(
        "Starting catalogue: data={} images={}",
        inputs.data.display(),
        inputs.images.display()
    );

    // ── Step 1: Workspace ────────────────────────────────────────────────
    let ws = Workspace::prepare(&config.workspace_root)?;

    // ── Step 2: Logo ─────────────────────────────────────────────────────
    let logo = inputs
        .logo
        .as_deref()
        .map(|src| compose::load_logo(src, &ws.logo_path()))
        .transpose()?;

    // ── Step 3: Photos ───────────────────────────────────────────────────
    let images_dir = assets::prepare_images(&inputs.images, &ws.images_dir())?;

    // ── Step 4: Product rows ─────────────────────────────────────────────
    let rows = input::load_products(&inputs.data)?;
    let total = rows.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 5: Cards ────────────────────────────────────────────────────
    let font = CardFont::load(config.font_path.as_deref(), config.font_size)?;
    let cards_dir = ws.cards_dir();
    let card_start = Instant::now();
    let mut cards = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for (i, row) in rows.iter().enumerate() {
        let Some(photo) = assets::resolve_image(&images_dir, &row.model) else {
            skipped += 1;
            if let Some(ref cb) = config.progress_callback {
                cb.on_row_skipped(i + 1, total, &row.model);
            }
            continue;
        };
        let rendered = card::render_card(row, &photo, &font, &cards_dir, config.jpeg_quality)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_card_rendered(i + 1, total, &rendered.model);
        }
        cards.push(rendered);
    }
    let card_duration_ms = card_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} cards ({} rows skipped) in {}ms",
        cards.len(),
        skipped,
        card_duration_ms
    );

    // ── Step 6: Layout and PDF ───────────────────────────────────────────
    let compose_start = Instant::now();
    let pages = layout::layout(cards.len(), config.cards_per_row, logo.is_some());
    let pdf = compose::compose_pdf(&cards, &pages, logo.as_ref())?;
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;
    let page_count = pages.len().max(1);
    debug!("Composed {} pages, {} bytes", page_count, pdf.len());

    // ── Step 7: Package ──────────────────────────────────────────────────
    let path = ws.catalogue_path(&config.output_name);
    package::write_atomic(&path, &pdf)?;

    let stats = RunStats {
        rows_loaded: total,
        cards_rendered: cards.len(),
        rows_skipped: skipped,
        pages: page_count,
        logo: pages.iter().any(|p| p.logo),
        pdf_bytes: pdf.len(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        card_duration_ms,
        compose_duration_ms,
    };

    info!(
        "Catalogue complete: {} cards on {} pages → {} ({}ms)",
        stats.cards_rendered,
        stats.pages,
        path.display(),
        stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(stats.cards_rendered, stats.pages);
    }

    Ok(CatalogueOutput {
        pdf,
        path,
        cards,
        pages,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CatalogueProgressCallback;
    use image::{Rgb, RgbImage};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl CatalogueProgressCallback for Recorder {
        fn on_run_start(&self, total_rows: usize) {
            self.events.lock().unwrap().push(format!("start {total_rows}"));
        }
        fn on_card_rendered(&self, index: usize, total: usize, model: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("card {index}/{total} {model}"));
        }
        fn on_row_skipped(&self, index: usize, total: usize, model: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("skip {index}/{total} {model}"));
        }
        fn on_run_complete(&self, cards: usize, pages: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done {cards} {pages}"));
        }
    }

    #[test]
    fn callbacks_follow_row_order() {
        let tmp = tempfile::tempdir().unwrap();
        let photos = tmp.path().join("photos");
        std::fs::create_dir_all(&photos).unwrap();
        for m in ["A", "C"] {
            RgbImage::from_pixel(20, 20, Rgb([1, 2, 3]))
                .save(photos.join(format!("{m}.jpg")))
                .unwrap();
        }
        let data = tmp.path().join("products.csv");
        std::fs::write(
            &data,
            "Model,EAN,MRP,Discount,CSP,Inventory,Remarks\n\
             A,1,100,,90,3,\n\
             B,2,100,,90,3,\n\
             C,3,100,,90,3,\n",
        )
        .unwrap();

        let recorder = Arc::new(Recorder::default());
        let config = CatalogueConfig::builder()
            .workspace_root(tmp.path().join("ws"))
            .progress_callback(recorder.clone())
            .build()
            .unwrap();

        let out = generate(&CatalogueInputs::new(&data, &photos), &config).unwrap();
        assert_eq!(out.stats.rows_loaded, 3);
        assert_eq!(out.stats.cards_rendered, 2);
        assert_eq!(out.stats.rows_skipped, 1);
        assert_eq!(out.stats.pages, 1);
        assert!(!out.stats.logo);
        assert_eq!(std::fs::read(&out.path).unwrap(), out.pdf);

        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec![
                "start 3".to_string(),
                "card 1/3 A".into(),
                "skip 2/3 B".into(),
                "card 3/3 C".into(),
                "done 2 1".into(),
            ]
        );
    }

    #[test]
    fn missing_data_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let config = CatalogueConfig::builder()
            .workspace_root(tmp.path())
            .build()
            .unwrap();
        let err = generate(
            &CatalogueInputs::new(tmp.path().join("none.csv"), tmp.path()),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogueError::InputNotFound { .. }));
    }
}
