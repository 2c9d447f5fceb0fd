//! # giordano-catalogue
//!
//! Turn a product table and a folder of product photos into a printable A4
//! catalogue PDF.
//!
//! Each product row becomes a 500×500 card: the photo, with a white strip
//! along the bottom carrying the model, MRP, offer price, stock and remarks.
//! The cards are laid out two or three to a row, two rows per page, with an
//! optional logo at the top of the first page.
//!
//! ## Pipeline Overview
//!
//! ```text
//! products.csv / .xlsx    images.zip    logo.png
//!        │                    │            │
//!        ├─ 1. Input   rows from CSV headers or the spreadsheet grid
//!        │                    ├─ 2. Assets  unzip, match <model>.jpg
//!        ├─ 3. Cards   resize photo, caption strip, JPEG to output/cards/
//!        ├─ 4. Layout  2×N grid per A4 page
//!        ├─ 5. Compose lopdf document, cards as DCTDecode images
//!        └─ 6. Package output/Giordano_Catalogue.pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use giordano_catalogue::{generate, CardsPerRow, CatalogueConfig, CatalogueInputs};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CatalogueConfig::builder()
//!         .cards_per_row(CardsPerRow::Two)
//!         .build()?;
//!     let inputs = CatalogueInputs::new("products.xlsx", "images.zip").with_logo("logo.png");
//!     let output = generate(&inputs, &config)?;
//!     eprintln!(
//!         "{} cards on {} pages → {}",
//!         output.stats.cards_rendered,
//!         output.stats.pages,
//!         output.path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `catalogue` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! giordano-catalogue = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod product;
pub mod progress;
pub mod workspace;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CardsPerRow, CatalogueConfig, CatalogueConfigBuilder, DEFAULT_OUTPUT_NAME};
pub use error::CatalogueError;
pub use generate::{generate, CatalogueInputs};
pub use output::{CatalogueOutput, RunStats};
pub use pipeline::card::{card_lines, Card};
pub use pipeline::layout::{layout, CataloguePage, Placement};
pub use product::{Cell, ProductRow};
pub use progress::{CatalogueProgressCallback, NoopProgressCallback, ProgressCallback};
pub use workspace::Workspace;
