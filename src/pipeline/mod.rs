//! Pipeline stages for catalogue generation.
//!
//! Each submodule implements one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ assets ──▶ card ──▶ layout ──▶ compose ──▶ package
//! (rows)    (photos)   (JPEG)   (grid)     (lopdf)     (disk)
//! ```
//!
//! 1. [`input`]  : read product rows from CSV or a spreadsheet
//! 2. [`assets`] : unpack the photo archive and match `<model>.jpg`
//! 3. [`card`]   : draw the 500×500 card, using [`font`] for text and
//!    [`encode`] for the JPEG
//! 4. [`layout`] : pure grid maths, cards to page slots
//! 5. [`compose`]: build the PDF from cards, layout and logo
//! 6. [`package`]: write the PDF atomically

pub mod assets;
pub mod card;
pub mod compose;
pub mod encode;
pub mod font;
pub mod input;
pub mod layout;
pub mod package;
