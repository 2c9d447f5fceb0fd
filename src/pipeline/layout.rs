//! Page layout: where each card goes, in millimetres on A4.
//!
//! The grid is fixed. Every page has two rows, at 30 mm and 155 mm from the
//! top edge. The columns come from [`CardsPerRow::x_offsets_mm`]. Cards are
//! 65 mm wide and fill the grid row by row, left to right, in input order.
//! The logo appears once, centred near the top of the first page.

use crate::config::CardsPerRow;
use serde::{Deserialize, Serialize};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Top edge of each grid row.
pub const ROW_Y_MM: [f32; 2] = [30.0, 155.0];
/// Printed width of every card.
pub const CARD_WIDTH_MM: f32 = 65.0;

pub const LOGO_X_MM: f32 = 75.0;
pub const LOGO_Y_MM: f32 = 5.0;
pub const LOGO_WIDTH_MM: f32 = 60.0;

/// One card's slot on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index into the rendered card list.
    pub card: usize,
    /// Left edge, from the page's left.
    pub x_mm: f32,
    /// Top edge, from the page's top.
    pub y_mm: f32,
}

/// A laid-out catalogue page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CataloguePage {
    pub index: usize,
    pub placements: Vec<Placement>,
    /// Whether the logo is drawn on this page. Only page 0 ever has it.
    pub logo: bool,
}

/// Lay `card_count` cards out over as many pages as they need.
///
/// Zero cards give zero pages. `with_logo` marks the first page only.
pub fn layout(card_count: usize, cards_per_row: CardsPerRow, with_logo: bool) -> Vec<CataloguePage> {
    let per_row = cards_per_row.count();
    let capacity = cards_per_row.page_capacity();
    let xs = cards_per_row.x_offsets_mm();

    (0..card_count)
        .step_by(capacity)
        .enumerate()
        .map(|(index, first)| {
            let last = (first + capacity).min(card_count);
            let placements = (first..last)
                .map(|card| {
                    let slot = card - first;
                    Placement {
                        card,
                        x_mm: xs[slot % per_row],
                        y_mm: ROW_Y_MM[slot / per_row],
                    }
                })
                .collect();
            CataloguePage {
                index,
                placements,
                logo: with_logo && index == 0,
            }
        })
        .collect()
}
