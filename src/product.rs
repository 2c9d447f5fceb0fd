//! Product rows as read from the spreadsheet.
//!
//! Spreadsheet data is loosely typed: a price column may hold numbers, text
//! or nothing at all depending on who filled it in. [`Cell`] keeps whatever
//! was there and only coerces when the card text needs an integer, so a bad
//! price surfaces as [`CatalogueError::InvalidPrice`] naming the product
//! instead of failing the whole load.

use crate::error::CatalogueError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw text value: blank → `Empty`, numeric → `Number`.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Coerce to a whole amount, truncating any fraction.
    ///
    /// Returns `None` for empty cells, text that does not parse as a number,
    /// and values outside the `i64` range (including infinities and NaN).
    pub fn as_integer(&self) -> Option<i64> {
        let n = match self {
            Cell::Empty => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        // `as` saturates, so out-of-range values must be rejected up front.
        if !n.is_finite() || n.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(n.trunc() as i64)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// A single product line of the catalogue.
///
/// Immutable once loaded. `model` is trimmed and doubles as the photo and
/// card file stem.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductRow {
    pub model: String,
    pub ean: String,
    pub mrp: Cell,
    pub discount: Cell,
    /// Offer price.
    pub csp: Cell,
    pub inventory: Cell,
    pub remarks: String,
}

impl ProductRow {
    /// MRP as a whole amount.
    pub fn mrp_amount(&self) -> Result<i64, CatalogueError> {
        self.price("MRP", &self.mrp)
    }

    /// Offer price as a whole amount.
    pub fn csp_amount(&self) -> Result<i64, CatalogueError> {
        self.price("CSP", &self.csp)
    }

    fn price(&self, field: &'static str, cell: &Cell) -> Result<i64, CatalogueError> {
        cell.as_integer().ok_or_else(|| CatalogueError::InvalidPrice {
            model: self.model.clone(),
            field,
            value: cell.to_string(),
        })
    }
}
