//! Input loading: read the product file into [`ProductRow`]s.
//!
//! Two layouts are accepted, chosen by file name:
//!
//! * **CSV** (`*.csv`): a header row, columns looked up by name.
//! * **Spreadsheet** (anything else; xlsx/xls/ods auto-detected by
//!   calamine): the merchandising export: a six-row banner, then nine
//!   unnamed columns in a fixed order.
//!
//! Nothing is validated here beyond what parsing requires. Prices stay as
//! [`Cell`]s and are coerced when the card text is built, so a typo in one
//! price aborts the run with the product named in the error.

use crate::error::CatalogueError;
use crate::product::{Cell, ProductRow};
use calamine::{open_workbook_auto, Data, Reader};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows above the column data in the merchandising spreadsheet export.
pub const BANNER_ROWS: usize = 6;

/// Positional column names of the spreadsheet layout.
pub const SPREADSHEET_COLUMNS: [&str; 9] = [
    "S.No", "Model", "EAN", "MRP", "Gender", "Discount", "CSP", "Inventory", "Remarks",
];

/// Which parser a product file goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Spreadsheet,
}

impl DataFormat {
    /// Pick the parser from the file name; only `.csv` is treated as text.
    pub fn detect(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            DataFormat::Csv
        } else {
            DataFormat::Spreadsheet
        }
    }
}

/// Load every product row from `path`, in file order.
pub fn load_products(path: &Path) -> Result<Vec<ProductRow>, CatalogueError> {
    let path = resolve_local(path)?;
    let format = DataFormat::detect(&path);
    debug!("Loading products from {} as {:?}", path.display(), format);

    let rows = match format {
        DataFormat::Csv => {
            let file = std::fs::File::open(&path).map_err(|e| CatalogueError::CsvParse {
                path: path.clone(),
                detail: e.to_string(),
            })?;
            parse_csv(file, &path)?
        }
        DataFormat::Spreadsheet => load_spreadsheet(&path)?,
    };

    info!("Loaded {} product rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Check the input exists before handing it to a parser, so a typo in the
/// path reads as "not found" rather than a parse failure.
fn resolve_local(path: &Path) -> Result<PathBuf, CatalogueError> {
    if !path.is_file() {
        return Err(CatalogueError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(path.to_path_buf())
}

// ── CSV ──────────────────────────────────────────────────────────────────

/// Header positions for the CSV layout.
struct CsvColumns {
    model: usize,
    ean: Option<usize>,
    mrp: usize,
    discount: Option<usize>,
    csp: usize,
    inventory: usize,
    remarks: usize,
}

impl CsvColumns {
    fn from_headers(headers: &csv::StringRecord, path: &Path) -> Result<Self, CatalogueError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| CatalogueError::MissingColumn {
                path: path.to_path_buf(),
                column: name.to_string(),
            })
        };

        Ok(Self {
            model: require("Model")?,
            ean: find("EAN"),
            mrp: require("MRP")?,
            discount: find("Discount"),
            csp: require("CSP")?,
            inventory: require("Inventory")?,
            remarks: require("Remarks")?,
        })
    }
}

/// Parse comma-delimited product data with a header row.
///
/// `path` is only used in error messages.
pub fn parse_csv<R: io::Read>(reader: R, path: &Path) -> Result<Vec<ProductRow>, CatalogueError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| CatalogueError::CsvParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?
        .clone();
    let columns = CsvColumns::from_headers(&headers, path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CatalogueError::CsvParse {
            path: path.to_path_buf(),
            detail: format!("record {}: {}", index + 1, e),
        })?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let text = |idx: usize| record.get(idx).unwrap_or("");
        let opt_text = |idx: Option<usize>| idx.map(text).unwrap_or("");

        rows.push(ProductRow {
            model: text(columns.model).trim().to_string(),
            ean: opt_text(columns.ean).trim().to_string(),
            mrp: Cell::from_text(text(columns.mrp)),
            discount: Cell::from_text(opt_text(columns.discount)),
            csp: Cell::from_text(text(columns.csp)),
            inventory: Cell::from_text(text(columns.inventory)),
            remarks: text(columns.remarks).trim().to_string(),
        });
    }

    Ok(rows)
}

// ── Spreadsheet ──────────────────────────────────────────────────────────

fn load_spreadsheet(path: &Path) -> Result<Vec<ProductRow>, CatalogueError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| CatalogueError::Spreadsheet {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CatalogueError::EmptyWorkbook {
            path: path.to_path_buf(),
        })?
        .map_err(|e| CatalogueError::Spreadsheet {
            path: path.to_path_buf(),
            detail: format!("failed to read first worksheet: {e}"),
        })?;

    // calamine trims leading empty rows and columns from the used range;
    // put them back so the banner and column positions stay absolute.
    let (first_row, first_col) = range
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let grid: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; first_col];
            cells.extend(row.iter().map(cell_from_data));
            cells
        })
        .collect();

    Ok(rows_from_grid(first_row, &grid))
}

fn cell_from_data(d: &Data) -> Cell {
    match d {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(if *b { "TRUE" } else { "FALSE" }.into()),
        other => Cell::Text(other.to_string()),
    }
}

/// Turn a cell grid into product rows using the fixed spreadsheet layout.
///
/// `first_row` is the absolute index of `grid[0]`; rows above
/// [`BANNER_ROWS`] are dropped, as are rows with every cell blank. Columns
/// map positionally onto [`SPREADSHEET_COLUMNS`]; short rows read as empty
/// and extra cells are ignored.
pub fn rows_from_grid(first_row: usize, grid: &[Vec<Cell>]) -> Vec<ProductRow> {
    let skip = BANNER_ROWS.saturating_sub(first_row);

    grid.iter()
        .skip(skip)
        .filter(|cells| !cells.iter().all(Cell::is_empty))
        .map(|cells| {
            let at = |i: usize| cells.get(i).cloned().unwrap_or_default();
            ProductRow {
                model: at(1).to_string().trim().to_string(),
                ean: at(2).to_string().trim().to_string(),
                mrp: at(3),
                discount: at(5),
                csp: at(6),
                inventory: at(7),
                remarks: at(8).to_string().trim().to_string(),
            }
        })
        .collect()
}
