//! Workbook text format.
//!
//! ```text
//! # Cellbook Workbook
//! active: "Sheet1"
//! sheet: "Sheet1"
//! rows: 50
//! A1: 42
//! A2: "Hello"
//! A3: =A1 + A2
//! A1 @bold: true
//! ```

mod parser;
mod writer;

use cellbook_engine::engine::Grid;

pub use parser::{parse_workbook, parse_workbook_content};
pub use writer::{write_workbook, write_workbook_content};

/// A parsed workbook, before any formula is evaluated.
#[derive(Clone, Debug, Default)]
pub struct WorkbookData {
    pub active: Option<String>,
    pub sheets: Vec<SheetData>,
}

#[derive(Clone, Debug)]
pub struct SheetData {
    pub name: String,
    /// `None` when the file gives no row count.
    pub rows: Option<usize>,
    pub cells: Grid,
}

impl SheetData {
    pub fn new(name: String) -> Self {
        SheetData {
            name,
            rows: None,
            cells: Grid::new(),
        }
    }
}
