//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the core data types for representing cells:
//! - [`CellContent`] - The raw content of a cell (empty, text, number, or formula)
//! - [`Cell`] - A cell with content, style, dependencies and its display value
//! - [`Grid`] - Sparse storage for cells

use std::collections::HashMap;

use super::cell_ref::CellRef;
use super::deps::extract_dependencies;
use super::eval::{CellValues, FormulaError};
use super::format::{format_number, parse_number};
use super::style::CellStyle;

/// Marker that turns cell input into a formula.
pub const FORMULA_MARKER: char = '=';

/// The raw content stored in a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    Text(String),
    /// A numeric literal; `text` is what was typed and is shown as is.
    Number { value: f64, text: String },
    /// Formula body without the leading `=`.
    Formula(String),
}

/// A cell in the spreadsheet grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub style: CellStyle,
    /// Cells the formula reads; empty for non-formula cells.
    pub depends_on: Vec<CellRef>,
    /// Last computed display value.
    pub value: String,
    /// Formula cells on the longest chain ending here, this one included.
    /// Settled by recalculation; 0 for literals and cycle members.
    pub chain_depth: usize,
}

impl Cell {
    pub fn new_empty() -> Cell {
        Cell {
            content: CellContent::Empty,
            style: CellStyle::default(),
            depends_on: vec![],
            value: String::new(),
            chain_depth: 0,
        }
    }

    pub fn new_text(text: &str) -> Cell {
        let mut cell = Cell::new_empty();
        cell.set_text(text);
        cell
    }

    pub fn new_number(n: f64) -> Cell {
        let mut cell = Cell::new_empty();
        cell.set_number(n, format_number(n));
        cell
    }

    /// Literal cell from typed text; see [`Cell::literal_content`].
    pub fn new_literal(input: &str) -> Cell {
        let mut cell = Cell::new_empty();
        cell.set_content(Cell::literal_content(input));
        cell
    }

    /// Create a new cell containing a formula body (without `=`).
    /// Dependencies are extracted from the formula; the value is computed later.
    pub fn new_formula(formula: &str) -> Cell {
        let mut cell = Cell::new_empty();
        cell.set_formula(formula);
        cell
    }

    /// Classify literal (non-formula) input: finite numbers become numbers,
    /// empty input clears, everything else is kept verbatim as text.
    /// Numbers keep the typed text, so `02139` stays `02139`.
    pub fn literal_content(input: &str) -> CellContent {
        if input.is_empty() {
            CellContent::Empty
        } else if let Ok(value) = input.parse::<f64>()
            && value.is_finite()
        {
            CellContent::Number {
                value,
                text: input.to_string(),
            }
        } else {
            CellContent::Text(input.to_string())
        }
    }

    /// Classify raw input: a leading `=` means formula.
    pub fn content_from_input(input: &str) -> CellContent {
        match input.strip_prefix(FORMULA_MARKER) {
            Some(formula) => CellContent::Formula(formula.to_string()),
            None => Cell::literal_content(input),
        }
    }

    /// Replace the content, keeping the style.
    pub fn set_content(&mut self, content: CellContent) {
        match content {
            CellContent::Empty => self.clear_content(),
            CellContent::Text(s) => self.set_text(&s),
            CellContent::Number { value, text } => self.set_number(value, text),
            CellContent::Formula(f) => self.set_formula(&f),
        }
    }

    /// Like [`Cell::set_content`], but a formula body longer than `max_len`
    /// bytes is stored without being parsed. It reads no cells and shows the
    /// too-long marker.
    pub fn set_content_bounded(&mut self, content: CellContent, max_len: usize) {
        match content {
            CellContent::Formula(f) if f.len() > max_len => {
                self.value = FormulaError::TooLong {
                    len: f.len(),
                    max: max_len,
                }
                .marker()
                .to_string();
                self.content = CellContent::Formula(f);
                self.depends_on.clear();
                self.chain_depth = 0;
            }
            content => self.set_content(content),
        }
    }

    /// True for a formula whose body exceeds `max_len` bytes.
    pub fn formula_too_long(&self, max_len: usize) -> bool {
        self.formula().is_some_and(|f| f.len() > max_len)
    }

    fn set_text(&mut self, text: &str) {
        self.content = CellContent::Text(text.to_string());
        self.depends_on.clear();
        self.value = text.to_string();
        self.chain_depth = 0;
    }

    fn set_number(&mut self, value: f64, text: String) {
        self.value = text.clone();
        self.content = CellContent::Number { value, text };
        self.depends_on.clear();
        self.chain_depth = 0;
    }

    fn set_formula(&mut self, formula: &str) {
        self.depends_on = extract_dependencies(formula);
        self.content = CellContent::Formula(formula.to_string());
        self.value.clear();
    }

    /// Reset content and value; the style survives.
    pub fn clear_content(&mut self) {
        self.content = CellContent::Empty;
        self.depends_on.clear();
        self.value.clear();
        self.chain_depth = 0;
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.content, CellContent::Formula(_))
    }

    pub fn formula(&self) -> Option<&str> {
        match &self.content {
            CellContent::Formula(f) => Some(f),
            _ => None,
        }
    }

    /// A cell with no content and no style carries no information.
    pub fn is_blank(&self) -> bool {
        matches!(self.content, CellContent::Empty) && self.style.is_empty()
    }

    /// Numeric value for arithmetic; non-numeric content reads as 0.
    pub fn numeric_value(&self) -> f64 {
        match &self.content {
            CellContent::Empty => 0.0,
            CellContent::Number { value, .. } => *value,
            CellContent::Text(s) => parse_number(s).unwrap_or(0.0),
            CellContent::Formula(_) => parse_number(&self.value).unwrap_or(0.0),
        }
    }

    /// Raw content as the user would type it back in.
    pub fn to_input_string(&self) -> String {
        match &self.content {
            CellContent::Empty => String::new(),
            CellContent::Text(s) => s.clone(),
            CellContent::Number { text, .. } => text.clone(),
            CellContent::Formula(f) => format!("{}{}", FORMULA_MARKER, f),
        }
    }
}

/// Sparse grid storage.
pub type Grid = HashMap<CellRef, Cell>;

impl CellValues for Grid {
    fn number_at(&self, cell: &CellRef) -> f64 {
        self.get(cell).map(Cell::numeric_value).unwrap_or(0.0)
    }
}
