//! Spreadsheet engine API.
//!
//! This module provides the core computation engine for the spreadsheet:
//!
//! - [`Cell`], [`CellContent`], [`Grid`] - Data structures for cell storage
//! - [`CellStyle`], [`StyleAttribute`] - Optional per-cell styling
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`parse_formula`], [`evaluate`] - Arithmetic formula parsing and evaluation
//! - [`extract_dependencies`], [`DependencyGraph`] - Formula dependency tracking
//! - [`cells_on_cycles`] - Circular dependency detection
//! - [`recalculate`] - Dependency-ordered recalculation after an edit
//! - [`format_number`] - Format values for display

mod cell;
mod cell_ref;
mod cycle;
mod deps;
mod eval;
mod format;
mod graph;
mod parser;
mod recalc;
mod style;

pub use cell::{Cell, CellContent, FORMULA_MARKER, Grid};
pub use cell_ref::{CellRef, InvalidReference};
pub use cycle::cells_on_cycles;
pub use deps::extract_dependencies;
pub use eval::{CellValues, FormulaError, eval_formula, evaluate, try_eval_formula};
pub use format::{format_number, parse_number};
pub use graph::DependencyGraph;
pub use parser::{BinaryOp, Expr, parse_formula};
pub use recalc::{Limits, RecalcReport, recalculate, recalculate_all};
pub use style::{Align, CellStyle, StyleAttribute, StyleError};
