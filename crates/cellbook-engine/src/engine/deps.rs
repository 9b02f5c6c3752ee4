//! Dependency extraction from formula strings.
//!
//! Parses formula text to find all cell references that the formula depends
//! on. This is used to build the dependency graph for recalculation and cycle
//! detection.

use std::collections::HashSet;

use super::cell_ref::CellRef;
use super::parser::parse_formula;

/// Extract all cell references from a formula body as dependencies.
///
/// Duplicates are dropped, first occurrence wins. A formula that does not
/// parse has no dependencies; it evaluates to an error on its own.
pub fn extract_dependencies(formula: &str) -> Vec<CellRef> {
    let Ok(expr) = parse_formula(formula) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    expr.references()
        .into_iter()
        .filter(|cell| seen.insert(*cell))
        .collect()
}
