//! A single sheet: cells, recalculation on write and undo history.

use cellbook_engine::engine::{
    Cell, CellContent, CellRef, CellStyle, DependencyGraph, FORMULA_MARKER, Grid, Limits,
    StyleAttribute, eval_formula, recalculate, recalculate_all,
};
use log::debug;
use std::sync::Arc;

use super::history::History;
use crate::config::EngineConfig;

/// What the UI needs to show one cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellView {
    /// Computed value (formula result, error marker, or the literal).
    pub display: String,
    /// Content as entered; formulas keep their leading `=`.
    pub raw: String,
    pub style: CellStyle,
}

/// One named sheet: sparse cells, their dependency index and edit history.
///
/// Every write recalculates the affected formulas before returning, so the
/// sheet is always consistent between calls.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub(crate) name: String,
    cells: Grid,
    graph: DependencyGraph,
    history: History,
    /// Display row count; storage stays sparse.
    rows: usize,
    /// Cell shown in the formula bar.
    pub(crate) selected: CellRef,
    limits: Limits,
}

impl Sheet {
    pub fn new(name: &str, config: &EngineConfig) -> Self {
        Self::from_cells(name, Grid::new(), config.default_rows, config)
    }

    /// Build a sheet around existing cells (e.g. loaded from a file).
    /// Every formula is recomputed and the history starts at this state.
    pub fn from_cells(name: &str, mut cells: Grid, rows: usize, config: &EngineConfig) -> Self {
        let limits = config.limits();
        cells.retain(|_, cell| !cell.is_blank());
        for cell in cells.values_mut() {
            if cell.formula_too_long(limits.max_formula_len) {
                cell.depends_on.clear();
            }
        }
        let graph = DependencyGraph::from_grid(&cells);
        recalculate_all(&mut cells, &graph, &limits);
        let history = History::new(Arc::new(cells.clone()), config.history_limit);
        Sheet {
            name: name.to_string(),
            cells,
            graph,
            history,
            rows,
            selected: CellRef::new(0, 0),
            limits,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, cell_ref: &CellRef) -> Option<&Cell> {
        self.cells.get(cell_ref)
    }

    /// Read a cell; cells never written read as empty.
    pub fn view(&self, cell_ref: &CellRef) -> CellView {
        match self.cells.get(cell_ref) {
            Some(cell) => CellView {
                display: cell.value.clone(),
                raw: cell.to_input_string(),
                style: cell.style.clone(),
            },
            None => CellView::default(),
        }
    }

    /// Store a plain value (text or number), dropping any formula.
    pub fn set_literal(&mut self, cell_ref: CellRef, value: &str) {
        self.set_content(cell_ref, Cell::literal_content(value));
    }

    /// Store a formula; the leading `=` is optional here.
    /// Evaluation failures end up as the cell's display value.
    pub fn set_formula(&mut self, cell_ref: CellRef, formula: &str) {
        let body = formula.strip_prefix(FORMULA_MARKER).unwrap_or(formula);
        self.set_content(cell_ref, CellContent::Formula(body.to_string()));
    }

    /// Route raw input: a leading `=` means formula, anything else is literal,
    /// and empty input clears the cell.
    pub fn write_input(&mut self, cell_ref: CellRef, input: &str) {
        self.set_content(cell_ref, Cell::content_from_input(input));
    }

    /// Reset the cell's content; its style is kept.
    pub fn clear(&mut self, cell_ref: CellRef) {
        self.set_content(cell_ref, CellContent::Empty);
    }

    /// Merge one style attribute into the cell, creating it if needed.
    pub fn set_style(&mut self, cell_ref: CellRef, attribute: StyleAttribute) {
        let cell = self.cells.entry(cell_ref).or_insert_with(Cell::new_empty);
        let before = cell.style.clone();
        cell.style.apply(attribute);
        if cell.style == before {
            return;
        }
        debug!("{}!{}: style changed", self.name, cell_ref);
        self.record();
    }

    fn set_content(&mut self, cell_ref: CellRef, content: CellContent) {
        let unchanged = match self.cells.get(&cell_ref) {
            Some(cell) => cell.content == content,
            None => content == CellContent::Empty,
        };
        if unchanged {
            return;
        }

        let cell = self.cells.entry(cell_ref).or_insert_with(Cell::new_empty);
        cell.set_content_bounded(content, self.limits.max_formula_len);
        let depends_on = cell.depends_on.clone();
        if cell.is_blank() {
            self.cells.remove(&cell_ref);
        }
        self.graph.set_precedents(cell_ref, depends_on);

        let report = recalculate(&mut self.cells, &self.graph, &[cell_ref], &self.limits);
        debug!(
            "{}!{}: edit recalculated {} cell(s)",
            self.name,
            cell_ref,
            report.evaluated.len()
        );
        self.record();
    }

    fn record(&mut self) {
        self.history.record(Arc::new(self.cells.clone()));
    }

    /// Make a snapshot the live state again.
    fn restore(&mut self, snapshot: &Grid) {
        // Snapshots are taken after recalculation, so their values are settled.
        self.cells = snapshot.clone();
        self.graph.rebuild(&self.cells);
    }

    /// Step back one edit; returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                debug!("{}: undo to position {}", self.name, self.history.position());
                true
            }
            None => false,
        }
    }

    /// Step forward one edit; returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.restore(&snapshot);
                debug!("{}: redo to position {}", self.name, self.history.position());
                true
            }
            None => false,
        }
    }

    /// Evaluate a formula against the current values without storing it.
    pub fn evaluate(&self, formula: &str) -> String {
        let body = formula.strip_prefix(FORMULA_MARKER).unwrap_or(formula);
        eval_formula(body, &self.cells, self.limits.max_formula_len)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Recompute every formula from scratch.
    pub fn recalculate_all(&mut self) {
        recalculate_all(&mut self.cells, &self.graph, &self.limits);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Grow the displayed row count; nothing is allocated.
    pub fn add_rows(&mut self, count: usize) -> usize {
        self.rows = self.rows.saturating_add(count);
        self.rows
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> Vec<(&CellRef, &Cell)> {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_by_key(|(cell_ref, _)| **cell_ref);
        cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn selected(&self) -> CellRef {
        self.selected
    }
}
