//! Dependency index between formula cells.
//!
//! Keeps both directions of the "formula cell reads cell" relation so a write
//! can find every transitive dependent without scanning the whole grid.

use std::collections::{HashMap, HashSet};

use super::cell::Grid;
use super::cell_ref::CellRef;

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    /// cell -> cells its formula reads
    precedents: HashMap<CellRef, Vec<CellRef>>,
    /// cell -> formula cells that read it
    dependents: HashMap<CellRef, HashSet<CellRef>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index from the dependencies recorded in every cell.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut graph = DependencyGraph::new();
        graph.rebuild(grid);
        graph
    }

    /// Rebuild the index from scratch.
    /// Call this after the grid is replaced wholesale (undo, redo, load).
    pub fn rebuild(&mut self, grid: &Grid) {
        self.precedents.clear();
        self.dependents.clear();
        for (cell_ref, cell) in grid {
            if !cell.depends_on.is_empty() {
                self.set_precedents(*cell_ref, cell.depends_on.clone());
            }
        }
    }

    /// Replace the precedents of one cell, keeping the reverse map in sync.
    pub fn set_precedents(&mut self, cell: CellRef, precedents: Vec<CellRef>) {
        self.remove(&cell);
        if precedents.is_empty() {
            return;
        }
        for dep in &precedents {
            self.dependents.entry(*dep).or_default().insert(cell);
        }
        self.precedents.insert(cell, precedents);
    }

    /// Drop every edge out of `cell` (it no longer holds a formula).
    pub fn remove(&mut self, cell: &CellRef) {
        let Some(old) = self.precedents.remove(cell) else {
            return;
        };
        for dep in old {
            if let Some(set) = self.dependents.get_mut(&dep) {
                set.remove(cell);
                if set.is_empty() {
                    self.dependents.remove(&dep);
                }
            }
        }
    }

    pub fn precedents_of(&self, cell: &CellRef) -> &[CellRef] {
        self.precedents.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dependents_of(&self, cell: &CellRef) -> impl Iterator<Item = &CellRef> {
        self.dependents.get(cell).into_iter().flatten()
    }

    /// Every cell that transitively reads any of `changed` (not including
    /// `changed` itself unless it is its own dependent).
    pub fn transitive_dependents(&self, changed: &[CellRef]) -> HashSet<CellRef> {
        let mut to_process: Vec<CellRef> = changed.to_vec();
        let mut visited = HashSet::new();
        while let Some(cell_ref) = to_process.pop() {
            for dep in self.dependents_of(&cell_ref) {
                if visited.insert(*dep) {
                    to_process.push(*dep);
                }
            }
        }
        visited
    }

    /// Number of formula cells with at least one reference.
    pub fn len(&self) -> usize {
        self.precedents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precedents.is_empty()
    }
}
