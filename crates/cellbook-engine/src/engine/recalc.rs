//! Recalculation of formula cells in dependency order.
//!
//! A pass takes the cells that were written, expands them to every transitive
//! dependent, and evaluates the formula cells among them so that each cell is
//! computed after everything it reads (Kahn's algorithm). Cells that can never
//! become ready sit on or behind a cycle: cycle members are marked
//! `#CIRCULAR`, and the cells merely downstream of a cycle are then evaluated
//! normally, reading the cycle members as 0.
//!
//! Each formula cell keeps its settled [`chain_depth`](super::cell::Cell::chain_depth).
//! A pass seeds from the depths of precedents it does not touch, so the depth
//! limit depends only on the sheet's contents, never on the order of edits.

use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, warn};

use super::cell::Grid;
use super::cell_ref::CellRef;
use super::cycle::cells_on_cycles;
use super::eval::{FormulaError, eval_formula};
use super::graph::DependencyGraph;

/// Bounds on the work a single formula or pass may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted formula body, in bytes.
    pub max_formula_len: usize,
    /// Longest chain of formula cells; cells further along show `#ERROR`.
    pub max_chain_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_formula_len: 8192,
            max_chain_depth: 1024,
        }
    }
}

/// What a recalculation pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecalcReport {
    /// Formula cells evaluated, in evaluation order.
    pub evaluated: Vec<CellRef>,
    /// Cells found on a dependency cycle, sorted.
    pub circular: Vec<CellRef>,
}

/// Recalculate the formula cells among `changed` and all their dependents.
pub fn recalculate(
    grid: &mut Grid,
    graph: &DependencyGraph,
    changed: &[CellRef],
    limits: &Limits,
) -> RecalcReport {
    let mut affected = graph.transitive_dependents(changed);
    affected.extend(changed.iter().copied());
    affected.retain(|cell| grid.get(cell).is_some_and(|c| c.is_formula()));
    run_pass(grid, graph, affected, limits)
}

/// Recalculate every formula cell in the grid. O(number of formula cells).
pub fn recalculate_all(grid: &mut Grid, graph: &DependencyGraph, limits: &Limits) -> RecalcReport {
    let affected: HashSet<CellRef> = grid
        .iter()
        .filter(|(_, cell)| cell.is_formula())
        .map(|(cell_ref, _)| *cell_ref)
        .collect();
    run_pass(grid, graph, affected, limits)
}

fn run_pass(
    grid: &mut Grid,
    graph: &DependencyGraph,
    affected: HashSet<CellRef>,
    limits: &Limits,
) -> RecalcReport {
    let mut report = RecalcReport::default();
    if affected.is_empty() {
        return report;
    }

    let leftover = evaluate_in_order(grid, graph, &affected, limits, &mut report);
    if !leftover.is_empty() {
        let circular = cells_on_cycles(graph, &leftover);
        let mut sorted: Vec<CellRef> = circular.iter().copied().collect();
        sorted.sort();
        warn!(
            "circular reference among {}",
            sorted.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
        );
        for cell_ref in &sorted {
            if let Some(cell) = grid.get_mut(cell_ref) {
                cell.value = FormulaError::Circular.marker().to_string();
                cell.chain_depth = 0;
            }
        }
        report.circular = sorted;

        // Cycle members are settled; what remains downstream is acyclic.
        let downstream: HashSet<CellRef> = leftover.difference(&circular).copied().collect();
        let stuck = evaluate_in_order(grid, graph, &downstream, limits, &mut report);
        debug_assert!(stuck.is_empty(), "cells left after removing cycles: {:?}", stuck);
    }

    debug!(
        "recalculated {} cell(s), {} circular",
        report.evaluated.len(),
        report.circular.len()
    );
    report
}

/// Kahn's algorithm over `cells`; returns the cells that never became ready.
fn evaluate_in_order(
    grid: &mut Grid,
    graph: &DependencyGraph,
    cells: &HashSet<CellRef>,
    limits: &Limits,
    report: &mut RecalcReport,
) -> HashSet<CellRef> {
    let mut pending: HashMap<CellRef, usize> = HashMap::with_capacity(cells.len());
    for cell in cells {
        let inside = graph
            .precedents_of(cell)
            .iter()
            .filter(|dep| cells.contains(dep))
            .count();
        pending.insert(*cell, inside);
    }

    let mut ready: Vec<CellRef> = pending
        .iter()
        .filter(|(_, n)| **n == 0)
        .map(|(cell, _)| *cell)
        .collect();
    ready.sort();
    let mut queue: VecDeque<CellRef> = ready.into();

    while let Some(cell_ref) = queue.pop_front() {
        pending.remove(&cell_ref);

        // Precedents are settled: either evaluated earlier in this pass or
        // untouched by it.
        let level = 1 + graph
            .precedents_of(&cell_ref)
            .iter()
            .filter_map(|dep| grid.get(dep).map(|c| c.chain_depth))
            .max()
            .unwrap_or(0);
        evaluate_cell(grid, &cell_ref, level, limits);
        report.evaluated.push(cell_ref);

        let mut unlocked: Vec<CellRef> = Vec::new();
        for dependent in graph.dependents_of(&cell_ref) {
            if let Some(n) = pending.get_mut(dependent) {
                *n -= 1;
                if *n == 0 {
                    unlocked.push(*dependent);
                }
            }
        }
        unlocked.sort();
        queue.extend(unlocked);
    }

    pending.into_keys().collect()
}

fn evaluate_cell(grid: &mut Grid, cell_ref: &CellRef, level: usize, limits: &Limits) {
    let value = match grid.get(cell_ref).and_then(|cell| cell.formula()) {
        Some(_) if level > limits.max_chain_depth => FormulaError::TooDeep {
            max: limits.max_chain_depth,
        }
        .marker()
        .to_string(),
        Some(formula) => eval_formula(formula, &*grid, limits.max_formula_len),
        None => return,
    };
    if let Some(cell) = grid.get_mut(cell_ref) {
        cell.value = value;
        cell.chain_depth = level;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Cell;
    use pretty_assertions::assert_eq;

    fn r(name: &str) -> CellRef {
        CellRef::parse(name).unwrap()
    }

    /// Write `input` into the grid and run the incremental pass, the way the
    /// document layer does it.
    fn write(grid: &mut Grid, graph: &mut DependencyGraph, name: &str, input: &str) -> RecalcReport {
        let cell_ref = r(name);
        let cell = grid.entry(cell_ref).or_insert_with(Cell::new_empty);
        cell.set_content(Cell::content_from_input(input));
        graph.set_precedents(cell_ref, cell.depends_on.clone());
        recalculate(grid, graph, &[cell_ref], &Limits::default())
    }

    fn shown(grid: &Grid, name: &str) -> String {
        grid.get(&r(name)).map(|c| c.value.clone()).unwrap_or_default()
    }

    #[test]
    fn test_edit_propagates_to_dependents() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "A1", "10");
        write(&mut grid, &mut graph, "A2", "20");
        write(&mut grid, &mut graph, "A3", "=A1+A2");
        assert_eq!(shown(&grid, "A3"), "30");

        let report = write(&mut grid, &mut graph, "A1", "5");
        assert_eq!(shown(&grid, "A3"), "25");
        assert_eq!(report.evaluated, vec![r("A3")]);
    }

    #[test]
    fn test_dependents_evaluate_after_their_precedents() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "C1", "=B1*2");
        write(&mut grid, &mut graph, "B1", "=A1+1");
        write(&mut grid, &mut graph, "D1", "=C1+B1");
        let report = write(&mut grid, &mut graph, "A1", "1");

        assert_eq!(report.evaluated, vec![r("B1"), r("C1"), r("D1")]);
        assert_eq!(shown(&grid, "D1"), "6");
    }

    #[test]
    fn test_cycle_marks_members_only() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "A1", "=B1");
        write(&mut grid, &mut graph, "B1", "=C1");
        write(&mut grid, &mut graph, "D1", "=A1+7");
        write(&mut grid, &mut graph, "E1", "3");
        let report = write(&mut grid, &mut graph, "C1", "=A1");

        assert_eq!(report.circular, vec![r("A1"), r("B1"), r("C1")]);
        for name in ["A1", "B1", "C1"] {
            assert_eq!(shown(&grid, name), "#CIRCULAR");
        }
        // Downstream of the cycle: reads the member as 0.
        assert_eq!(shown(&grid, "D1"), "7");
        assert_eq!(shown(&grid, "E1"), "3");
    }

    #[test]
    fn test_breaking_a_cycle_recovers_values() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "A1", "=B1");
        write(&mut grid, &mut graph, "B1", "=A1");
        assert_eq!(shown(&grid, "A1"), "#CIRCULAR");

        write(&mut grid, &mut graph, "B1", "4");
        assert_eq!(shown(&grid, "A1"), "4");
    }

    #[test]
    fn test_self_reference_is_circular() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        let report = write(&mut grid, &mut graph, "A1", "=A1+1");
        assert_eq!(report.circular, vec![r("A1")]);
        assert_eq!(shown(&grid, "A1"), "#CIRCULAR");
    }

    #[test]
    fn test_error_in_one_cell_does_not_stop_siblings() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "B1", "=A1/A2");
        write(&mut grid, &mut graph, "B2", "=A1*2");
        write(&mut grid, &mut graph, "A1", "3");
        assert_eq!(shown(&grid, "B1"), "#DIV0");
        assert_eq!(shown(&grid, "B2"), "6");
    }

    #[test]
    fn test_chain_depth_limit() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        for row in 2..=6 {
            write(&mut grid, &mut graph, &format!("A{row}"), &format!("=A{}+1", row - 1));
        }
        let limits = Limits {
            max_chain_depth: 3,
            ..Limits::default()
        };
        recalculate_all(&mut grid, &graph, &limits);
        assert_eq!(shown(&grid, "A4"), "3");
        assert_eq!(shown(&grid, "A5"), "#ERROR");
        assert_eq!(shown(&grid, "A6"), "#ERROR");
    }

    #[test]
    fn test_chain_depth_does_not_depend_on_edit_order() {
        let limits = Limits {
            max_chain_depth: 3,
            ..Limits::default()
        };
        let write_limited = |grid: &mut Grid, graph: &mut DependencyGraph, name: &str, input: &str| {
            let cell_ref = r(name);
            let cell = grid.entry(cell_ref).or_insert_with(Cell::new_empty);
            cell.set_content(Cell::content_from_input(input));
            graph.set_precedents(cell_ref, cell.depends_on.clone());
            recalculate(grid, graph, &[cell_ref], &limits);
        };

        // Top-down: every write evaluates a single cell.
        let mut top_down = Grid::new();
        let mut graph_a = DependencyGraph::new();
        write_limited(&mut top_down, &mut graph_a, "A1", "1");
        for row in 2..=6 {
            write_limited(&mut top_down, &mut graph_a, &format!("A{row}"), &format!("=A{}+1", row - 1));
        }

        // Bottom-up: the last write re-evaluates the whole chain.
        let mut bottom_up = Grid::new();
        let mut graph_b = DependencyGraph::new();
        for row in (2..=6).rev() {
            write_limited(&mut bottom_up, &mut graph_b, &format!("A{row}"), &format!("=A{}+1", row - 1));
        }
        write_limited(&mut bottom_up, &mut graph_b, "A1", "1");

        for row in 1..=6 {
            let name = format!("A{row}");
            assert_eq!(shown(&top_down, &name), shown(&bottom_up, &name), "{name}");
        }
        assert_eq!(shown(&top_down, "A4"), "4");
        assert_eq!(shown(&top_down, "A5"), "#ERROR");

        // Rewriting the head with the same value changes nothing downstream.
        write_limited(&mut top_down, &mut graph_a, "A1", "1");
        assert_eq!(shown(&top_down, "A4"), "4");
        assert_eq!(shown(&top_down, "A6"), "#ERROR");

        // Extending the chain at its tail sees the depth of what is above.
        write_limited(&mut bottom_up, &mut graph_b, "A7", "=A6+1");
        assert_eq!(shown(&bottom_up, "A7"), "#ERROR");
    }

    #[test]
    fn test_depth_after_a_cycle_is_seeded_from_zero() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "A1", "=B1");
        write(&mut grid, &mut graph, "B1", "=A1");
        write(&mut grid, &mut graph, "C1", "=A1+1");
        assert_eq!(grid[&r("A1")].chain_depth, 0);
        assert_eq!(grid[&r("C1")].chain_depth, 1);
        assert_eq!(shown(&grid, "C1"), "1");
    }

    #[test]
    fn test_recalculate_all_matches_incremental_results() {
        let mut grid = Grid::new();
        let mut graph = DependencyGraph::new();
        write(&mut grid, &mut graph, "A1", "2");
        write(&mut grid, &mut graph, "B1", "=A1*A1");
        write(&mut grid, &mut graph, "C1", "=B1-A1");
        for cell in grid.values_mut() {
            if cell.is_formula() {
                cell.value.clear();
            }
        }
        let report = recalculate_all(&mut grid, &graph, &Limits::default());
        assert_eq!(report.evaluated, vec![r("B1"), r("C1")]);
        assert_eq!(shown(&grid, "C1"), "2");
    }
}
