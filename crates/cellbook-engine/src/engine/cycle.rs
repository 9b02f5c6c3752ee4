//! Circular dependency detection for formula cells.
//!
//! A cell is circular when following its references leads back to itself
//! (e.g., A1 references B1, B1 references C1, C1 references A1). We find such
//! cells as the strongly connected components of the dependency graph, using
//! an iterative Tarjan walk so long chains cannot overflow the stack.

use std::collections::{HashMap, HashSet};

use super::cell_ref::CellRef;
use super::graph::DependencyGraph;

/// Return every cell of `candidates` that lies on a dependency cycle made of
/// candidate cells only. Edges leaving the candidate set are ignored.
pub fn cells_on_cycles(graph: &DependencyGraph, candidates: &HashSet<CellRef>) -> HashSet<CellRef> {
    let mut on_cycle = HashSet::new();
    for component in strongly_connected(graph, candidates) {
        let cyclic = component.len() > 1
            || component
                .first()
                .is_some_and(|cell| graph.precedents_of(cell).contains(cell));
        if cyclic {
            on_cycle.extend(component);
        }
    }
    on_cycle
}

/// Strongly connected components of the subgraph induced by `candidates`.
fn strongly_connected(graph: &DependencyGraph, candidates: &HashSet<CellRef>) -> Vec<Vec<CellRef>> {
    struct Frame {
        cell: CellRef,
        next_edge: usize,
    }

    let mut index: HashMap<CellRef, usize> = HashMap::new();
    let mut lowlink: HashMap<CellRef, usize> = HashMap::new();
    let mut on_stack: HashSet<CellRef> = HashSet::new();
    let mut stack: Vec<CellRef> = Vec::new();
    let mut components = Vec::new();
    let mut counter = 0usize;

    // Sorted roots keep component output deterministic.
    let mut roots: Vec<CellRef> = candidates.iter().copied().collect();
    roots.sort();

    for root in roots {
        if index.contains_key(&root) {
            continue;
        }
        let mut call: Vec<Frame> = vec![Frame {
            cell: root,
            next_edge: 0,
        }];
        index.insert(root, counter);
        lowlink.insert(root, counter);
        counter += 1;
        stack.push(root);
        on_stack.insert(root);

        while let Some(frame) = call.last_mut() {
            let cell = frame.cell;
            let edges = graph.precedents_of(&cell);

            if frame.next_edge < edges.len() {
                let next = edges[frame.next_edge];
                frame.next_edge += 1;
                if !candidates.contains(&next) {
                    continue;
                }
                if !index.contains_key(&next) {
                    index.insert(next, counter);
                    lowlink.insert(next, counter);
                    counter += 1;
                    stack.push(next);
                    on_stack.insert(next);
                    call.push(Frame {
                        cell: next,
                        next_edge: 0,
                    });
                } else if on_stack.contains(&next) {
                    let low = lowlink[&cell].min(index[&next]);
                    lowlink.insert(cell, low);
                }
                continue;
            }

            // All edges explored: close this frame.
            call.pop();
            if let Some(parent) = call.last() {
                let low = lowlink[&parent.cell].min(lowlink[&cell]);
                lowlink.insert(parent.cell, low);
            }
            if lowlink[&cell] == index[&cell] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack.remove(&member);
                    component.push(member);
                    if member == cell {
                        break;
                    }
                }
                component.sort();
                components.push(component);
            }
        }
    }

    components
}
