use cellbook_engine::engine::Grid;
use std::sync::Arc;

/// Immutable copy of a sheet's cells at one point in its edit history.
pub type Snapshot = Arc<Grid>;

/// Linear undo/redo log of full snapshots.
///
/// Holds `[s0, .., sn]` and a position `i`. Recording after an undo discards
/// the redo tail. Snapshots are shared, never mutated.
#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    index: usize,
    /// Undo steps kept; older snapshots are dropped.
    limit: usize,
}

impl History {
    pub fn new(initial: Snapshot, limit: usize) -> Self {
        History {
            entries: vec![initial],
            index: 0,
            limit,
        }
    }

    /// Truncate everything after the current position, then append.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        if self.entries.len() > self.limit + 1 {
            let excess = self.entries.len() - (self.limit + 1);
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back; returns the state to restore, or `None` at the start.
    pub fn undo(&mut self) -> Option<Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current().clone())
    }

    /// Step forward; returns the state to restore, or `None` at the end.
    pub fn redo(&mut self) -> Option<Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current().clone())
    }

    pub fn current(&self) -> &Snapshot {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Current position in the log.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of snapshots held, including the current one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
