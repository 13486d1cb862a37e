//! Snapshot-based undo/redo history.

use std::collections::VecDeque;
use std::sync::Arc;

/// Bounded undo and redo stacks of full-state snapshots.
///
/// Snapshots are shared behind `Arc` so a stack never observes later
/// mutation of the state it recorded.
#[derive(Debug)]
pub struct History<T> {
    undo_stack: VecDeque<Arc<T>>,
    redo_stack: VecDeque<Arc<T>>,
    max_entries: usize,
}

impl<T> Clone for History<T> {
    fn clone(&self) -> Self {
        Self {
            undo_stack: self.undo_stack.clone(),
            redo_stack: self.redo_stack.clone(),
            max_entries: self.max_entries,
        }
    }
}

impl<T> History<T> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_entries,
        }
    }

    /// Record the state as it was before an undoable change.
    pub fn record(&mut self, before: Arc<T>) {
        push_bounded(&mut self.undo_stack, before, self.max_entries);
        self.redo_stack.clear();
    }

    /// Step back. `present` moves to the redo stack; returns the state to restore.
    pub fn undo(&mut self, present: Arc<T>) -> Option<Arc<T>> {
        let previous = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, present, self.max_entries);
        Some(previous)
    }

    /// Step forward. `present` moves to the undo stack; returns the state to restore.
    pub fn redo(&mut self, present: Arc<T>) -> Option<Arc<T>> {
        let next = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, present, self.max_entries);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded<T>(stack: &mut VecDeque<Arc<T>>, entry: Arc<T>, max_entries: usize) {
    if max_entries == 0 {
        return;
    }
    stack.push_back(entry);
    // Drop oldest
    while stack.len() > max_entries {
        stack.pop_front();
    }
}
