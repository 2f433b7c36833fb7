// Bounded per-team undo history
use super::roster::TeamState;
use std::collections::VecDeque;

pub const DEFAULT_UNDO_CAPACITY: usize = 25;

#[derive(Debug, Clone, PartialEq)]
pub struct UndoStack {
    entries: VecDeque<TeamState>,
    capacity: usize,
}

impl UndoStack {
    pub fn new(capacity: usize) -> Self {
        Self { entries: VecDeque::with_capacity(capacity), capacity }
    }

    /// Pushes a snapshot, evicting the oldest past capacity.
    pub fn push(&mut self, state: TeamState) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(state);
    }

    pub fn pop(&mut self) -> Option<TeamState> {
        self.entries.pop_back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}
