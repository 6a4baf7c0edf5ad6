//! Snapshot-based undo/redo.
//!
//! A checkpoint is the full mutable editor state captured before a
//! mutation. Undo swaps the current state for the newest checkpoint and
//! parks the current state on the redo stack; redo does the reverse.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::doc::ShapeList;
use crate::instruments::{CompassState, ProtractorState, RulerState, SetSquareState};

/// Everything undo restores. Also the `currentState` record of a session
/// file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub shapes: ShapeList,
    #[serde(default)]
    pub point_name_counter: u32,
    #[serde(default)]
    pub compass_state: CompassState,
    #[serde(default)]
    pub ruler_state: RulerState,
    #[serde(default)]
    pub protractor_state: ProtractorState,
    #[serde(default)]
    pub set_square_state: SetSquareState,
}

/// Undo and redo stacks, newest last.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<EditorSnapshot>,
    redo_stack: Vec<EditorSnapshot>,
    limit: usize,
}

impl History {
    /// Empty history keeping at most `limit` undo steps.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self { undo_stack: VecDeque::new(), redo_stack: Vec::new(), limit: limit.max(1) }
    }

    /// History whose undo stack is `entries`, oldest first.
    #[must_use]
    pub fn from_entries(entries: Vec<EditorSnapshot>, limit: usize) -> Self {
        let mut history = Self::new(limit);
        for entry in entries {
            history.push_undo(entry);
        }
        history
    }

    /// Record a checkpoint taken before a mutation. Invalidates redo.
    pub fn save(&mut self, before: EditorSnapshot) {
        self.redo_stack.clear();
        self.push_undo(before);
    }

    /// Record `before` only if the state actually changed since it was
    /// taken. Returns whether a checkpoint was recorded.
    pub fn save_if_changed(&mut self, before: EditorSnapshot, current: &EditorSnapshot) -> bool {
        if before == *current {
            return false;
        }
        self.save(before);
        true
    }

    /// Step back: returns the state to restore, given the `current` one.
    pub fn undo(&mut self, current: EditorSnapshot) -> Option<EditorSnapshot> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Step forward again after an undo.
    pub fn redo(&mut self, current: EditorSnapshot) -> Option<EditorSnapshot> {
        let next = self.redo_stack.pop()?;
        self.push_undo(current);
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo checkpoints, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &EditorSnapshot> {
        self.undo_stack.iter()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn push_undo(&mut self, snapshot: EditorSnapshot) {
        self.undo_stack.push_back(snapshot);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }
}
