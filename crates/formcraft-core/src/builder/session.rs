use std::collections::VecDeque;

use serde::Serialize;

use super::{apply, BuilderOp, BuilderState};
use crate::error::Result;
use crate::schema::FormDefinition;

/// Maximum number of undo snapshots kept per session
pub const HISTORY_LIMIT: usize = 50;

/// Explicit editing session over one form definition
///
/// Nothing is persisted until the owner saves; `dirty` tracks unsaved edits.
/// Step navigation moves the cursor only: it never dirties the session or
/// takes an undo slot.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderSession {
    state: BuilderState,
    #[serde(skip)]
    history: VecDeque<BuilderState>,
    dirty: bool,
}

impl BuilderSession {
    pub fn open(definition: FormDefinition) -> Self {
        Self {
            state: BuilderState::new(definition),
            history: VecDeque::new(),
            dirty: false,
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn definition(&self) -> &FormDefinition {
        &self.state.definition
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Apply an operation; returns whether the state changed
    pub fn apply(&mut self, op: &BuilderOp) -> Result<bool> {
        let next = apply(&self.state, op)?;
        if next == self.state {
            return Ok(false);
        }
        if next.definition == self.state.definition {
            self.state.active_step = next.active_step;
            return Ok(true);
        }
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push_back(previous);
        if self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.dirty = true;
        Ok(true)
    }

    /// Restore the previous state; returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(previous) => {
                self.state = previous;
                self.dirty = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}
