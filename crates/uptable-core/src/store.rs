//! History-aware state container.
//!
//! Wraps [`transition`] with snapshot-based undo/redo: allow-listed actions
//! record the state they replaced, `Undo`/`Redo` step through those
//! snapshots, and everything else passes straight through.
//!
//! Upload bookkeeping lives in the same snapshots, so history is frozen while
//! a batch is active. A successful `InitializeSuccess` starts a fresh history.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::action::{Action, ActionKind};
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::history::History;
use crate::reducer::transition;
use crate::state::TableState;
use crate::status::TableStatus;

/// Current state plus its undo/redo history.
#[derive(Debug, Clone)]
pub struct Store {
    present: Arc<TableState>,
    history: History<TableState>,
}

impl Store {
    /// Store holding the initial state.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_state(TableState::new(config), config.max_history)
    }

    /// Store starting from an arbitrary state with empty history.
    pub fn with_state(state: TableState, max_history: usize) -> Self {
        Self {
            present: Arc::new(state),
            history: History::new(max_history),
        }
    }

    pub fn state(&self) -> &TableState {
        &self.present
    }

    /// Shared handle to the current state.
    pub fn snapshot(&self) -> Arc<TableState> {
        Arc::clone(&self.present)
    }

    pub fn history(&self) -> &History<TableState> {
        &self.history
    }

    /// Compute the store that follows `self` after `action`, leaving `self` untouched.
    pub fn apply(&self, action: &Action) -> Result<Store, CoreError> {
        let mut next = self.clone();
        let kind = action.kind();

        match kind {
            ActionKind::Undo | ActionKind::Redo if self.present.status == TableStatus::Uploading => {
                warn!(action = %kind, "History is locked while an upload is active");
            }
            ActionKind::Undo | ActionKind::Redo => {
                let present = Arc::clone(&self.present);
                let restored = if kind == ActionKind::Undo {
                    next.history.undo(present)
                } else {
                    next.history.redo(present)
                };
                match restored {
                    Some(state) => next.present = Arc::new(transition(&state, action)?),
                    None => debug!(action = %kind, "Nothing to restore"),
                }
            }
            ActionKind::InitializeSuccess => {
                let state = transition(&self.present, action)?;
                if self.present.status != TableStatus::Uploading {
                    debug!("Table rebuilt, history cleared");
                    next.history.clear();
                }
                next.present = Arc::new(state);
            }
            kind if kind.is_undoable() => {
                let state = transition(&self.present, action)?;
                if state != *self.present {
                    next.history.record(Arc::clone(&self.present));
                    next.present = Arc::new(state);
                }
            }
            _ => next.present = Arc::new(transition(&self.present, action)?),
        }

        Ok(next)
    }

    /// Apply `action` in place. On error the store keeps its previous state.
    pub fn dispatch(&mut self, action: &Action) -> Result<&TableState, CoreError> {
        *self = self.apply(action)?;
        Ok(self.state())
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
