//! Action script parsing and replay.
//!
//! A script is newline-delimited JSON, one action per line. Blank lines and
//! lines starting with `#` are skipped.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use uptable_core::{Action, ColumnKind, CoreError, Store, TableState, TableStatus, UploadAggregate};

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Config(serde_json::Error),

    #[error("Line {line}: invalid action: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Line {line}: {source}")]
    Engine { line: usize, source: CoreError },
}

/// An action together with the script line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptStep {
    pub line: usize,
    pub action: Action,
}

/// Parse a script into steps.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ReplayError> {
    let mut steps = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let action = serde_json::from_str(trimmed)
            .map_err(|source| ReplayError::Parse { line, source })?;
        steps.push(ScriptStep { line, action });
    }
    Ok(steps)
}

/// Dispatch every step in order, calling `on_step` after each one.
///
/// Stops at the first fatal engine error; the store keeps the state reached
/// before the failing step.
pub fn replay<F>(store: &mut Store, steps: &[ScriptStep], mut on_step: F) -> Result<usize, ReplayError>
where
    F: FnMut(&ScriptStep, &TableState),
{
    for step in steps {
        let state = store
            .dispatch(&step.action)
            .map_err(|source| ReplayError::Engine {
                line: step.line,
                source,
            })?;
        debug!(line = step.line, action = %step.action.kind(), "Step applied");
        on_step(step, state);
    }
    info!(steps = steps.len(), "Replay complete");
    Ok(steps.len())
}

/// Condensed view of the final state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub status: TableStatus,
    pub columns: Vec<ColumnKind>,
    pub task_numbers: Vec<String>,
    pub upload: Option<UploadAggregate>,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub full_width: f64,
}

impl Summary {
    pub fn from_store(store: &Store) -> Self {
        let state = store.state();
        Self {
            status: state.status,
            columns: state.table.header.iter().map(|h| h.kind).collect(),
            task_numbers: state
                .table
                .rows
                .iter()
                .map(|r| r.value(ColumnKind::TaskNum).unwrap_or_default().to_string())
                .collect(),
            upload: state.upload,
            undo_depth: store.history().undo_len(),
            redo_depth: store.history().redo_len(),
            full_width: state.gui.full_width,
        }
    }
}
