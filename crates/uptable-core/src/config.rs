//! Engine configuration.

use serde::Deserialize;

use crate::row::DEFAULT_ROW_HEIGHT;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum snapshots kept on each of the undo and redo stacks.
    pub max_history: usize,

    /// Height given to every new row.
    pub row_height: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history: 100,
            row_height: DEFAULT_ROW_HEIGHT,
        }
    }
}
