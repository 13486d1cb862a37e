//! Tool catalog supplied at initialization.

use serde::{Deserialize, Serialize};

use crate::cell::ContextOption;

/// What a tool can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Task types this tool accepts.
    #[serde(default)]
    pub supported_task_types: Vec<String>,
}

/// A named tool configuration, referenced by `task_config_label` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Configuration label.
    pub name: String,

    pub tool: ToolSpec,
}

impl ToolConfig {
    /// Create a new ToolConfig with no supported task types.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool: ToolSpec::default(),
        }
    }

    /// Builder method to add a supported task type.
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.tool.supported_task_types.push(task_type.into());
        self
    }
}

/// Options for a `task_type` cell whose row points at `label`.
///
/// Empty when no tool carries that label.
pub fn task_type_options(tools: &[ToolConfig], label: &str) -> Vec<ContextOption> {
    tools
        .iter()
        .find(|t| t.name == label)
        .map(|t| {
            t.tool
                .supported_task_types
                .iter()
                .map(|tt| ContextOption::same(tt.as_str()))
                .collect()
        })
        .unwrap_or_default()
}

/// Options for `task_config_label` cells: one per tool.
pub fn config_label_options(tools: &[ToolConfig]) -> Vec<ContextOption> {
    tools
        .iter()
        .map(|t| ContextOption::same(t.name.as_str()))
        .collect()
}
