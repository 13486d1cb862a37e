//! Column kinds and the column-option catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellContext, ContextOption};
use crate::error::CoreError;
use crate::status::TASK_STATUSES;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    TaskNum,
    TaskType,
    TaskStatus,
    TaskConfigLabel,
    TaskInputs,
    TaskWorkerUsername,
    TaskOutputs,
    #[serde(rename = "task_nexttask")]
    TaskNextTask,
    TaskUseOutputsFromTask,
    TaskPid,
    TaskCode,
    TaskComment,
}

/// Built-in columns in header order. These can never be removed.
pub const STATIC_COLUMNS: [ColumnKind; 5] = [
    ColumnKind::TaskNum,
    ColumnKind::TaskInputs,
    ColumnKind::TaskConfigLabel,
    ColumnKind::TaskType,
    ColumnKind::TaskStatus,
];

/// Columns the user may add, in the order they are offered.
pub const SELECTABLE_COLUMNS: [ColumnKind; 7] = [
    ColumnKind::TaskWorkerUsername,
    ColumnKind::TaskOutputs,
    ColumnKind::TaskNextTask,
    ColumnKind::TaskUseOutputsFromTask,
    ColumnKind::TaskPid,
    ColumnKind::TaskCode,
    ColumnKind::TaskComment,
];

impl ColumnKind {
    /// Every known kind, static columns first.
    pub fn all() -> impl Iterator<Item = ColumnKind> {
        STATIC_COLUMNS.into_iter().chain(SELECTABLE_COLUMNS)
    }

    /// Key used in headers and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskNum => "task_num",
            Self::TaskType => "task_type",
            Self::TaskStatus => "task_status",
            Self::TaskConfigLabel => "task_config_label",
            Self::TaskInputs => "task_inputs",
            Self::TaskWorkerUsername => "task_worker_username",
            Self::TaskOutputs => "task_outputs",
            Self::TaskNextTask => "task_nexttask",
            Self::TaskUseOutputsFromTask => "task_use_outputs_from_task",
            Self::TaskPid => "task_pid",
            Self::TaskCode => "task_code",
            Self::TaskComment => "task_comment",
        }
    }

    /// Returns true for the built-in, non-removable columns.
    pub fn is_static(&self) -> bool {
        STATIC_COLUMNS.contains(self)
    }

    /// Returns true if cells of this kind pick their value from a list of options.
    pub fn is_enumerated(&self) -> bool {
        matches!(
            self,
            Self::TaskType | Self::TaskStatus | Self::TaskConfigLabel
        )
    }

    /// Returns true for values that must stay distinct per row, so they are
    /// never copied from a template row during import.
    pub fn is_per_row(&self) -> bool {
        matches!(
            self,
            Self::TaskNum
                | Self::TaskInputs
                | Self::TaskOutputs
                | Self::TaskNextTask
                | Self::TaskUseOutputsFromTask
        )
    }

    /// Fixed column width in pixels, if this kind has one.
    pub fn fixed_width(&self) -> Option<f64> {
        match self {
            Self::TaskNum | Self::TaskPid | Self::TaskNextTask => Some(100.0),
            Self::TaskStatus => Some(150.0),
            Self::TaskUseOutputsFromTask => Some(200.0),
            _ => None,
        }
    }

    /// Context a fresh cell of this kind starts with.
    pub fn default_context(&self) -> CellContext {
        match self {
            Self::TaskStatus => CellContext::Enumerated(
                TASK_STATUSES.iter().map(|s| ContextOption::same(*s)).collect(),
            ),
            kind if kind.is_enumerated() => CellContext::Enumerated(Vec::new()),
            _ => CellContext::FreeText,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownColumnKind(s.to_string()))
    }
}

/// Catalog entry describing the default cell shape of a column kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOption {
    /// Lookup key.
    pub name: ColumnKind,

    /// Template for new cells of this kind.
    pub cell: Cell,
}

impl ColumnOption {
    /// Create the default option for a kind.
    pub fn new(kind: ColumnKind) -> Self {
        Self {
            name: kind,
            cell: Cell::template(kind),
        }
    }
}

/// One option per known kind.
pub fn default_column_options() -> Vec<ColumnOption> {
    ColumnKind::all().map(ColumnOption::new).collect()
}

/// Find the option for `kind`.
pub fn find_option(options: &[ColumnOption], kind: ColumnKind) -> Result<&ColumnOption, CoreError> {
    options
        .iter()
        .find(|o| o.name == kind)
        .ok_or(CoreError::ColumnOptionNotFound(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_keys_round_trip() {
        for kind in ColumnKind::all() {
            assert_eq!(kind.as_str().parse::<ColumnKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "task_color".parse::<ColumnKind>().unwrap_err();
        assert_eq!(err, CoreError::UnknownColumnKind("task_color".to_string()));
    }

    #[test]
    fn test_static_and_selectable_are_disjoint() {
        for kind in SELECTABLE_COLUMNS {
            assert!(!kind.is_static());
        }
        assert_eq!(ColumnKind::all().count(), 12);
    }

    #[test]
    fn test_default_context_shape() {
        match ColumnKind::TaskStatus.default_context() {
            CellContext::Enumerated(options) => {
                assert_eq!(options.len(), 7);
                assert_eq!(options[0].label, "draft");
            }
            CellContext::FreeText => panic!("task_status must be enumerated"),
        }
        assert_eq!(
            ColumnKind::TaskType.default_context(),
            CellContext::Enumerated(Vec::new())
        );
        assert_eq!(ColumnKind::TaskComment.default_context(), CellContext::FreeText);
    }

    #[test]
    fn test_find_option_missing() {
        let options = vec![ColumnOption::new(ColumnKind::TaskNum)];
        assert!(find_option(&options, ColumnKind::TaskNum).is_ok());
        assert_eq!(
            find_option(&options, ColumnKind::TaskPid).unwrap_err(),
            CoreError::ColumnOptionNotFound(ColumnKind::TaskPid)
        );
    }
}
