//! Actions consumed by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::ToolConfig;
use crate::cell::Cell;
use crate::column::ColumnKind;
use crate::row::{FileGroup, Row};

/// A discrete request for a state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Catalog loading started.
    Initialize,
    InitializeSuccess {
        #[serde(default)]
        tools: Vec<ToolConfig>,
        #[serde(default)]
        project_roles: Vec<serde_json::Value>,
        viewport_width: f64,
    },
    InitializeError {
        message: String,
    },
    AddRow,
    RemoveSelectedRow,
    AddColumn {
        kind: ColumnKind,
        viewport_width: f64,
    },
    RemoveSelectedColumn {
        viewport_width: f64,
    },
    SelectColumn {
        index: usize,
    },
    SelectRow {
        index: usize,
    },
    UpdateColumnWidth {
        viewport_width: f64,
    },
    ChangeCell {
        cell: Cell,
        row: usize,
        column: usize,
    },
    ChangeRow {
        row: Box<Row>,
        index: usize,
    },
    ClickCell {
        cell: Cell,
        row: usize,
        column: usize,
    },
    FocusRight,
    FocusBelow,
    FocusLeft,
    FocusAbove,
    SetVerticalScroll {
        enabled: bool,
    },
    ImportRows {
        file_groups: Vec<FileGroup>,
    },
    StartUpload,
    /// The driver finished the whole batch.
    UploadBatchFinished,
    /// The driver acknowledged cancellation.
    CancelUpload,
    UploadTaskStart {
        project_id: String,
        index: usize,
        row: Box<Row>,
    },
    UploadTaskProgress {
        index: usize,
        #[serde(default)]
        progress: Option<u8>,
    },
    UploadTaskFailed {
        index: usize,
        row: Box<Row>,
        error: String,
    },
    UploadTaskSuccess {
        index: usize,
        row: Box<Row>,
        #[serde(default)]
        result: serde_json::Value,
    },
    RetryFailedUploads,
    Undo,
    Redo,
}

/// Payload-free discriminant of [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Initialize,
    InitializeSuccess,
    InitializeError,
    AddRow,
    RemoveSelectedRow,
    AddColumn,
    RemoveSelectedColumn,
    SelectColumn,
    SelectRow,
    UpdateColumnWidth,
    ChangeCell,
    ChangeRow,
    ClickCell,
    FocusRight,
    FocusBelow,
    FocusLeft,
    FocusAbove,
    SetVerticalScroll,
    ImportRows,
    StartUpload,
    UploadBatchFinished,
    CancelUpload,
    UploadTaskStart,
    UploadTaskProgress,
    UploadTaskFailed,
    UploadTaskSuccess,
    RetryFailedUploads,
    Undo,
    Redo,
}

impl ActionKind {
    /// Returns true if the action edits user-authored data and is recorded in history.
    pub const fn is_undoable(self) -> bool {
        match self {
            Self::AddRow
            | Self::AddColumn
            | Self::RemoveSelectedRow
            | Self::RemoveSelectedColumn
            | Self::ChangeCell
            | Self::ChangeRow
            | Self::ImportRows => true,
            Self::Initialize
            | Self::InitializeSuccess
            | Self::InitializeError
            | Self::SelectColumn
            | Self::SelectRow
            | Self::UpdateColumnWidth
            | Self::ClickCell
            | Self::FocusRight
            | Self::FocusBelow
            | Self::FocusLeft
            | Self::FocusAbove
            | Self::SetVerticalScroll
            | Self::StartUpload
            | Self::UploadBatchFinished
            | Self::CancelUpload
            | Self::UploadTaskStart
            | Self::UploadTaskProgress
            | Self::UploadTaskFailed
            | Self::UploadTaskSuccess
            | Self::RetryFailedUploads
            | Self::Undo
            | Self::Redo => false,
        }
    }

    /// Returns true if the action adds, removes or rebuilds rows.
    pub const fn changes_row_set(self) -> bool {
        matches!(
            self,
            Self::AddRow | Self::RemoveSelectedRow | Self::ImportRows | Self::InitializeSuccess
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::InitializeSuccess => "initialize_success",
            Self::InitializeError => "initialize_error",
            Self::AddRow => "add_row",
            Self::RemoveSelectedRow => "remove_selected_row",
            Self::AddColumn => "add_column",
            Self::RemoveSelectedColumn => "remove_selected_column",
            Self::SelectColumn => "select_column",
            Self::SelectRow => "select_row",
            Self::UpdateColumnWidth => "update_column_width",
            Self::ChangeCell => "change_cell",
            Self::ChangeRow => "change_row",
            Self::ClickCell => "click_cell",
            Self::FocusRight => "focus_right",
            Self::FocusBelow => "focus_below",
            Self::FocusLeft => "focus_left",
            Self::FocusAbove => "focus_above",
            Self::SetVerticalScroll => "set_vertical_scroll",
            Self::ImportRows => "import_rows",
            Self::StartUpload => "start_upload",
            Self::UploadBatchFinished => "upload_batch_finished",
            Self::CancelUpload => "cancel_upload",
            Self::UploadTaskStart => "upload_task_start",
            Self::UploadTaskProgress => "upload_task_progress",
            Self::UploadTaskFailed => "upload_task_failed",
            Self::UploadTaskSuccess => "upload_task_success",
            Self::RetryFailedUploads => "retry_failed_uploads",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Initialize => ActionKind::Initialize,
            Self::InitializeSuccess { .. } => ActionKind::InitializeSuccess,
            Self::InitializeError { .. } => ActionKind::InitializeError,
            Self::AddRow => ActionKind::AddRow,
            Self::RemoveSelectedRow => ActionKind::RemoveSelectedRow,
            Self::AddColumn { .. } => ActionKind::AddColumn,
            Self::RemoveSelectedColumn { .. } => ActionKind::RemoveSelectedColumn,
            Self::SelectColumn { .. } => ActionKind::SelectColumn,
            Self::SelectRow { .. } => ActionKind::SelectRow,
            Self::UpdateColumnWidth { .. } => ActionKind::UpdateColumnWidth,
            Self::ChangeCell { .. } => ActionKind::ChangeCell,
            Self::ChangeRow { .. } => ActionKind::ChangeRow,
            Self::ClickCell { .. } => ActionKind::ClickCell,
            Self::FocusRight => ActionKind::FocusRight,
            Self::FocusBelow => ActionKind::FocusBelow,
            Self::FocusLeft => ActionKind::FocusLeft,
            Self::FocusAbove => ActionKind::FocusAbove,
            Self::SetVerticalScroll { .. } => ActionKind::SetVerticalScroll,
            Self::ImportRows { .. } => ActionKind::ImportRows,
            Self::StartUpload => ActionKind::StartUpload,
            Self::UploadBatchFinished => ActionKind::UploadBatchFinished,
            Self::CancelUpload => ActionKind::CancelUpload,
            Self::UploadTaskStart { .. } => ActionKind::UploadTaskStart,
            Self::UploadTaskProgress { .. } => ActionKind::UploadTaskProgress,
            Self::UploadTaskFailed { .. } => ActionKind::UploadTaskFailed,
            Self::UploadTaskSuccess { .. } => ActionKind::UploadTaskSuccess,
            Self::RetryFailedUploads => ActionKind::RetryFailedUploads,
            Self::Undo => ActionKind::Undo,
            Self::Redo => ActionKind::Redo,
        }
    }

    pub fn is_undoable(&self) -> bool {
        self.kind().is_undoable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undoable_allow_list() {
        let undoable = [
            Action::AddRow,
            Action::RemoveSelectedRow,
            Action::AddColumn {
                kind: ColumnKind::TaskPid,
                viewport_width: 800.0,
            },
            Action::RemoveSelectedColumn {
                viewport_width: 800.0,
            },
            Action::ImportRows {
                file_groups: vec![],
            },
        ];
        for action in &undoable {
            assert!(action.is_undoable(), "{} should be undoable", action.kind());
        }

        let transient = [
            Action::SelectRow { index: 0 },
            Action::FocusRight,
            Action::UpdateColumnWidth {
                viewport_width: 800.0,
            },
            Action::StartUpload,
            Action::UploadTaskProgress {
                index: 0,
                progress: Some(5),
            },
            Action::Undo,
        ];
        for action in &transient {
            assert!(!action.is_undoable(), "{} should not be undoable", action.kind());
        }
    }

    #[test]
    fn test_row_set_actions() {
        assert!(ActionKind::AddRow.changes_row_set());
        assert!(ActionKind::ImportRows.changes_row_set());
        assert!(ActionKind::InitializeSuccess.changes_row_set());
        assert!(!ActionKind::ChangeRow.changes_row_set());
        assert!(!ActionKind::AddColumn.changes_row_set());
    }

    #[test]
    fn test_action_json_tag_matches_kind() {
        let action: Action = serde_json::from_str(
            r#"{ "type": "add_column", "kind": "task_worker_username", "viewport_width": 1280 }"#,
        )
        .unwrap();
        assert_eq!(action.kind(), ActionKind::AddColumn);

        let json = serde_json::to_value(&Action::RetryFailedUploads).unwrap();
        assert_eq!(json["type"], ActionKind::RetryFailedUploads.as_str());

        let progress: Action =
            serde_json::from_str(r#"{ "type": "upload_task_progress", "index": 2 }"#).unwrap();
        assert_eq!(
            progress,
            Action::UploadTaskProgress {
                index: 2,
                progress: None
            }
        );
    }
}
