//! Rows and their task payload.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::ColumnKind;
use crate::status::UploadStatus;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RowStyle {
    pub height: f64,
}

impl Default for RowStyle {
    fn default() -> Self {
        Self {
            height: DEFAULT_ROW_HEIGHT,
        }
    }
}

/// Free-form task record that accompanies a row to the upload driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,

    /// File descriptors attached by an import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<serde_json::Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<serde_json::Value>>,
}

/// Upload bookkeeping for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowUpload {
    pub status: UploadStatus,

    /// Percentage, 0..=100.
    pub progress: u8,

    /// Failure reported by the upload driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Set by a retry until the driver picks the row up again.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requeued: bool,
}

impl RowUpload {
    pub fn waiting() -> Self {
        Self {
            status: UploadStatus::Waiting,
            progress: 0,
            error: None,
            requeued: false,
        }
    }

    pub fn uploading(progress: u8) -> Self {
        Self {
            status: UploadStatus::Uploading,
            progress: progress.min(100),
            error: None,
            requeued: false,
        }
    }

    /// A failed row queued again: shown as uploading at 0% but not yet running.
    pub fn requeued() -> Self {
        Self {
            requeued: true,
            ..Self::uploading(0)
        }
    }

    /// Returns true if the driver is currently transferring this row.
    pub fn is_running(&self) -> bool {
        self.status == UploadStatus::Uploading && !self.requeued
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: UploadStatus::Failed,
            progress: 0,
            error: Some(error.into()),
            requeued: false,
        }
    }

    pub fn finished() -> Self {
        Self {
            status: UploadStatus::Finished,
            progress: 100,
            error: None,
            requeued: false,
        }
    }
}

/// A staged record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// One cell per header column.
    pub cells: Vec<Cell>,

    #[serde(default)]
    pub style: RowStyle,

    #[serde(default, rename = "task_payload")]
    pub task: TaskPayload,

    #[serde(default)]
    pub upload: Option<RowUpload>,
}

impl Row {
    /// Create a row from its cells.
    pub fn new(cells: Vec<Cell>, height: f64) -> Self {
        Self {
            cells,
            style: RowStyle { height },
            task: TaskPayload::default(),
            upload: None,
        }
    }

    /// Index of the first cell of `kind`.
    pub fn position(&self, kind: ColumnKind) -> Option<usize> {
        self.cells.iter().position(|c| c.kind == kind)
    }

    /// Value of the first cell of `kind`.
    pub fn value(&self, kind: ColumnKind) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.kind == kind)
            .map(|c| c.value.as_str())
    }

    /// Upload status, if the row belongs to a batch.
    pub fn upload_status(&self) -> Option<UploadStatus> {
        self.upload.as_ref().map(|u| u.status)
    }

    /// Set `selected` on every cell.
    pub fn set_selected(&mut self, selected: bool) {
        for cell in &mut self.cells {
            cell.selected = selected;
        }
    }
}

/// A group of dropped files that becomes one imported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileGroup {
    pub name: String,
    pub files: Vec<serde_json::Value>,
}
