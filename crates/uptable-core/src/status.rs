//! Status enums for the table and for per-row uploads.

use serde::{Deserialize, Serialize};

/// Lifecycle of the table as a whole.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    /// Waiting for the tool catalog and project roles.
    #[default]
    Loading,
    /// Editable.
    Loaded,
    /// A batch upload is in flight.
    Uploading,
}

/// Upload status of a single row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Queued, not yet picked up by the upload driver.
    #[default]
    Waiting,
    /// Transfer in progress.
    Uploading,
    /// Upload rejected or transport failed.
    Failed,
    /// Upload accepted.
    Finished,
}

impl UploadStatus {
    /// Returns true if no further events are expected for the row.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Finished)
    }

    /// Returns true if the row is still queued or transferring.
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }
}

/// Task status values offered by the `task_status` column.
pub const TASK_STATUSES: [&str; 7] = [
    "draft",
    "free",
    "busy",
    "pause",
    "finished",
    "failed",
    "postponed",
];
