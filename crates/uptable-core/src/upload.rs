//! Batch upload bookkeeping.
//!
//! The upload driver runs outside the engine and reports each row's lifecycle
//! as discrete events. Counters move in lock-step with those events so that
//! `running + waiting + failed + finished` always equals the row count.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::row::RowUpload;
use crate::state::TableState;
use crate::status::{TableStatus, UploadStatus};

/// Running tally of a batch upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadAggregate {
    pub running: usize,
    pub waiting: usize,
    pub failed: usize,
    pub finished: usize,
}

impl UploadAggregate {
    /// Batch of `rows` rows, all waiting.
    pub fn new(rows: usize) -> Self {
        Self {
            waiting: rows,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.running + self.waiting + self.failed + self.finished
    }

    /// Returns true once no row is waiting or running.
    pub fn is_settled(&self) -> bool {
        self.running == 0 && self.waiting == 0
    }
}

/// Upload state of the row at `index`, if a batch is active and the row exists.
fn batch_row(state: &TableState, index: usize, event: &'static str) -> Option<RowUpload> {
    if state.upload.is_none() {
        warn!(event, index, "Upload event without an active batch");
        return None;
    }
    match state.table.rows.get(index) {
        Some(row) => Some(row.upload.clone().unwrap_or_else(RowUpload::waiting)),
        None => {
            warn!(event, index, "Upload event for unknown row");
            None
        }
    }
}

/// Open a batch covering every row.
pub fn start_upload(state: &mut TableState) {
    if state.upload.is_some() {
        warn!("Upload batch already active");
        return;
    }
    state.status = TableStatus::Uploading;
    state.upload = Some(UploadAggregate::new(state.row_count()));
    for row in &mut state.table.rows {
        row.upload = Some(RowUpload::waiting());
    }
    info!(rows = state.row_count(), "Upload batch started");
}

/// The driver picked up the row at `index`.
///
/// Only rows still waiting, or re-queued by a retry, can start. A repeated
/// start for a running row is ignored.
pub fn task_started(state: &mut TableState, index: usize) {
    let Some(row) = batch_row(state, index, "start") else {
        return;
    };
    let Some(upload) = state.upload.as_mut() else {
        return;
    };
    let queued = row.status == UploadStatus::Waiting || row.requeued;
    if !queued || upload.waiting == 0 {
        warn!(index, status = ?row.status, "Row is not waiting for upload");
        return;
    }
    upload.waiting -= 1;
    upload.running += 1;
    state.table.rows[index].upload = Some(RowUpload::uploading(0));
}

/// Transfer progress for the row at `index`. Counters do not change.
pub fn task_progress(state: &mut TableState, index: usize, progress: Option<u8>) {
    let Some(progress) = progress else {
        return;
    };
    let Some(row) = batch_row(state, index, "progress") else {
        return;
    };
    if !row.is_running() {
        warn!(index, status = ?row.status, "Progress for a row that is not uploading");
        return;
    }
    state.table.rows[index].upload = Some(RowUpload::uploading(progress));
}

/// The upload of the row at `index` failed.
pub fn task_failed(state: &mut TableState, index: usize, error: &str) {
    if let Some(upload) = settle(state, index, "failed") {
        upload.running -= 1;
        upload.failed += 1;
        state.table.rows[index].upload = Some(RowUpload::failed(error));
    }
}

/// The upload of the row at `index` succeeded.
pub fn task_succeeded(state: &mut TableState, index: usize) {
    if let Some(upload) = settle(state, index, "success") {
        upload.running -= 1;
        upload.finished += 1;
        state.table.rows[index].upload = Some(RowUpload::finished());
    }
}

fn settle<'a>(
    state: &'a mut TableState,
    index: usize,
    event: &'static str,
) -> Option<&'a mut UploadAggregate> {
    let row = batch_row(state, index, event)?;
    let upload = state.upload.as_mut()?;
    if !row.is_running() || upload.running == 0 {
        warn!(event, index, status = ?row.status, "Row is not uploading");
        return None;
    }
    Some(upload)
}

/// Queue every failed row again.
///
/// Rows restart as `uploading` at 0% while the aggregate counts them as
/// waiting. They stay flagged as re-queued until their next start event.
pub fn retry_failed(state: &mut TableState) {
    let Some(upload) = state.upload.as_mut() else {
        warn!("Retry without an active batch");
        return;
    };
    upload.waiting += upload.failed;
    upload.failed = 0;
    for row in &mut state.table.rows {
        if row.upload_status() == Some(UploadStatus::Failed) {
            row.upload = Some(RowUpload::requeued());
        }
    }
}

/// The driver reported the batch complete.
pub fn finish_batch(state: &mut TableState) {
    if let Some(upload) = state.upload.take() {
        if !upload.is_settled() {
            warn!(
                running = upload.running,
                waiting = upload.waiting,
                "Batch finished with unsettled rows"
            );
        }
        info!(
            finished = upload.finished,
            failed = upload.failed,
            "Upload batch finished"
        );
    }
    state.status = TableStatus::Loaded;
}

/// The driver acknowledged cancellation. Rows that never settled lose their upload state.
pub fn cancel_batch(state: &mut TableState) {
    if state.upload.take().is_none() {
        warn!("Cancel without an active batch");
        return;
    }
    for row in &mut state.table.rows {
        if row.upload_status().is_some_and(|s| s.is_pending()) {
            row.upload = None;
        }
    }
    state.status = TableStatus::Loaded;
    info!("Upload batch cancelled");
}
