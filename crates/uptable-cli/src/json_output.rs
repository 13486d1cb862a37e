//! JSON-lines event stream for `replay --json`.

use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use uptable_core::{ActionKind, TableState, TableStatus, UploadAggregate};

static JSON_MODE_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn enable_json_mode() {
    JSON_MODE_ENABLED.store(true, Ordering::SeqCst);
}

pub fn is_json_mode() -> bool {
    JSON_MODE_ENABLED.load(Ordering::SeqCst)
}

/// One replay milestone. Serialized flat, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent<'a> {
    ReplayStarted {
        session_id: &'a str,
        script: &'a str,
        actions: usize,
    },
    ActionApplied {
        line: usize,
        action: &'static str,
        undoable: bool,
        status: TableStatus,
        rows: usize,
        columns: usize,
        upload: Option<UploadAggregate>,
    },
    ReplayFinished {
        session_id: &'a str,
        applied: usize,
    },
}

impl ReplayEvent<'_> {
    /// Snapshot of `state` after the action on script line `line`.
    pub fn applied(line: usize, kind: ActionKind, state: &TableState) -> Self {
        ReplayEvent::ActionApplied {
            line,
            action: kind.as_str(),
            undoable: kind.is_undoable(),
            status: state.status,
            rows: state.row_count(),
            columns: state.table.width(),
            upload: state.upload,
        }
    }
}

#[derive(Serialize)]
struct Stamped<'e, 'a> {
    timestamp: String,
    #[serde(flatten)]
    event: &'e ReplayEvent<'a>,
}

/// Render `event` as a single JSON line stamped with the current UTC time.
pub fn to_line(event: &ReplayEvent<'_>) -> serde_json::Result<String> {
    serde_json::to_string(&Stamped {
        timestamp: chrono::Utc::now().to_rfc3339(),
        event,
    })
}

/// Write `event` to stdout when JSON mode is on.
pub fn emit(event: &ReplayEvent<'_>) {
    if !is_json_mode() {
        return;
    }
    if let Ok(line) = to_line(event) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
        let _ = stdout.flush();
    }
}
