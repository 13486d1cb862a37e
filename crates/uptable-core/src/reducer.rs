//! Action-to-transition dispatch.

use tracing::{debug, warn};

use crate::action::Action;
use crate::error::CoreError;
use crate::focus::{self, Direction};
use crate::layout::recompute_widths;
use crate::state::TableState;
use crate::status::TableStatus;
use crate::{table, upload};

/// Compute the state that follows `state` after `action`.
///
/// `state` is never modified; the result is a distinct value. Fails only when
/// an action references a column kind missing from the option catalog.
/// `Undo` and `Redo` only clear focus here; stepping through history is the
/// job of [`Store`](crate::store::Store).
pub fn transition(state: &TableState, action: &Action) -> Result<TableState, CoreError> {
    let kind = action.kind();
    debug!(action = %kind, "Applying action");

    let mut next = state.clone();

    if kind.changes_row_set() && next.status == TableStatus::Uploading {
        warn!(action = %kind, "Rows are locked while an upload is active");
        return Ok(next);
    }

    match action {
        Action::Initialize => {
            next.status = TableStatus::Loading;
        }
        Action::InitializeSuccess {
            tools,
            project_roles,
            viewport_width,
        } => {
            table::initialize(&mut next, tools.clone(), project_roles.clone(), *viewport_width)?;
        }
        Action::InitializeError { message } => {
            warn!(error = %message, "Initialization failed");
            next.last_error = Some(message.clone());
        }
        Action::AddRow => table::add_row(&mut next),
        Action::RemoveSelectedRow => match next.table.selected.row {
            Some(index) => table::remove_row(&mut next, index),
            None => debug!("No row selected"),
        },
        Action::AddColumn {
            kind,
            viewport_width,
        } => table::add_column(&mut next, *kind, *viewport_width)?,
        Action::RemoveSelectedColumn { viewport_width } => match next.table.selected.column {
            Some(index) => table::remove_column(&mut next, index, *viewport_width),
            None => debug!("No column selected"),
        },
        Action::SelectColumn { index } => focus::select_column(&mut next, *index),
        Action::SelectRow { index } => focus::select_row(&mut next, *index),
        Action::UpdateColumnWidth { viewport_width } => recompute_widths(&mut next, *viewport_width),
        Action::ChangeCell { cell, row, column } => {
            table::change_cell(&mut next, cell.clone(), *row, *column)
        }
        Action::ChangeRow { row, index } => table::change_row(&mut next, (**row).clone(), *index),
        Action::ClickCell { cell, row, column } => {
            debug!(kind = %cell.kind, row, column, "Cell clicked");
            focus::click_cell(&mut next, *row, *column);
        }
        Action::FocusRight => focus::move_focus(&mut next, Direction::Right),
        Action::FocusBelow => focus::move_focus(&mut next, Direction::Down),
        Action::FocusLeft => focus::move_focus(&mut next, Direction::Left),
        Action::FocusAbove => focus::move_focus(&mut next, Direction::Up),
        Action::SetVerticalScroll { enabled } => next.gui.vertical_scroll_enabled = *enabled,
        Action::ImportRows { file_groups } => table::import_rows(&mut next, file_groups),
        Action::StartUpload => upload::start_upload(&mut next),
        Action::UploadBatchFinished => upload::finish_batch(&mut next),
        Action::CancelUpload => upload::cancel_batch(&mut next),
        Action::UploadTaskStart {
            project_id, index, ..
        } => {
            debug!(project_id = %project_id, index, "Upload started");
            upload::task_started(&mut next, *index);
        }
        Action::UploadTaskProgress { index, progress } => {
            upload::task_progress(&mut next, *index, *progress)
        }
        Action::UploadTaskFailed { index, error, .. } => {
            upload::task_failed(&mut next, *index, error)
        }
        Action::UploadTaskSuccess { index, .. } => upload::task_succeeded(&mut next, *index),
        Action::RetryFailedUploads => upload::retry_failed(&mut next),
        Action::Undo | Action::Redo => focus::clear_focus(&mut next),
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Cell, CellContext};
    use crate::column::ColumnKind;
    use crate::row::FileGroup;
    use crate::state::Selection;

    fn init() -> TableState {
        let action = Action::InitializeSuccess {
            tools: vec![],
            project_roles: vec![],
            viewport_width: 1280.0,
        };
        transition(&TableState::default(), &action).unwrap()
    }

    fn run(state: &TableState, actions: &[Action]) -> TableState {
        actions
            .iter()
            .fold(state.clone(), |s, a| transition(&s, a).unwrap())
    }

    #[test]
    fn test_initialize_scenario() {
        let state = init();
        assert_eq!(state.status, TableStatus::Loaded);
        assert_eq!(state.table.header.len(), 5);
        assert_eq!(state.table.rows.len(), 1);
        assert_eq!(state.table.rows[0].value(ColumnKind::TaskNum), Some("1"));
    }

    #[test]
    fn test_transition_leaves_input_untouched() {
        let state = init();
        let snapshot = state.clone();
        let next = transition(&state, &Action::AddRow).unwrap();
        assert_eq!(state, snapshot);
        assert_eq!(next.table.rows.len(), 2);
        assert_eq!(next.table.rows[1].value(ColumnKind::TaskNum), Some("2"));
    }

    #[test]
    fn test_add_column_scenario() {
        let state = run(
            &init(),
            &[
                Action::AddRow,
                Action::AddColumn {
                    kind: ColumnKind::TaskWorkerUsername,
                    viewport_width: 1280.0,
                },
            ],
        );
        assert_eq!(state.table.header.len(), 6);
        for row in &state.table.rows {
            assert_eq!(row.cells.len(), 6);
            assert_eq!(row.cells[5].kind, ColumnKind::TaskWorkerUsername);
            assert_eq!(row.cells[5].value, "");
        }
        assert!(!state
            .gui
            .additional_columns
            .contains(&ColumnKind::TaskWorkerUsername));
    }

    #[test]
    fn test_add_column_missing_option_is_fatal() {
        let mut state = init();
        state.table.column_options.clear();
        let action = Action::AddColumn {
            kind: ColumnKind::TaskCode,
            viewport_width: 1280.0,
        };
        assert_eq!(
            transition(&state, &action).unwrap_err(),
            CoreError::ColumnOptionNotFound(ColumnKind::TaskCode)
        );
    }

    #[test]
    fn test_remove_without_selection_is_noop() {
        let state = init();
        assert_eq!(transition(&state, &Action::RemoveSelectedRow).unwrap(), state);
        let action = Action::RemoveSelectedColumn {
            viewport_width: 1280.0,
        };
        assert_eq!(transition(&state, &action).unwrap(), state);
    }

    #[test]
    fn test_remove_selected_row() {
        let state = run(
            &init(),
            &[Action::AddRow, Action::SelectRow { index: 0 }, Action::RemoveSelectedRow],
        );
        assert_eq!(state.table.rows.len(), 1);
        assert_eq!(state.table.rows[0].value(ColumnKind::TaskNum), Some("2"));
        assert_eq!(state.table.selected, Selection::row(0));
    }

    #[test]
    fn test_remove_selected_column_respects_guard() {
        let state = run(
            &init(),
            &[
                Action::AddColumn {
                    kind: ColumnKind::TaskCode,
                    viewport_width: 1280.0,
                },
                Action::AddColumn {
                    kind: ColumnKind::TaskComment,
                    viewport_width: 1280.0,
                },
                Action::SelectColumn { index: 5 },
            ],
        );
        let remove = Action::RemoveSelectedColumn {
            viewport_width: 1280.0,
        };
        assert_eq!(transition(&state, &remove).unwrap(), state);

        let state = run(&state, &[Action::SelectColumn { index: 6 }, remove]);
        assert_eq!(state.table.header.len(), 6);
        assert!(state.table.is_rectangular());
        assert!(state.gui.additional_columns.contains(&ColumnKind::TaskComment));
    }

    #[test]
    fn test_update_column_width() {
        let state = run(
            &init(),
            &[Action::UpdateColumnWidth {
                viewport_width: 1507.0,
            }],
        );
        let widths: Vec<_> = state.table.header.iter().map(|h| h.style.width).collect();
        assert_eq!(widths, vec![100.0, 400.0, 400.0, 400.0, 150.0]);
        for (cell, width) in state.table.rows[0].cells.iter().zip(&widths) {
            assert_eq!(cell.style.width, *width);
        }
        assert_eq!(state.gui.full_width, 40.0 + 1450.0);
    }

    #[test]
    fn test_rows_locked_during_upload() {
        let state = run(&init(), &[Action::StartUpload]);
        assert_eq!(transition(&state, &Action::AddRow).unwrap(), state);
        let import = Action::ImportRows {
            file_groups: vec![FileGroup {
                name: "late".to_string(),
                files: vec![],
            }],
        };
        assert_eq!(transition(&state, &import).unwrap(), state);
    }

    #[test]
    fn test_upload_sum_invariant_over_events() {
        let row = Box::new(init().table.rows[0].clone());
        let mut state = run(&init(), &[Action::AddRow, Action::AddRow, Action::StartUpload]);
        let events = [
            Action::UploadTaskStart {
                project_id: "p1".to_string(),
                index: 0,
                row: row.clone(),
            },
            Action::UploadTaskStart {
                project_id: "p1".to_string(),
                index: 1,
                row: row.clone(),
            },
            Action::UploadTaskProgress {
                index: 0,
                progress: Some(50),
            },
            Action::UploadTaskFailed {
                index: 0,
                row: row.clone(),
                error: "500".to_string(),
            },
            Action::UploadTaskSuccess {
                index: 1,
                row: row.clone(),
                result: serde_json::Value::Null,
            },
            Action::UploadTaskSuccess {
                index: 1,
                row: row.clone(),
                result: serde_json::Value::Null,
            },
            Action::RetryFailedUploads,
            Action::UploadTaskStart {
                project_id: "p1".to_string(),
                index: 0,
                row,
            },
        ];
        for event in &events {
            state = transition(&state, event).unwrap();
            assert_eq!(state.upload.unwrap().total(), 3, "after {}", event.kind());
        }
        let agg = state.upload.unwrap();
        assert_eq!((agg.running, agg.waiting, agg.failed, agg.finished), (1, 1, 0, 1));
    }

    #[test]
    fn test_click_and_focus_navigation() {
        let cell = Cell::new(ColumnKind::TaskStatus, "", CellContext::FreeText);
        let state = run(
            &init(),
            &[
                Action::AddRow,
                Action::SelectRow { index: 1 },
                Action::ClickCell {
                    cell,
                    row: 0,
                    column: 4,
                },
                Action::FocusRight,
            ],
        );
        assert!(state.table.selected.is_empty());
        assert_eq!(state.focused_cells().len(), 1);
        assert_eq!(state.gui.last_focused_cell.map(|p| (p.row, p.column)), Some((1, 0)));

        let state = run(&state, &[Action::FocusLeft, Action::FocusAbove]);
        assert_eq!(state.gui.last_focused_cell.map(|p| (p.row, p.column)), Some((1, 4)));
    }

    #[test]
    fn test_initialize_error_and_scroll() {
        let state = run(
            &TableState::default(),
            &[
                Action::Initialize,
                Action::InitializeError {
                    message: "roles unavailable".to_string(),
                },
                Action::SetVerticalScroll { enabled: true },
            ],
        );
        assert_eq!(state.status, TableStatus::Loading);
        assert_eq!(state.last_error.as_deref(), Some("roles unavailable"));
        assert!(state.gui.vertical_scroll_enabled);
    }
}
