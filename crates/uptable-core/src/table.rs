//! Row, column and cell operations on the table model.
//!
//! Every function here mutates a state the reducer owns exclusively. Index
//! arguments are bounds-checked; an out-of-range index leaves the state as it
//! was and logs a warning. Only a missing column option is reported as an
//! error.

use tracing::{debug, info, warn};

use crate::catalog::{config_label_options, task_type_options, ToolConfig};
use crate::cell::{Cell, CellContext, ContextOption};
use crate::column::{find_option, ColumnKind};
use crate::error::CoreError;
use crate::layout::recompute_widths;
use crate::row::{FileGroup, Row};
use crate::state::{CellPosition, GuiState, Selection, Table, TableState};
use crate::status::TableStatus;

/// Label of the context entry used when a row has no `task_type` cell.
pub const MISSING_TASK_TYPE_LABEL: &str = "Missing task_config_label";

/// Reset the table to its static columns and a single row.
pub fn initialize(
    state: &mut TableState,
    tools: Vec<ToolConfig>,
    project_roles: Vec<serde_json::Value>,
    viewport_width: f64,
) -> Result<(), CoreError> {
    let mut table = Table::new(state.table.row_height);
    table.task_num_counter = 1;
    table.header = table
        .static_columns
        .iter()
        .map(|kind| {
            let context = find_option(&table.column_options, *kind)
                .map(|o| o.cell.context.clone())
                .unwrap_or_else(|_| kind.default_context());
            Cell::header(*kind, context)
        })
        .collect();

    let labels = config_label_options(&tools);
    state.table = table;
    state.gui = GuiState {
        vertical_scroll_enabled: state.gui.vertical_scroll_enabled,
        ..GuiState::default()
    };
    state.upload = None;
    state.tools = tools;
    state.project_roles = project_roles;
    state.last_error = None;

    update_context(state, ColumnKind::TaskConfigLabel, labels)?;
    add_row(state);
    recompute_widths(state, viewport_width);
    state.status = TableStatus::Loaded;

    info!(
        tools = state.tools.len(),
        project_roles = state.project_roles.len(),
        columns = state.table.header.len(),
        "Table initialized"
    );
    Ok(())
}

/// Replace the enumerated context of a column option and of every cell of that kind.
pub fn update_context(
    state: &mut TableState,
    kind: ColumnKind,
    options: Vec<ContextOption>,
) -> Result<(), CoreError> {
    let index = state
        .table
        .column_options
        .iter()
        .position(|o| o.name == kind)
        .ok_or(CoreError::ColumnOptionNotFound(kind))?;

    let context = CellContext::Enumerated(options);
    state.table.column_options[index].cell.context = context.clone();

    let header = state.table.header.iter_mut();
    let cells = state.table.rows.iter_mut().flat_map(|r| r.cells.iter_mut());
    for cell in header.chain(cells).filter(|c| c.kind == kind) {
        cell.context = context.clone();
    }
    Ok(())
}

/// Build a row matching the current header, numbered `task_num`.
pub fn build_row(state: &TableState, task_num: u64) -> Row {
    let table = &state.table;
    let cells = table
        .header
        .iter()
        .map(|h| {
            let context = find_option(&table.column_options, h.kind)
                .map(|o| o.cell.context.clone())
                .unwrap_or_else(|_| h.kind.default_context());
            let value = if h.kind == ColumnKind::TaskNum {
                task_num.to_string()
            } else {
                String::new()
            };
            Cell::new(h.kind, value, context).with_width(h.style.width)
        })
        .collect();
    Row::new(cells, table.row_height)
}

/// Append a new row numbered with the current counter, then advance the counter.
pub fn add_row(state: &mut TableState) {
    let task_num = state.table.task_num_counter;
    let row = build_row(state, task_num);
    state.table.rows.push(row);
    state.table.task_num_counter += 1;
}

/// Delete the row at `index` and select whichever row takes its place.
pub fn remove_row(state: &mut TableState, index: usize) {
    if index >= state.table.rows.len() {
        warn!(index, rows = state.table.rows.len(), "Row index out of range");
        return;
    }

    let table = &mut state.table;
    table.rows.remove(index);
    for row in &mut table.rows {
        row.set_selected(false);
    }

    if table.rows.is_empty() {
        table.selected = Selection::none();
    } else {
        let next = index.min(table.rows.len() - 1);
        table.selected = Selection::row(next);
        table.rows[next].set_selected(true);
    }

    state.gui.last_focused_cell = match state.gui.last_focused_cell {
        Some(pos) if pos.row == index => None,
        Some(pos) if pos.row > index => Some(CellPosition::new(pos.row - 1, pos.column)),
        other => other,
    };
}

/// Append a column of `kind` to the header and to every row.
///
/// Fails when the column-option catalog has no entry for `kind`.
pub fn add_column(
    state: &mut TableState,
    kind: ColumnKind,
    viewport_width: f64,
) -> Result<(), CoreError> {
    let template = find_option(&state.table.column_options, kind)?.cell.clone();

    if state.table.header.iter().any(|h| h.kind == kind) {
        warn!(kind = %kind, "Column already present");
        return Ok(());
    }

    state
        .table
        .header
        .push(Cell::header(kind, template.context.clone()).with_width(template.style.width));
    for row in &mut state.table.rows {
        row.cells.push(
            Cell::new(kind, "", template.context.clone()).with_width(template.style.width),
        );
    }
    state.gui.additional_columns.retain(|k| *k != kind);

    recompute_widths(state, viewport_width);
    Ok(())
}

/// Delete the column at `index` unless it is one of the built-in columns.
///
/// Only indices beyond the count of static columns are removable. The column
/// that moves into `index` becomes the selection, if there is one.
pub fn remove_column(state: &mut TableState, index: usize, viewport_width: f64) {
    let Some(kind) = state.table.column_kind(index) else {
        warn!(index, columns = state.table.width(), "Column index out of range");
        return;
    };
    if index <= state.table.static_columns.len() || state.table.static_columns.contains(&kind) {
        debug!(index, kind = %kind, "Column is not removable");
        return;
    }

    let table = &mut state.table;
    table.header.remove(index);
    for row in &mut table.rows {
        row.cells.remove(index);
        row.set_selected(false);
    }

    if index < table.header.len() {
        table.selected = Selection::column(index);
        for row in &mut table.rows {
            row.cells[index].selected = true;
        }
    } else {
        table.selected = Selection::none();
    }

    if !state.gui.additional_columns.contains(&kind) {
        state.gui.additional_columns.push(kind);
    }
    state.gui.last_focused_cell = match state.gui.last_focused_cell {
        Some(pos) if pos.column == index => None,
        Some(pos) if pos.column > index => Some(CellPosition::new(pos.row, pos.column - 1)),
        other => other,
    };

    recompute_widths(state, viewport_width);
}

/// Replace the cell at (`row`, `column`).
///
/// Changing a `task_config_label` cell also refreshes the options of the
/// row's `task_type` cell from the tool catalog.
pub fn change_cell(state: &mut TableState, mut cell: Cell, row: usize, column: usize) {
    let Some(kind) = state.table.column_kind(column) else {
        warn!(column, "Column index out of range");
        return;
    };
    if row >= state.table.rows.len() {
        warn!(row, "Row index out of range");
        return;
    }
    if cell.kind != kind || !cell.context.fits(cell.kind) {
        warn!(expected = %kind, got = %cell.kind, "Cell does not match its column");
        return;
    }

    if cell.kind == ColumnKind::TaskConfigLabel {
        let options = task_type_options(&state.tools, &cell.value);
        let target = &mut state.table.rows[row];
        match target.position(ColumnKind::TaskType) {
            Some(i) => target.cells[i].context = CellContext::Enumerated(options),
            None => {
                cell.context =
                    CellContext::Enumerated(vec![ContextOption::new(MISSING_TASK_TYPE_LABEL, "")])
            }
        }
    }

    state.table.rows[row].cells[column] = cell;
}

/// Replace the cells, style and payload of the row at `index`.
///
/// Upload state is reported only by the upload driver, so the stored row keeps its own.
pub fn change_row(state: &mut TableState, mut row: Row, index: usize) {
    if index >= state.row_count() {
        warn!(index, "Row index out of range");
        return;
    }
    let matches_header = row.cells.len() == state.table.width()
        && row
            .cells
            .iter()
            .zip(&state.table.header)
            .all(|(c, h)| c.kind == h.kind);
    if !matches_header {
        warn!(index, cells = row.cells.len(), "Row does not match the header");
        return;
    }
    let target = &mut state.table.rows[index];
    row.upload = target.upload.take();
    *target = row;
}

/// Append one row per file group.
///
/// When a row is selected, every cell that is not per-row data copies its
/// value and context from the selected row.
pub fn import_rows(state: &mut TableState, file_groups: &[FileGroup]) {
    let template = state
        .table
        .selected
        .row
        .and_then(|r| state.table.rows.get(r))
        .cloned();

    let mut imported = Vec::with_capacity(file_groups.len());
    for group in file_groups {
        let task_num = state.table.task_num_counter;
        let mut row = build_row(state, task_num);
        state.table.task_num_counter += 1;

        if let Some(origin) = &template {
            for (cell, source) in row.cells.iter_mut().zip(&origin.cells) {
                if !cell.kind.is_per_row() {
                    cell.value = source.value.clone();
                    cell.context = source.context.clone();
                }
            }
        }
        row.task.inputs = Some(group.files.clone());
        debug!(group = %group.name, files = group.files.len(), task_num, "Imported file group");
        imported.push(row);
    }
    state.table.rows.extend(imported);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::STATIC_COLUMNS;
    use crate::row::RowUpload;

    fn initialized() -> TableState {
        let mut state = TableState::default();
        let tools = vec![ToolConfig::new("ocr-default")
            .with_task_type("ocr")
            .with_task_type("layout")];
        initialize(&mut state, tools, vec![], 1280.0).unwrap();
        state
    }

    #[test]
    fn test_initialize_static_layout() {
        let state = initialized();
        assert_eq!(state.status, TableStatus::Loaded);
        let kinds: Vec<_> = state.table.header.iter().map(|h| h.kind).collect();
        assert_eq!(kinds, STATIC_COLUMNS.to_vec());
        assert_eq!(state.table.rows.len(), 1);
        assert_eq!(state.table.rows[0].value(ColumnKind::TaskNum), Some("1"));
        assert_eq!(state.table.task_num_counter, 2);
        assert!(state.table.is_rectangular());
        assert!(state.gui.full_width > 0.0);

        let label = &state.table.rows[0].cells[2];
        assert_eq!(label.kind, ColumnKind::TaskConfigLabel);
        assert_eq!(label.context.options()[0].label, "ocr-default");
    }

    #[test]
    fn test_add_row_numbers_sequentially() {
        let mut state = initialized();
        add_row(&mut state);
        add_row(&mut state);
        let nums: Vec<_> = state
            .table
            .rows
            .iter()
            .map(|r| r.value(ColumnKind::TaskNum).unwrap().to_string())
            .collect();
        assert_eq!(nums, vec!["1", "2", "3"]);
        let status = state.table.rows[2].position(ColumnKind::TaskStatus).unwrap();
        assert_eq!(state.table.rows[2].cells[status].context.options().len(), 7);
    }

    #[test]
    fn test_remove_row_reselects() {
        let mut state = initialized();
        add_row(&mut state);
        add_row(&mut state);

        remove_row(&mut state, 1);
        assert_eq!(state.table.rows.len(), 2);
        assert_eq!(state.table.selected, Selection::row(1));
        assert!(state.table.rows[1].cells.iter().all(|c| c.selected));
        assert!(state.table.rows[0].cells.iter().all(|c| !c.selected));

        remove_row(&mut state, 1);
        assert_eq!(state.table.selected, Selection::row(0));

        remove_row(&mut state, 0);
        assert!(state.table.rows.is_empty());
        assert!(state.table.selected.is_empty());
    }

    #[test]
    fn test_remove_row_out_of_range() {
        let mut state = initialized();
        let before = state.clone();
        remove_row(&mut state, 4);
        assert_eq!(state, before);
    }

    #[test]
    fn test_add_column() {
        let mut state = initialized();
        add_column(&mut state, ColumnKind::TaskWorkerUsername, 1280.0).unwrap();
        assert_eq!(state.table.header.len(), 6);
        assert!(state.table.is_rectangular());
        assert_eq!(state.table.rows[0].cells[5].value, "");
        assert!(!state
            .gui
            .additional_columns
            .contains(&ColumnKind::TaskWorkerUsername));
    }

    #[test]
    fn test_add_column_missing_option() {
        let mut state = initialized();
        state
            .table
            .column_options
            .retain(|o| o.name != ColumnKind::TaskPid);
        let err = add_column(&mut state, ColumnKind::TaskPid, 1280.0).unwrap_err();
        assert_eq!(err, CoreError::ColumnOptionNotFound(ColumnKind::TaskPid));
    }

    #[test]
    fn test_add_column_twice_is_noop() {
        let mut state = initialized();
        add_column(&mut state, ColumnKind::TaskCode, 1280.0).unwrap();
        let before = state.clone();
        add_column(&mut state, ColumnKind::TaskCode, 1280.0).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_remove_column_guard() {
        let mut state = initialized();
        add_column(&mut state, ColumnKind::TaskWorkerUsername, 1280.0).unwrap();
        add_column(&mut state, ColumnKind::TaskCode, 1280.0).unwrap();
        add_column(&mut state, ColumnKind::TaskComment, 1280.0).unwrap();

        for index in 0..=5 {
            let before = state.clone();
            remove_column(&mut state, index, 1280.0);
            assert_eq!(state, before, "index {index} must be guarded");
        }

        remove_column(&mut state, 6, 1280.0);
        assert_eq!(state.table.header.len(), 7);
        assert!(state.table.is_rectangular());
        assert_eq!(state.table.column_kind(6), Some(ColumnKind::TaskComment));
        assert_eq!(state.table.selected, Selection::column(6));
        assert!(state.table.rows[0].cells[6].selected);
        assert!(state.gui.additional_columns.contains(&ColumnKind::TaskCode));

        remove_column(&mut state, 6, 1280.0);
        assert_eq!(state.table.header.len(), 6);
        assert!(state.table.selected.is_empty());
    }

    #[test]
    fn test_change_cell_config_label_updates_task_type() {
        let mut state = initialized();
        let label = state.table.rows[0].cells[2].clone().with_value("ocr-default");
        change_cell(&mut state, label, 0, 2);

        let row = &state.table.rows[0];
        assert_eq!(row.cells[2].value, "ocr-default");
        let types: Vec<_> = row.cells[3].context.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(types, vec!["ocr", "layout"]);

        let unknown = row.cells[2].clone().with_value("nope");
        change_cell(&mut state, unknown, 0, 2);
        assert!(state.table.rows[0].cells[3].context.options().is_empty());
    }

    #[test]
    fn test_change_cell_without_task_type_column() {
        let mut state = initialized();
        state.table.header.remove(3);
        state.table.rows[0].cells.remove(3);
        let label = state.table.rows[0].cells[2].clone().with_value("ocr-default");
        change_cell(&mut state, label, 0, 2);
        let options = state.table.rows[0].cells[2].context.options();
        assert_eq!(options, &[ContextOption::new(MISSING_TASK_TYPE_LABEL, "")]);
    }

    #[test]
    fn test_change_cell_rejects_wrong_kind() {
        let mut state = initialized();
        let before = state.clone();
        let cell = Cell::new(ColumnKind::TaskComment, "x", CellContext::FreeText);
        change_cell(&mut state, cell.clone(), 0, 2);
        change_cell(&mut state, cell, 9, 0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_change_row_requires_matching_shape() {
        let mut state = initialized();
        let before = state.clone();
        change_row(&mut state, Row::new(vec![], 30.0), 0);
        assert_eq!(state, before);

        let mut row = state.table.rows[0].clone();
        row.cells[4].value = "busy".to_string();
        change_row(&mut state, row, 0);
        assert_eq!(state.table.rows[0].cells[4].value, "busy");
    }

    #[test]
    fn test_change_row_keeps_upload_state() {
        let mut state = initialized();
        crate::upload::start_upload(&mut state);
        crate::upload::task_started(&mut state, 0);

        let mut row = build_row(&state, 1);
        row.cells[4].value = "edited".to_string();
        assert!(row.upload.is_none());
        change_row(&mut state, row, 0);
        assert_eq!(state.table.rows[0].cells[4].value, "edited");
        assert_eq!(state.table.rows[0].upload, Some(RowUpload::uploading(0)));

        crate::upload::task_succeeded(&mut state, 0);
        assert!(state.upload.unwrap().is_settled());
        assert_eq!(state.table.rows[0].upload, Some(RowUpload::finished()));
    }

    #[test]
    fn test_import_rows_copies_from_selection() {
        let mut state = initialized();
        state.table.rows[0].cells[4].value = "free".to_string();
        state.table.rows[0].cells[1].value = "a.png".to_string();
        state.table.selected = Selection::row(0);

        let groups = vec![
            FileGroup {
                name: "scan-1".to_string(),
                files: vec![serde_json::json!({ "name": "scan-1.tif" })],
            },
            FileGroup {
                name: "scan-2".to_string(),
                files: vec![serde_json::json!({ "name": "scan-2.tif" })],
            },
        ];
        import_rows(&mut state, &groups);

        assert_eq!(state.table.rows.len(), 3);
        let second = &state.table.rows[1];
        assert_eq!(second.value(ColumnKind::TaskNum), Some("2"));
        assert_eq!(second.value(ColumnKind::TaskStatus), Some("free"));
        assert_eq!(second.value(ColumnKind::TaskInputs), Some(""));
        assert_eq!(second.task.inputs.as_ref().unwrap()[0]["name"], "scan-1.tif");
        assert_eq!(state.table.rows[2].value(ColumnKind::TaskNum), Some("3"));
        assert_eq!(state.table.task_num_counter, 4);
    }

    #[test]
    fn test_import_rows_without_selection() {
        let mut state = initialized();
        state.table.rows[0].cells[4].value = "free".to_string();
        let groups = vec![FileGroup {
            name: "g".to_string(),
            files: vec![],
        }];
        import_rows(&mut state, &groups);
        assert_eq!(state.table.rows[1].value(ColumnKind::TaskStatus), Some(""));
    }
}
