//! Selection and focus navigation.
//!
//! Selection highlights a whole row or a whole column. Focus marks the single
//! cell being edited and moves like tab navigation. The two are tracked
//! independently.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{CellPosition, Selection, TableState};

/// Direction of a focus step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Position one step from `from` in a `rows` x `columns` grid.
///
/// Horizontal steps run in reading order and wrap across rows; every step
/// wraps around the grid edges.
pub fn next_position(
    from: CellPosition,
    direction: Direction,
    rows: usize,
    columns: usize,
) -> CellPosition {
    let last_row = rows.saturating_sub(1);
    let last_column = columns.saturating_sub(1);
    let (row, column) = (from.row, from.column);

    match direction {
        Direction::Right if column + 1 >= columns => {
            let row = if row + 1 >= rows { 0 } else { row + 1 };
            CellPosition::new(row, 0)
        }
        Direction::Right => CellPosition::new(row, column + 1),
        Direction::Left if column == 0 => {
            let row = if row == 0 { last_row } else { row - 1 };
            CellPosition::new(row, last_column)
        }
        Direction::Left => CellPosition::new(row, column - 1),
        Direction::Down if row + 1 >= rows => CellPosition::new(0, column),
        Direction::Down => CellPosition::new(row + 1, column),
        Direction::Up if row == 0 => CellPosition::new(last_row, column),
        Direction::Up => CellPosition::new(row - 1, column),
    }
}

/// Select the whole row at `index`.
pub fn select_row(state: &mut TableState, index: usize) {
    if index >= state.table.rows.len() {
        warn!(index, "Row index out of range");
        return;
    }
    state.table.selected = Selection::row(index);
    for (r, row) in state.table.rows.iter_mut().enumerate() {
        row.set_selected(r == index);
    }
}

/// Select the whole column at `index`.
pub fn select_column(state: &mut TableState, index: usize) {
    if index >= state.table.header.len() {
        warn!(index, "Column index out of range");
        return;
    }
    state.table.selected = Selection::column(index);
    for row in &mut state.table.rows {
        for (c, cell) in row.cells.iter_mut().enumerate() {
            cell.selected = c == index;
        }
    }
}

/// Drop any row or column selection.
pub fn clear_selection(state: &mut TableState) {
    state.table.selected = Selection::none();
    for row in &mut state.table.rows {
        row.set_selected(false);
    }
}

/// Drop focus from every cell.
pub fn clear_focus(state: &mut TableState) {
    state.gui.last_focused_cell = None;
    for cell in state.table.rows.iter_mut().flat_map(|r| r.cells.iter_mut()) {
        cell.focused = false;
    }
}

fn set_focused(state: &mut TableState, pos: CellPosition, focused: bool) {
    if let Some(cell) = state
        .table
        .rows
        .get_mut(pos.row)
        .and_then(|r| r.cells.get_mut(pos.column))
    {
        cell.focused = focused;
    }
}

/// Focus the clicked cell, clearing selection and the previous focus.
pub fn click_cell(state: &mut TableState, row: usize, column: usize) {
    let pos = CellPosition::new(row, column);
    if state.cell(pos).is_none() {
        warn!(row, column, "Clicked cell out of range");
        return;
    }

    clear_selection(state);
    if let Some(previous) = state.gui.last_focused_cell {
        if previous != pos {
            set_focused(state, previous, false);
        }
    }
    set_focused(state, pos, true);
    state.gui.last_focused_cell = Some(pos);
}

/// Move focus one step. Starts at the top-left cell when nothing is focused.
pub fn move_focus(state: &mut TableState, direction: Direction) {
    clear_selection(state);

    let rows = state.table.rows.len();
    let columns = state.table.header.len();
    if rows == 0 || columns == 0 {
        return;
    }

    let next = match state.gui.last_focused_cell {
        Some(previous) if previous.row < rows && previous.column < columns => {
            set_focused(state, previous, false);
            next_position(previous, direction, rows, columns)
        }
        _ => CellPosition::new(0, 0),
    };

    set_focused(state, next, true);
    state.gui.last_focused_cell = Some(next);
}
