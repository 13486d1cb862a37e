//! Column width calculation.
//!
//! Kinds with a fixed width keep it. Every other column gets an equal share of
//! what is left of the viewport after the row-number gutter and the fixed
//! columns, but never less than [`MIN_FLEX_WIDTH`].

use tracing::debug;

use crate::cell::Cell;
use crate::state::TableState;

/// Width of the row-number gutter left of the first column.
pub const ROW_NUMBER_GUTTER: f64 = 57.0;

/// Floor for flexible columns.
pub const MIN_FLEX_WIDTH: f64 = 250.0;

/// Margin added to the column sum for the widget's content width.
pub const CONTENT_MARGIN: f64 = 40.0;

/// Width shared by every column without a fixed width.
pub fn flexible_width(header: &[Cell], viewport_width: f64) -> f64 {
    let mut fixed = 0.0;
    let mut flexible = 0usize;
    for cell in header {
        match cell.kind.fixed_width() {
            Some(w) => fixed += w,
            None => flexible += 1,
        }
    }

    if flexible == 0 {
        return MIN_FLEX_WIDTH;
    }

    let share = (viewport_width - ROW_NUMBER_GUTTER - fixed) / flexible as f64;
    share.max(MIN_FLEX_WIDTH)
}

/// Width of each header column, in header order.
pub fn column_widths(header: &[Cell], viewport_width: f64) -> Vec<f64> {
    let flex = flexible_width(header, viewport_width);
    header
        .iter()
        .map(|c| c.kind.fixed_width().unwrap_or(flex))
        .collect()
}

/// Content width for a header whose widths are already assigned.
pub fn full_width(header: &[Cell]) -> f64 {
    CONTENT_MARGIN + header.iter().map(|c| c.style.width).sum::<f64>()
}

/// Apply column widths to the header and every row, then refresh the content width.
pub fn recompute_widths(state: &mut TableState, viewport_width: f64) {
    let widths = column_widths(&state.table.header, viewport_width);

    for (cell, width) in state.table.header.iter_mut().zip(&widths) {
        cell.style.width = *width;
    }
    for row in &mut state.table.rows {
        for (cell, width) in row.cells.iter_mut().zip(&widths) {
            cell.style.width = *width;
        }
    }
    state.gui.full_width = full_width(&state.table.header);

    debug!(
        viewport_width,
        columns = widths.len(),
        full_width = state.gui.full_width,
        "Recomputed column widths"
    );
}
