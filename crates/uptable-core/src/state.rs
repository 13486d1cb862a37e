//! Full table state handed from one transition to the next.

use serde::{Deserialize, Serialize};

use crate::catalog::ToolConfig;
use crate::cell::Cell;
use crate::column::{default_column_options, ColumnKind, ColumnOption, SELECTABLE_COLUMNS, STATIC_COLUMNS};
use crate::config::EngineConfig;
use crate::row::Row;
use crate::status::TableStatus;
use crate::upload::UploadAggregate;

/// Whole-row or whole-column highlight. At most one axis is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn row(index: usize) -> Self {
        Self {
            row: Some(index),
            column: None,
        }
    }

    pub fn column(index: usize) -> Self {
        Self {
            row: None,
            column: Some(index),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.column.is_none()
    }
}

/// Coordinates of a cell in the row grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub column: usize,
}

impl CellPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Data model: header, rows and column catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<Row>,

    /// Column descriptors; `header[i].value` is the kind key.
    pub header: Vec<Cell>,

    /// Task number the next new row receives.
    pub task_num_counter: u64,

    pub column_options: Vec<ColumnOption>,

    /// Non-removable kinds, in header order.
    pub static_columns: Vec<ColumnKind>,

    pub selected: Selection,

    /// Height given to new rows.
    pub row_height: f64,
}

impl Table {
    /// Empty table with the default catalog.
    pub fn new(row_height: f64) -> Self {
        Self {
            rows: Vec::new(),
            header: Vec::new(),
            task_num_counter: 0,
            column_options: default_column_options(),
            static_columns: STATIC_COLUMNS.to_vec(),
            selected: Selection::none(),
            row_height,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Kind of the column at `index`.
    pub fn column_kind(&self, index: usize) -> Option<ColumnKind> {
        self.header.get(index).map(|c| c.kind)
    }

    /// Returns true if every row has exactly one cell per header column.
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|r| r.cells.len() == self.header.len())
    }
}

/// View-related state that is not part of the uploaded data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiState {
    pub last_focused_cell: Option<CellPosition>,

    pub vertical_scroll_enabled: bool,

    /// Kinds that can still be added as columns.
    pub additional_columns: Vec<ColumnKind>,

    /// Total content width of the widget.
    pub full_width: f64,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            last_focused_cell: None,
            vertical_scroll_enabled: false,
            additional_columns: SELECTABLE_COLUMNS.to_vec(),
            full_width: 0.0,
        }
    }
}

/// The complete engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    pub status: TableStatus,

    /// Present only while a batch upload is active.
    pub upload: Option<UploadAggregate>,

    pub table: Table,

    pub tools: Vec<ToolConfig>,

    pub project_roles: Vec<serde_json::Value>,

    /// Last initialization failure.
    pub last_error: Option<String>,

    pub gui: GuiState,
}

impl TableState {
    /// Initial state: loading, no rows, no upload, empty selection and focus.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            status: TableStatus::Loading,
            upload: None,
            table: Table::new(config.row_height),
            tools: Vec::new(),
            project_roles: Vec::new(),
            last_error: None,
            gui: GuiState::default(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.table.rows.len()
    }

    /// Cell at `pos`, if in range.
    pub fn cell(&self, pos: CellPosition) -> Option<&Cell> {
        self.table.rows.get(pos.row)?.cells.get(pos.column)
    }

    /// Positions of every cell flagged as focused.
    pub fn focused_cells(&self) -> Vec<CellPosition> {
        let mut out = Vec::new();
        for (r, row) in self.table.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                if cell.focused {
                    out.push(CellPosition::new(r, c));
                }
            }
        }
        out
    }
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
