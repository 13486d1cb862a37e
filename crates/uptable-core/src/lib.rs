//! Upload Table State Engine
//!
//! This crate holds the editable state of a staging table whose rows are
//! later uploaded as tasks. It has no dependencies on:
//! - Rendering or UI frameworks
//! - Network transport
//! - File system access
//!
//! Every change goes through [`transition`], a pure function of the current
//! state and one [`Action`]. [`Store`] layers snapshot-based undo/redo on top.

pub mod action;
pub mod catalog;
pub mod cell;
pub mod column;
pub mod config;
pub mod error;
pub mod focus;
pub mod history;
pub mod layout;
pub mod reducer;
pub mod row;
pub mod state;
pub mod status;
pub mod store;
pub mod table;
pub mod upload;

// Re-export commonly used types
pub use action::{Action, ActionKind};
pub use catalog::{ToolConfig, ToolSpec};
pub use cell::{Cell, CellContext, CellStyle, ContextOption};
pub use column::{ColumnKind, ColumnOption, SELECTABLE_COLUMNS, STATIC_COLUMNS};
pub use config::EngineConfig;
pub use error::CoreError;
pub use focus::Direction;
pub use history::History;
pub use reducer::transition;
pub use row::{FileGroup, Row, RowUpload, TaskPayload};
pub use state::{CellPosition, GuiState, Selection, Table, TableState};
pub use status::{TableStatus, UploadStatus};
pub use store::Store;
pub use upload::UploadAggregate;
