//! Cells: the unit of both header and row content.

use serde::{Deserialize, Serialize};

use crate::column::ColumnKind;

/// Width assigned to cells before the first layout pass.
pub const DEFAULT_CELL_WIDTH: f64 = 10.0;

/// One selectable value of an enumerated cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextOption {
    pub label: String,
    pub value: String,
}

impl ContextOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Option whose label doubles as its value.
    pub fn same(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            value: label.clone(),
            label,
        }
    }
}

/// Extra data a cell carries depending on its column kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "options", rename_all = "snake_case")]
pub enum CellContext {
    /// Plain text entry.
    #[default]
    FreeText,
    /// Value chosen from a list.
    Enumerated(Vec<ContextOption>),
}

impl CellContext {
    /// Returns true if this context shape is valid for `kind`.
    pub fn fits(&self, kind: ColumnKind) -> bool {
        matches!(self, Self::Enumerated(_)) == kind.is_enumerated()
    }

    pub fn options(&self) -> &[ContextOption] {
        match self {
            Self::FreeText => &[],
            Self::Enumerated(options) => options,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellStyle {
    pub width: f64,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_CELL_WIDTH,
        }
    }
}

/// A header or row cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Column kind this cell belongs to.
    #[serde(rename = "type")]
    pub kind: ColumnKind,

    pub value: String,

    pub context: CellContext,

    #[serde(default)]
    pub drag_entered: bool,

    #[serde(default)]
    pub style: CellStyle,

    #[serde(default)]
    pub selected: bool,

    #[serde(default)]
    pub focused: bool,
}

impl Cell {
    /// Empty cell of `kind` with the given context.
    pub fn new(kind: ColumnKind, value: impl Into<String>, context: CellContext) -> Self {
        Self {
            kind,
            value: value.into(),
            context,
            drag_entered: false,
            style: CellStyle::default(),
            selected: false,
            focused: false,
        }
    }

    /// Catalog template for `kind`: value is the kind key.
    pub fn template(kind: ColumnKind) -> Self {
        Self::new(kind, kind.as_str(), kind.default_context())
    }

    /// Header cell describing a column of `kind`.
    pub fn header(kind: ColumnKind, context: CellContext) -> Self {
        Self::new(kind, kind.as_str(), context)
    }

    /// Builder method to set the width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.style.width = width;
        self
    }

    /// Builder method to set the value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}
