//! Core engine errors.

use thiserror::Error;

use crate::column::ColumnKind;

/// Errors that abort a transition.
///
/// Only configuration defects surface here. Out-of-range indices, missing
/// selections and stray upload events degrade to no-ops instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The column-option catalog has no entry for a requested kind.
    #[error("Can't find column option for {0}")]
    ColumnOptionNotFound(ColumnKind),

    /// A column kind key that none of the known kinds use.
    #[error("Unknown column kind: {0}")]
    UnknownColumnKind(String),
}
