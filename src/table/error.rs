//! Configuration errors raised by the data table.
//!
//! Every variant here is a programming mistake in the host screen (a malformed
//! column set, a record set with colliding keys, an out-of-range action index).
//! Empty and loading tables are states, not errors, and never appear here.

use thiserror::Error;

/// Misconfiguration detected by the table core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Two column descriptors share the same id.
    #[error("duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A column is marked sortable but carries no sort key.
    #[error("column `{0}` is sortable but has no sort key")]
    MissingSortKey(String),

    /// A header click referenced a column the table does not have.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Two loaded records produced the same key.
    #[error("duplicate row key: {0}")]
    DuplicateKey(String),

    /// Page sizes must be at least one row.
    #[error("page size must be greater than zero")]
    ZeroPageSize,

    /// An action index outside the configured action list.
    #[error("no action at index {0}")]
    UnknownAction(usize),

    /// The action's condition rejected this record.
    #[error("action `{label}` is not available for this record")]
    ActionUnavailable {
        /// Label of the rejected action.
        label: String,
    },

    /// A row index outside the loaded data.
    #[error("no row at index {0}")]
    UnknownRow(usize),
}
