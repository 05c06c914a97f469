//! Error types for board operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::fields::ColumnId;

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur while manipulating or configuring the board.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Column is not part of this board
    #[error("column not found: {id}")]
    ColumnNotFound { id: ColumnId },

    /// String does not name any known column
    #[error("unknown column id: {id}")]
    UnknownColumn { id: String },

    /// Position outside a column's task sequence
    #[error("index {index} out of range for column '{column}' with {len} tasks")]
    IndexOutOfRange {
        column: ColumnId,
        index: usize,
        len: usize,
    },

    /// Task id appears more than once on the board
    #[error("duplicate task id: {id}")]
    DuplicateTask { id: String },

    /// Task status disagrees with the column holding it
    #[error("task {id} has status '{status}' but sits in column '{column}'")]
    StatusMismatch {
        id: String,
        status: ColumnId,
        column: ColumnId,
    },

    /// Date input could not be understood
    #[error("invalid date: {input}")]
    InvalidDate { input: String },

    /// Configuration file could not be parsed
    #[error("invalid config at {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
