//! Error types for table construction and joins.

use thiserror::Error;

/// Errors raised while building, keying or joining a [`Table`](crate::Table).
#[derive(Debug, Error)]
pub enum TableError {
    /// Column not present in the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Positional column lookup past the last column.
    #[error("column index {index} out of range (table has {width} columns)")]
    ColumnIndexOutOfRange { index: usize, width: usize },

    /// Two columns share a name.
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },

    /// A column has a different number of cells than the first column.
    #[error("column '{column}' has {found} cells, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    /// Row index past the end of the table.
    #[error("row {row} out of range (table has {height} rows)")]
    RowOutOfRange { row: usize, height: usize },

    /// A keyed operation was requested on a table without a key column.
    #[error("table has no key column")]
    NoKey,

    /// A row has no value in the key column.
    #[error("row {row} has no value in key column '{column}'")]
    MissingKey { column: String, row: usize },

    /// The same key value appears on more than one row.
    #[error("duplicate key '{key}' in column '{column}'")]
    DuplicateKey { column: String, key: String },

    /// A strict join found no partner row for a key.
    #[error("no matching row for key '{key}'")]
    UnmatchedKey { key: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TableError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
