//! Error types for metadata ingestion.

use std::path::{Path, PathBuf};

use gnb_model::TableError;
use thiserror::Error;

/// Errors that can occur while loading a source file into a table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// One or more declared inputs do not exist.
    #[error("input file(s) not found: {}", display_paths(.paths))]
    MissingInputs { paths: Vec<PathBuf> },

    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Container Errors ===
    /// Failed to open a compressed container.
    #[error("failed to read archive {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Archive holds no JSON records member.
    #[error("archive {path} contains no JSON records file")]
    EmptyArchive { path: PathBuf },

    // === Parse Errors ===
    /// Workbook could not be opened or a sheet could not be read.
    #[error("failed to read spreadsheet {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    /// Requested sheet index does not exist.
    #[error("sheet {index} not found in {path}")]
    SheetNotFound { path: PathBuf, index: usize },

    /// Header row lies past the last row of the source.
    #[error("header row {row} not found in {path} ({rows} rows)")]
    HeaderOutOfRange {
        path: PathBuf,
        row: usize,
        rows: usize,
    },

    /// Failed to parse delimited text.
    #[error("failed to parse delimited file {path}: {message}")]
    Delimited { path: PathBuf, message: String },

    /// A JSON line is not valid JSON.
    #[error("malformed JSON record in {path} at line {line}: {message}")]
    JsonParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A JSON line is valid JSON but not an object.
    #[error("JSON record in {path} at line {line} is not an object")]
    NotAnObject { path: PathBuf, line: usize },

    /// Record filter is not a valid regular expression.
    #[error("invalid record filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    // === Table Errors ===
    /// Required column not found in the source.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// The loaded cells do not form a valid table.
    #[error("invalid table in {path}: {source}")]
    Table {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

impl IngestError {
    pub(crate) fn read(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Self::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Self::FileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        }
    }

    pub(crate) fn table(path: &Path) -> impl FnOnce(TableError) -> Self + '_ {
        move |source| Self::Table {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn archive<E: std::fmt::Display>(path: &Path) -> impl FnOnce(E) -> Self + '_ {
        move |err| Self::Archive {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
