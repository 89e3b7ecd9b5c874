//! Error types for table merging.

use gnb_model::TableError;
use gnb_transform::TransformError;
use thiserror::Error;

/// Errors raised while building a submission table.
#[derive(Debug, Error)]
pub enum MergeError {
    /// An input table lacks a column the merge reads.
    #[error("{table} is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },

    /// An attributes row names a sample absent from the GISAID upload.
    #[error("BioSample attributes sample '{sample}' has no matching GISAID upload record")]
    UnmatchedSample { sample: String },

    /// A filled-in run template row names a BioSample absent from the attributes.
    #[error("run template row for BioSample '{accession}' has no matching attributes record")]
    UnmatchedTemplateAccession { accession: String },

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result type for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;
