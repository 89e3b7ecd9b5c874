//! Error types for field derivation.

use gnb_model::TableError;
use thiserror::Error;

/// Errors raised while deriving target columns.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A split produced fewer tokens than the requested index.
    #[error("cannot take token {index} of '{value}' split on '{delimiter}' ({tokens} tokens)")]
    SplitIndex {
        value: String,
        delimiter: String,
        index: usize,
        tokens: usize,
    },

    /// A raw value has no entry in a controlled vocabulary.
    #[error("'{value}' is not a known {vocabulary}")]
    UnmappedVocabulary { vocabulary: String, value: String },

    /// A required value is absent.
    #[error("required value is missing")]
    MissingValue,

    /// A rule looks up a vocabulary the context does not carry.
    #[error("no vocabulary named '{vocabulary}' is available")]
    UnknownVocabulary { vocabulary: String },

    /// A rule references a column the input table lacks.
    #[error("rule for '{target}' reads column '{column}', which is not in the input")]
    UnknownColumn { target: String, column: String },

    /// A rule failed on a specific row.
    #[error("row '{key}', column '{column}': {source}")]
    Row {
        key: String,
        column: String,
        #[source]
        source: Box<TransformError>,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

impl TransformError {
    /// The innermost error, unwrapping row context.
    pub fn root(&self) -> &TransformError {
        match self {
            Self::Row { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for derivation operations.
pub type Result<T> = std::result::Result<T, TransformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let err = TransformError::Row {
            key: "hCoV-19/USA".to_string(),
            column: "isolate".to_string(),
            source: Box::new(TransformError::SplitIndex {
                value: "hCoV-19/USA".to_string(),
                delimiter: "/".to_string(),
                index: 2,
                tokens: 2,
            }),
        };
        assert_eq!(
            err.to_string(),
            "row 'hCoV-19/USA', column 'isolate': cannot take token 2 of 'hCoV-19/USA' split on '/' (2 tokens)"
        );
        assert!(matches!(err.root(), TransformError::SplitIndex { index: 2, .. }));
    }
}
