//! Scalar derivation functions.
//!
//! Each function maps one cell (plus fixed parameters) to one output cell and
//! never looks at other rows.

use std::ops::Range;

use gnb_model::Sentinel;

use crate::error::{Result, TransformError};
use crate::vocabulary::Vocabulary;

/// The value itself, or the sentinel when absent.
pub fn substitute_if_missing(value: Option<&str>, sentinel: Sentinel) -> String {
    value.map_or_else(|| sentinel.as_str().to_string(), str::to_string)
}

/// Token `index` of `value` split on `delimiter`.
///
/// # Examples
///
/// ```
/// use gnb_transform::rules::split_extract;
///
/// assert_eq!(split_extract("achcov19/Xla/XC81/2121", "/", 2).unwrap(), "XC81");
/// assert!(split_extract("achcov19/Xla", "/", 2).is_err());
/// ```
pub fn split_extract(value: &str, delimiter: &str, index: usize) -> Result<String> {
    value
        .split(delimiter)
        .nth(index)
        .map(str::to_string)
        .ok_or_else(|| TransformError::SplitIndex {
            value: value.to_string(),
            delimiter: delimiter.to_string(),
            index,
            tokens: value.split(delimiter).count(),
        })
}

/// Tokens `range` of `value` split on `delimiter`, trimmed and re-joined.
///
/// A short tail is tolerated; `None` when the range selects no token.
pub fn split_join(value: &str, delimiter: &str, range: Range<usize>, separator: &str) -> Option<String> {
    let tokens: Vec<&str> = value
        .split(delimiter)
        .skip(range.start)
        .take(range.end.saturating_sub(range.start))
        .map(str::trim)
        .collect();
    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(separator))
    }
}

/// Strict dictionary translation.
pub fn lookup_translate(value: Option<&str>, vocabulary: &Vocabulary) -> Result<String> {
    let raw = value.ok_or(TransformError::MissingValue)?;
    vocabulary
        .translate(raw)
        .map(str::to_string)
        .ok_or_else(|| TransformError::UnmappedVocabulary {
            vocabulary: vocabulary.name().to_string(),
            value: raw.to_string(),
        })
}

/// Fill `{value}` and `{companion}` into `present` when the companion cell
/// exists, otherwise into `absent`.
pub fn conditional_format(value: &str, companion: Option<&str>, present: &str, absent: &str) -> String {
    match companion {
        Some(companion) => present
            .replace("{value}", value)
            .replace("{companion}", companion),
        None => absent.replace("{value}", value),
    }
}
