//! Per-row field derivation for NCBI submission columns.
//!
//! - **rules**: scalar split / lookup / format functions
//! - **plan**: [`ColumnRule`] pipelines and [`MappingPlan`] projection
//! - **vocabulary**: immutable controlled vocabularies

pub mod error;
pub mod plan;
pub mod rules;
pub mod vocabulary;

pub use error::{Result, TransformError};
pub use plan::{ColumnRule, DeriveContext, DerivationRule, MappingPlan, Source};
pub use rules::{conditional_format, lookup_translate, split_extract, split_join, substitute_if_missing};
pub use vocabulary::{INSTRUMENT_MODELS, Vocabulary};
