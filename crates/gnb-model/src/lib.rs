//! Shared data model for the GISAID → NCBI metadata builders.
//!
//! - **table**: Polars-backed keyed tables with key-based joins
//! - **sentinel**: the missing-value vocabulary accepted by NCBI
//! - **values**: cell text normalization

pub mod error;
pub mod sentinel;
pub mod table;
pub mod values;

pub use error::{Result, TableError};
pub use sentinel::{ParseSentinelError, Sentinel, UNKNOWN_LITERAL};
pub use table::{JoinKind, Table};
pub use values::{clean_cell, format_numeric};
