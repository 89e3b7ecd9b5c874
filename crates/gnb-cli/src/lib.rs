//! CLI library components for the GISAID → NCBI metadata builder.

pub mod logging;
pub mod output;
pub mod selftest;
