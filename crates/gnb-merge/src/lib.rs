//! Merging GISAID metadata into NCBI submission layouts.
//!
//! - **biosample**: upload + download records → BioSample template
//! - **run**: BioSample attributes + upload labels → SRA run metadata

pub mod biosample;
pub mod columns;
pub mod error;
pub mod run;

pub use biosample::{
    BiosampleOptions, DEFAULT_HOST, DEFAULT_HOST_DISEASE, DEFAULT_ORGANISM, biosample_plan,
    merge_biosample,
};
pub use error::{MergeError, Result};
pub use run::{METHODS, RunOptions, build_run_metadata, run_plan};
