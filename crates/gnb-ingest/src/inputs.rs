//! Up-front validation of declared input files.

use std::path::Path;

use tracing::warn;

use crate::error::{IngestError, Result};

/// Check that every `(label, path)` input exists before anything is parsed.
///
/// All missing paths are reported together.
pub fn ensure_inputs_exist(inputs: &[(&str, &Path)]) -> Result<()> {
    let missing: Vec<_> = inputs
        .iter()
        .filter(|(_, path)| !path.is_file())
        .map(|(label, path)| {
            warn!(input = *label, path = %path.display(), "input file not found");
            path.to_path_buf()
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(IngestError::MissingInputs { paths: missing })
    }
}
