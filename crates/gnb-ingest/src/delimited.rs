//! Delimited text tables (NCBI `attributes.tsv`).

use std::path::Path;

use gnb_model::{Table, clean_cell};

use crate::error::{IngestError, Result};
use crate::grid::{Grid, GridLayout, KeySpec, build_table};

/// Layout of a delimited file.
#[derive(Debug, Clone)]
pub struct DelimitedOptions {
    pub delimiter: u8,
    /// Zero-based row holding the header.
    pub header_row: usize,
    pub key: Option<KeySpec>,
}

impl Default for DelimitedOptions {
    fn default() -> Self {
        Self {
            delimiter: b'\t',
            header_row: 0,
            key: None,
        }
    }
}

/// Read a delimited file into a table.
pub fn read_delimited(path: &Path, options: &DelimitedOptions) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let delimited = |err: csv::Error| IngestError::Delimited {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(delimited)?;

    let mut grid: Grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(delimited)?;
        grid.push(record.iter().map(clean_cell).collect());
    }

    let layout = GridLayout {
        header_row: options.header_row,
        skip_data_rows: 0,
        key: options.key.as_ref(),
    };
    build_table(path, grid, &layout)
}
