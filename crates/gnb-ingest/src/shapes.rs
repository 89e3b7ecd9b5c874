//! The concrete source layouts the merge commands consume.

use std::path::Path;

use gnb_model::{Sentinel, Table, UNKNOWN_LITERAL};
use tracing::info;

use crate::delimited::{DelimitedOptions, read_delimited};
use crate::error::{IngestError, Result};
use crate::grid::KeySpec;
use crate::records::VIRUS_NAME_COLUMN;
use crate::sheet::{SheetOptions, read_sheet};

/// GISAID upload workbooks keep submissions on their second sheet.
pub const UPLOAD_SHEET_INDEX: usize = 1;
/// Rows of instructions above the header of an NCBI BioSample template.
pub const SUBMISSION_TEMPLATE_SKIP_ROWS: usize = 12;
/// NCBI SRA metadata templates keep the run table on their second sheet.
pub const RUN_TEMPLATE_SHEET_INDEX: usize = 1;
/// Position of the virus-name column in the upload's label row.
pub const UPLOAD_LABEL_KEY_INDEX: usize = 2;
/// Position of `sample_name` in NCBI `attributes.tsv`.
pub const ATTRIBUTE_KEY_INDEX: usize = 2;

/// GISAID upload template keyed by `covv_virus_name`.
///
/// The row right under the header repeats the column labels in prose and is
/// dropped. Cells reading `unknown` become `sentinel`.
pub fn read_upload_template(path: &Path, sentinel: Sentinel) -> Result<Table> {
    let options = SheetOptions {
        sheet_index: UPLOAD_SHEET_INDEX,
        header_row: 0,
        skip_data_rows: 1,
        key: Some(KeySpec::Name(VIRUS_NAME_COLUMN.to_string())),
    };
    let table = read_sheet(path, &options)?
        .replace_literal(UNKNOWN_LITERAL, sentinel.as_str())
        .map_err(IngestError::table(path))?;
    info!(path = %path.display(), rows = table.height(), "loaded upload template");
    Ok(table)
}

/// GISAID upload template read by its human-readable label row.
pub fn read_upload_labels(path: &Path, key_index: usize) -> Result<Table> {
    let options = SheetOptions {
        sheet_index: UPLOAD_SHEET_INDEX,
        header_row: 1,
        skip_data_rows: 0,
        key: Some(KeySpec::Index(key_index)),
    };
    let table = read_sheet(path, &options)?;
    info!(path = %path.display(), rows = table.height(), "loaded upload labels");
    Ok(table)
}

/// NCBI BioSample template; only its columns matter.
pub fn read_submission_template(path: &Path) -> Result<Table> {
    let options = SheetOptions {
        header_row: SUBMISSION_TEMPLATE_SKIP_ROWS,
        ..SheetOptions::default()
    };
    let table = read_sheet(path, &options)?;
    info!(
        path = %path.display(),
        columns = table.width(),
        "loaded submission template"
    );
    Ok(table)
}

/// NCBI SRA metadata template.
pub fn read_run_template(path: &Path) -> Result<Table> {
    let options = SheetOptions {
        sheet_index: RUN_TEMPLATE_SHEET_INDEX,
        ..SheetOptions::default()
    };
    let table = read_sheet(path, &options)?;
    info!(
        path = %path.display(),
        columns = table.width(),
        rows = table.height(),
        "loaded run template"
    );
    Ok(table)
}

/// NCBI BioSample `attributes.tsv`, optionally keyed by column position.
pub fn read_attribute_table(path: &Path, key_index: Option<usize>) -> Result<Table> {
    let options = DelimitedOptions {
        key: key_index.map(KeySpec::Index),
        ..DelimitedOptions::default()
    };
    let table = read_delimited(path, &options)?;
    info!(path = %path.display(), rows = table.height(), "loaded attribute table");
    Ok(table)
}
