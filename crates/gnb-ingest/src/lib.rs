//! Loading GISAID and NCBI metadata files into keyed tables.
//!
//! - **sheet**: `.xls`/`.xlsx` workbooks via calamine
//! - **records**: GISAID JSON lines, optionally compressed
//! - **delimited**: NCBI `attributes.tsv`
//! - **shapes**: the fixed layouts of each source file
//! - **inputs**: up-front existence checks

pub mod container;
pub mod delimited;
pub mod error;
mod grid;
pub mod header;
pub mod inputs;
pub mod records;
pub mod shapes;
pub mod sheet;

pub use container::{Container, open_records};
pub use delimited::{DelimitedOptions, read_delimited};
pub use error::{IngestError, Result};
pub use grid::KeySpec;
pub use header::{header_names, normalize_header};
pub use inputs::ensure_inputs_exist;
pub use records::{RecordOptions, VIRUS_NAME_COLUMN, parse_records, read_download_records};
pub use shapes::{
    ATTRIBUTE_KEY_INDEX, RUN_TEMPLATE_SHEET_INDEX, SUBMISSION_TEMPLATE_SKIP_ROWS,
    UPLOAD_LABEL_KEY_INDEX, UPLOAD_SHEET_INDEX, read_attribute_table, read_run_template,
    read_submission_template, read_upload_labels, read_upload_template,
};
pub use sheet::{SheetOptions, cell_text, read_sheet};
