//! Spreadsheet reading (`.xls`, `.xlsx`, `.ods`) via calamine.

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use chrono::Timelike;
use gnb_model::{Table, clean_cell, format_numeric};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::grid::{Grid, GridLayout, KeySpec, build_table};

/// Where the table lives inside a workbook.
#[derive(Debug, Clone, Default)]
pub struct SheetOptions {
    /// Zero-based sheet position.
    pub sheet_index: usize,
    /// Zero-based physical row holding the header.
    pub header_row: usize,
    /// Non-blank data rows to drop right after the header.
    pub skip_data_rows: usize,
    pub key: Option<KeySpec>,
}

/// Read one sheet of a workbook into a table.
pub fn read_sheet(path: &Path, options: &SheetOptions) -> Result<Table> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let mut workbook = open_workbook_auto(path).map_err(|err| IngestError::Spreadsheet {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let range = workbook
        .worksheet_range_at(options.sheet_index)
        .ok_or_else(|| IngestError::SheetNotFound {
            path: path.to_path_buf(),
            index: options.sheet_index,
        })?
        .map_err(|err| IngestError::Spreadsheet {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;

    debug!(
        path = %path.display(),
        sheet = options.sheet_index,
        "read worksheet"
    );

    let grid = physical_rows(path, &range);
    let layout = GridLayout {
        header_row: options.header_row,
        skip_data_rows: options.skip_data_rows,
        key: options.key.as_ref(),
    };
    build_table(path, grid, &layout)
}

/// Expand a used range into physical rows so row offsets count from the
/// top of the sheet, not the first used cell.
fn physical_rows(path: &Path, range: &Range<Data>) -> Grid {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let mut rows: Grid = vec![Vec::new(); start_row as usize];
    for (offset, row) in range.rows().enumerate() {
        let mut cells = vec![None; start_col as usize];
        for (column, cell) in row.iter().enumerate() {
            if let Data::Error(err) = cell {
                warn!(
                    path = %path.display(),
                    row = start_row as usize + offset,
                    column = start_col as usize + column,
                    error = ?err,
                    "spreadsheet error cell treated as empty"
                );
            }
            cells.push(cell_text(cell));
        }
        rows.push(cells);
    }
    rows
}

/// Text form of a spreadsheet cell; empty and error cells are absent.
pub fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => clean_cell(s),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_numeric(*v)),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(value) if value.num_seconds_from_midnight() == 0 => {
                value.format("%Y-%m-%d").to_string()
            }
            Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => format_numeric(dt.as_f64()),
        }),
    }
}
