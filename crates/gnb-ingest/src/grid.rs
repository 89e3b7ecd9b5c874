//! Shared shaping of raw row-major cells into a [`Table`].

use std::path::Path;

use gnb_model::Table;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::header::header_names;

/// Raw cells, row-major, as read from a sheet or delimited file.
pub(crate) type Grid = Vec<Vec<Option<String>>>;

/// How a table key is declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Key by header name.
    Name(String),
    /// Key by zero-based column position.
    Index(usize),
}

/// Physical layout of a grid.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct GridLayout<'a> {
    /// Zero-based physical row holding the header.
    pub header_row: usize,
    /// Non-blank data rows to drop after the header.
    pub skip_data_rows: usize,
    pub key: Option<&'a KeySpec>,
}

/// Build a table from a grid.
///
/// Rows before the header are discarded, fully blank rows are skipped, and
/// the table is as wide as its widest row.
pub(crate) fn build_table(path: &Path, grid: Grid, layout: &GridLayout<'_>) -> Result<Table> {
    let available = grid.len();
    let mut rows = grid.into_iter().skip(layout.header_row);
    let header = rows.next().ok_or_else(|| IngestError::HeaderOutOfRange {
        path: path.to_path_buf(),
        row: layout.header_row,
        rows: available,
    })?;

    let data: Grid = rows
        .filter(|row| row.iter().any(Option::is_some))
        .collect();
    let width = data
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);
    let headers = header_names(&header, width);

    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = data.len(),
        "shaped table"
    );

    let table = Table::from_rows(headers, data)
        .and_then(|table| table.skip_rows(layout.skip_data_rows))
        .map_err(IngestError::table(path))?;
    match layout.key {
        None => Ok(table),
        Some(KeySpec::Name(column)) => {
            if !table.has_column(column) {
                return Err(IngestError::MissingColumn {
                    column: column.clone(),
                    path: path.to_path_buf(),
                });
            }
            table.with_key(column).map_err(IngestError::table(path))
        }
        Some(KeySpec::Index(index)) => table
            .with_key_at(*index)
            .map_err(IngestError::table(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_header_row_offset_and_blank_rows() {
        let grid = vec![
            row(&["preamble"]),
            row(&["id", "value"]),
            row(&["", ""]),
            row(&["a", "1"]),
            row(&["b"]),
        ];
        let layout = GridLayout {
            header_row: 1,
            ..GridLayout::default()
        };
        let table = build_table(Path::new("t.tsv"), grid, &layout).unwrap();
        assert_eq!(table.column_names(), vec!["id", "value"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(1, "value").unwrap(), None);
    }

    #[test]
    fn test_skip_data_rows_after_blank_removal() {
        let grid = vec![
            row(&["id"]),
            row(&[""]),
            row(&["label"]),
            row(&["a"]),
        ];
        let layout = GridLayout {
            skip_data_rows: 1,
            ..GridLayout::default()
        };
        let table = build_table(Path::new("t.tsv"), grid, &layout).unwrap();
        assert_eq!(table.values("id").unwrap(), vec![Some("a")]);
    }

    #[test]
    fn test_header_out_of_range() {
        let layout = GridLayout {
            header_row: 3,
            ..GridLayout::default()
        };
        let result = build_table(Path::new("t.tsv"), vec![row(&["id"])], &layout);
        assert!(matches!(
            result,
            Err(IngestError::HeaderOutOfRange { row: 3, rows: 1, .. })
        ));
    }

    #[test]
    fn test_missing_key_column() {
        let key = KeySpec::Name("covv_virus_name".to_string());
        let layout = GridLayout {
            key: Some(&key),
            ..GridLayout::default()
        };
        let result = build_table(Path::new("t.tsv"), vec![row(&["id"]), row(&["a"])], &layout);
        assert!(matches!(result, Err(IngestError::MissingColumn { .. })));
    }

    #[test]
    fn test_wide_rows_extend_header() {
        let grid = vec![row(&["id"]), row(&["a", "extra"])];
        let table = build_table(Path::new("t.tsv"), grid, &GridLayout::default()).unwrap();
        assert_eq!(table.column_names(), vec!["id", "Unnamed: 1"]);
    }
}
