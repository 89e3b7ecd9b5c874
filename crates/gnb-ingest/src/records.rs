//! GISAID download records: one JSON object per line.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use gnb_model::{Sentinel, Table, UNKNOWN_LITERAL};
use regex::{Regex, RegexBuilder};
use serde_json::Value;
use tracing::{debug, info};

use crate::container::open_records;
use crate::error::{IngestError, Result};

/// Natural key shared by GISAID uploads and downloads.
pub const VIRUS_NAME_COLUMN: &str = "covv_virus_name";

/// How download records are loaded.
#[derive(Debug, Clone)]
pub struct RecordOptions {
    /// Fields removed from every record before filtering.
    pub drop: Vec<String>,
    /// Case-insensitive pattern a record's joined values must match.
    pub filter: Option<String>,
    /// Replacement for the literal `unknown`; `None` keeps it.
    pub sentinel: Option<Sentinel>,
    /// Key column; `None` leaves the table unkeyed.
    pub key_column: Option<String>,
}

impl Default for RecordOptions {
    fn default() -> Self {
        Self {
            drop: Vec::new(),
            filter: None,
            sentinel: Some(Sentinel::default()),
            key_column: Some(VIRUS_NAME_COLUMN.to_string()),
        }
    }
}

/// Read a (possibly compressed) JSON-lines download file.
pub fn read_download_records(path: &Path, options: &RecordOptions) -> Result<Table> {
    let reader = open_records(path)?;
    parse_records(reader, path, options)
}

/// Parse JSON-lines records from any buffered reader.
///
/// `source` is only used in diagnostics. Blank lines are skipped; any
/// malformed line fails the whole parse.
pub fn parse_records<R: BufRead>(reader: R, source: &Path, options: &RecordOptions) -> Result<Table> {
    let filter = options.filter.as_deref().map(compile_filter).transpose()?;

    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut filtered = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.map_err(IngestError::read(source))?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).map_err(|err| IngestError::JsonParse {
            path: source.to_path_buf(),
            line: line_number,
            message: err.to_string(),
        })?;
        let Value::Object(mut object) = value else {
            return Err(IngestError::NotAnObject {
                path: source.to_path_buf(),
                line: line_number,
            });
        };
        for field in &options.drop {
            object.shift_remove(field);
        }

        let cells: Vec<(String, Option<String>)> = object
            .into_iter()
            .map(|(name, value)| (name, json_text(value)))
            .collect();

        if let Some(filter) = &filter {
            let haystack = cells
                .iter()
                .map(|(_, value)| value.as_deref().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(" ");
            if !filter.is_match(&haystack) {
                filtered += 1;
                continue;
            }
        }

        let mut row = vec![None; columns.len()];
        for (name, value) in cells {
            let position = match positions.get(&name) {
                Some(position) => *position,
                None => {
                    positions.insert(name.clone(), columns.len());
                    columns.push(name);
                    columns.len() - 1
                }
            };
            if position >= row.len() {
                row.resize(position + 1, None);
            }
            row[position] = value;
        }
        rows.push(row);
    }

    info!(
        path = %source.display(),
        records = rows.len(),
        filtered,
        columns = columns.len(),
        "parsed download records"
    );

    let table = shape_records(source, columns, rows, options)?;
    match options.sentinel {
        Some(sentinel) => table
            .replace_literal(UNKNOWN_LITERAL, sentinel.as_str())
            .map_err(IngestError::table(source)),
        None => Ok(table),
    }
}

fn shape_records(
    source: &Path,
    mut columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    options: &RecordOptions,
) -> Result<Table> {
    let Some(key) = options.key_column.as_deref() else {
        return Table::from_rows(columns, rows).map_err(IngestError::table(source));
    };
    if rows.is_empty() && !columns.iter().any(|column| column == key) {
        debug!(key, "no records left, returning empty keyed table");
        columns.insert(0, key.to_string());
    }
    if !columns.iter().any(|column| column == key) {
        return Err(IngestError::MissingColumn {
            column: key.to_string(),
            path: source.to_path_buf(),
        });
    }
    Table::from_rows(columns, rows)
        .and_then(|table| table.with_key(key))
        .map_err(IngestError::table(source))
}

fn compile_filter(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|err| IngestError::InvalidFilter {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })
}

/// Text form of a JSON field value; `null` and empty strings are absent.
fn json_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    const RECORDS: &str = r#"{"covv_virus_name": "hCoV-19/USA/CA-1/2021", "covv_accession_id": "EPI_ISL_1", "covv_patient_age": "unknown", "covv_host": "Human"}

{"covv_virus_name": "hCoV-19/USA/NY-2/2021", "covv_accession_id": "EPI_ISL_2", "covv_patient_age": 65, "covv_lineage": "B.1.1.7"}
"#;

    fn parse(options: &RecordOptions) -> Result<Table> {
        parse_records(Cursor::new(RECORDS), Path::new("records.json"), options)
    }

    #[test]
    fn test_parse_records_keys_and_union_columns() {
        let table = parse(&RecordOptions::default()).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.key_column(), Some(VIRUS_NAME_COLUMN));
        assert_eq!(
            table.column_names(),
            vec![
                "covv_virus_name",
                "covv_accession_id",
                "covv_patient_age",
                "covv_host",
                "covv_lineage"
            ]
        );
        assert_eq!(table.cell(0, "covv_lineage").unwrap(), None);
        assert_eq!(table.cell(1, "covv_patient_age").unwrap(), Some("65"));
    }

    #[test]
    fn test_unknown_replaced_by_sentinel() {
        let options = RecordOptions {
            sentinel: Some(Sentinel::NotCollected),
            ..RecordOptions::default()
        };
        let table = parse(&options).unwrap();
        assert_eq!(table.cell(0, "covv_patient_age").unwrap(), Some("not collected"));
    }

    #[test]
    fn test_drop_then_filter() {
        let options = RecordOptions {
            drop: vec!["covv_host".to_string()],
            filter: Some("b\\.1\\.1\\.7".to_string()),
            ..RecordOptions::default()
        };
        let table = parse(&options).unwrap();
        assert_eq!(table.height(), 1);
        assert_eq!(table.key_values().unwrap(), vec!["hCoV-19/USA/NY-2/2021"]);
        assert!(!table.has_column("covv_host"));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let options = RecordOptions {
            filter: Some("human".to_string()),
            ..RecordOptions::default()
        };
        assert_eq!(parse(&options).unwrap().height(), 1);
    }

    #[test]
    fn test_filter_matching_nothing_yields_empty_keyed_table() {
        let options = RecordOptions {
            filter: Some("no-such-lineage".to_string()),
            ..RecordOptions::default()
        };
        let table = parse(&options).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.key_column(), Some(VIRUS_NAME_COLUMN));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "{\"covv_virus_name\": \"a\"}\n{not json}\n";
        let result = parse_records(Cursor::new(input), Path::new("bad.json"), &RecordOptions::default());
        assert!(matches!(result, Err(IngestError::JsonParse { line: 2, .. })));
    }

    #[test]
    fn test_non_object_line() {
        let result = parse_records(Cursor::new("[1, 2]\n"), Path::new("bad.json"), &RecordOptions::default());
        assert!(matches!(result, Err(IngestError::NotAnObject { line: 1, .. })));
    }

    #[test]
    fn test_invalid_filter() {
        let options = RecordOptions {
            filter: Some("(".to_string()),
            ..RecordOptions::default()
        };
        assert!(matches!(parse(&options), Err(IngestError::InvalidFilter { .. })));
    }

    #[test]
    fn test_duplicate_virus_name_rejected() {
        let input = "{\"covv_virus_name\": \"a\"}\n{\"covv_virus_name\": \"a\"}\n";
        let result = parse_records(Cursor::new(input), Path::new("dup.json"), &RecordOptions::default());
        assert!(matches!(result, Err(IngestError::Table { .. })));
    }

    #[test]
    fn test_unkeyed_view_keeps_unknown() {
        let options = RecordOptions {
            sentinel: None,
            key_column: None,
            ..RecordOptions::default()
        };
        let table = parse(&options).unwrap();
        assert_eq!(table.key_column(), None);
        assert_eq!(table.cell(0, "covv_patient_age").unwrap(), Some("unknown"));
    }
}
