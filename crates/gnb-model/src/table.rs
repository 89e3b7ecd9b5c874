//! Keyed, immutable metadata tables.
//!
//! A [`Table`] wraps a Polars [`DataFrame`] whose columns all hold optional
//! strings, plus an optional key column with a unique value on every row.
//! Every operation returns a new table; nothing is mutated in place.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame};

use crate::error::{Result, TableError};

/// How [`Table::join`] treats left-hand keys with no partner row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    /// Keep the row; joined cells are absent.
    #[default]
    Left,
    /// Fail with [`TableError::UnmatchedKey`].
    Strict,
}

#[derive(Debug, Clone)]
struct KeyIndex {
    column: String,
    positions: HashMap<String, usize>,
}

/// An ordered set of uniquely named string columns, optionally keyed.
#[derive(Debug, Clone)]
pub struct Table {
    data: DataFrame,
    key: Option<KeyIndex>,
}

impl Table {
    /// Build an unkeyed table from named columns.
    ///
    /// All columns must have the same length and distinct names.
    pub fn from_columns<I>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<Option<String>>)>,
    {
        let mut seen = HashSet::new();
        let mut expected = None;
        let mut built = Vec::new();
        for (name, values) in columns {
            if !seen.insert(name.clone()) {
                return Err(TableError::DuplicateColumn { column: name });
            }
            let expected = *expected.get_or_insert(values.len());
            if values.len() != expected {
                return Err(TableError::RaggedColumn {
                    column: name,
                    expected,
                    found: values.len(),
                });
            }
            built.push(Column::new(name.as_str().into(), values));
        }
        let data = DataFrame::new(built)?;
        Ok(Self { data, key: None })
    }

    /// Build an unkeyed table from a header and row-major cells.
    ///
    /// Short rows are padded with absent cells; cells past the header width
    /// are ignored.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        let mut columns: Vec<Vec<Option<String>>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in &mut columns {
                column.push(cells.next().flatten());
            }
        }
        Self::from_columns(headers.into_iter().zip(columns))
    }

    /// An empty table with the given columns.
    pub fn empty(headers: &[String]) -> Result<Self> {
        Self::from_rows(headers.to_vec(), Vec::new())
    }

    /// The underlying DataFrame.
    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .into_iter()
            .any(|column| column.as_str() == name)
    }

    /// Name of the column at a zero-based position.
    pub fn column_at(&self, index: usize) -> Result<String> {
        self.column_names()
            .into_iter()
            .nth(index)
            .ok_or(TableError::ColumnIndexOutOfRange {
                index,
                width: self.width(),
            })
    }

    /// All cells of a column, top to bottom.
    pub fn values(&self, column: &str) -> Result<Vec<Option<&str>>> {
        let series = self
            .data
            .column(column)
            .map_err(|_| TableError::ColumnNotFound {
                column: column.to_string(),
            })?;
        Ok(series.str()?.into_iter().collect())
    }

    /// Owned copy of [`Table::values`].
    pub fn owned_values(&self, column: &str) -> Result<Vec<Option<String>>> {
        Ok(self
            .values(column)?
            .into_iter()
            .map(|value| value.map(str::to_string))
            .collect())
    }

    /// A single cell.
    pub fn cell(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let height = self.height();
        if row >= height {
            return Err(TableError::RowOutOfRange { row, height });
        }
        let series = self
            .data
            .column(column)
            .map_err(|_| TableError::ColumnNotFound {
                column: column.to_string(),
            })?;
        Ok(series.str()?.get(row))
    }

    /// Name of the key column, if the table is keyed.
    pub fn key_column(&self) -> Option<&str> {
        self.key.as_ref().map(|key| key.column.as_str())
    }

    /// Key values in row order.
    pub fn key_values(&self) -> Result<Vec<&str>> {
        let column = self.key_column().ok_or(TableError::NoKey)?;
        Ok(self
            .values(column)?
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect())
    }

    /// Row position of a key value.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.key
            .as_ref()
            .and_then(|index| index.positions.get(key).copied())
    }

    /// Designate `column` as the row key.
    ///
    /// Every row must hold a non-empty key and no key may repeat.
    pub fn with_key(self, column: &str) -> Result<Self> {
        let positions = {
            let values = self.values(column)?;
            let mut positions = HashMap::with_capacity(values.len());
            for (row, value) in values.into_iter().enumerate() {
                let key = match value {
                    Some(key) if !key.trim().is_empty() => key,
                    _ => {
                        return Err(TableError::MissingKey {
                            column: column.to_string(),
                            row,
                        });
                    }
                };
                if positions.insert(key.to_string(), row).is_some() {
                    return Err(TableError::DuplicateKey {
                        column: column.to_string(),
                        key: key.to_string(),
                    });
                }
            }
            positions
        };
        Ok(Self {
            data: self.data,
            key: Some(KeyIndex {
                column: column.to_string(),
                positions,
            }),
        })
    }

    /// Designate the column at a zero-based position as the row key.
    pub fn with_key_at(self, index: usize) -> Result<Self> {
        let column = self.column_at(index)?;
        self.with_key(&column)
    }

    /// Drop the leading `count` rows.
    pub fn skip_rows(&self, count: usize) -> Result<Self> {
        let length = self.height().saturating_sub(count);
        let offset = i64::try_from(count.min(self.height())).unwrap_or(i64::MAX);
        let sliced = Self {
            data: self.data.slice(offset, length),
            key: None,
        };
        sliced.rekeyed(self.key_column())
    }

    /// Replace every cell equal to `from` with `to`, leaving the key column
    /// untouched.
    pub fn replace_literal(&self, from: &str, to: &str) -> Result<Self> {
        let key = self.key_column();
        let mut columns = Vec::with_capacity(self.width());
        for name in self.column_names() {
            let values = self.values(&name)?;
            let replaced = values
                .into_iter()
                .map(|value| {
                    value.map(|cell| {
                        if cell == from && key != Some(name.as_str()) {
                            to.to_string()
                        } else {
                            cell.to_string()
                        }
                    })
                })
                .collect();
            columns.push((name, replaced));
        }
        Self::from_columns(columns)?.rekeyed(key)
    }

    /// Append `columns` from `other`, matching rows by key.
    ///
    /// Both tables must be keyed. The result keeps this table's rows, order
    /// and key. `kind` decides what happens to keys with no partner in `other`.
    pub fn join(&self, other: &Table, columns: &[&str], kind: JoinKind) -> Result<Self> {
        let key = self.key_column().ok_or(TableError::NoKey)?;
        if other.key_column().is_none() {
            return Err(TableError::NoKey);
        }
        for column in columns {
            if self.has_column(column) {
                return Err(TableError::DuplicateColumn {
                    column: (*column).to_string(),
                });
            }
            if !other.has_column(column) {
                return Err(TableError::ColumnNotFound {
                    column: (*column).to_string(),
                });
            }
        }

        let partners = self
            .key_values()?
            .into_iter()
            .map(|value| match (other.position(value), kind) {
                (Some(row), _) => Ok(Some(row)),
                (None, JoinKind::Left) => Ok(None),
                (None, JoinKind::Strict) => Err(TableError::UnmatchedKey {
                    key: value.to_string(),
                }),
            })
            .collect::<Result<Vec<_>>>()?;

        let mut joined: Vec<Column> = self.data.get_columns().to_vec();
        for column in columns {
            let source = other.values(column)?;
            let values: Vec<Option<String>> = partners
                .iter()
                .map(|partner| partner.and_then(|row| source[row]).map(str::to_string))
                .collect();
            joined.push(Column::new((*column).into(), values));
        }
        let data = DataFrame::new(joined)?;
        Self { data, key: None }.with_key(key)
    }

    fn rekeyed(self, key: Option<&str>) -> Result<Self> {
        match key {
            Some(column) => {
                let column = column.to_string();
                self.with_key(&column)
            }
            None => Ok(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|value| {
                if value.is_empty() {
                    None
                } else {
                    Some((*value).to_string())
                }
            })
            .collect()
    }

    fn sample() -> Table {
        Table::from_columns(vec![
            ("id".to_string(), cells(&["a", "b", "c"])),
            ("age".to_string(), cells(&["65", "unknown", ""])),
        ])
        .unwrap()
    }

    #[test]
    fn builds_from_rows_with_padding() {
        let table = Table::from_rows(
            vec!["x".to_string(), "y".to_string()],
            vec![vec![Some("1".to_string())], vec![Some("2".to_string()), Some("3".to_string())]],
        )
        .unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(0, "y").unwrap(), None);
        assert_eq!(table.cell(1, "y").unwrap(), Some("3"));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let result = Table::from_columns(vec![
            ("id".to_string(), cells(&["a"])),
            ("id".to_string(), cells(&["b"])),
        ]);
        assert!(matches!(result, Err(TableError::DuplicateColumn { .. })));
    }

    #[test]
    fn rejects_ragged_columns() {
        let result = Table::from_columns(vec![
            ("id".to_string(), cells(&["a", "b"])),
            ("age".to_string(), cells(&["1"])),
        ]);
        assert!(matches!(result, Err(TableError::RaggedColumn { .. })));
    }

    #[test]
    fn keys_by_column() {
        let table = sample().with_key("id").unwrap();
        assert_eq!(table.key_column(), Some("id"));
        assert_eq!(table.position("b"), Some(1));
        assert_eq!(table.position("z"), None);
        assert_eq!(table.key_values().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn rejects_duplicate_keys() {
        let table = Table::from_columns(vec![("id".to_string(), cells(&["a", "a"]))]).unwrap();
        assert!(matches!(
            table.with_key("id"),
            Err(TableError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn rejects_missing_keys() {
        let table = Table::from_columns(vec![("id".to_string(), cells(&["a", ""]))]).unwrap();
        assert!(matches!(
            table.with_key("id"),
            Err(TableError::MissingKey { row: 1, .. })
        ));
    }

    #[test]
    fn keys_by_position() {
        let table = sample().with_key_at(1);
        assert!(matches!(table, Err(TableError::MissingKey { .. })));
        let table = sample().with_key_at(0).unwrap();
        assert_eq!(table.key_column(), Some("id"));
        assert!(matches!(
            sample().with_key_at(5),
            Err(TableError::ColumnIndexOutOfRange { index: 5, width: 2 })
        ));
    }

    #[test]
    fn skip_rows_keeps_key() {
        let table = sample().with_key("id").unwrap().skip_rows(1).unwrap();
        assert_eq!(table.height(), 2);
        assert_eq!(table.key_values().unwrap(), vec!["b", "c"]);
        assert_eq!(table.position("b"), Some(0));
    }

    #[test]
    fn replace_literal_skips_key_column() {
        let table = Table::from_columns(vec![
            ("id".to_string(), cells(&["unknown", "b"])),
            ("age".to_string(), cells(&["unknown", "unknowns"])),
        ])
        .unwrap()
        .with_key("id")
        .unwrap()
        .replace_literal("unknown", "missing")
        .unwrap();
        assert_eq!(table.values("id").unwrap(), vec![Some("unknown"), Some("b")]);
        assert_eq!(
            table.values("age").unwrap(),
            vec![Some("missing"), Some("unknowns")]
        );
        assert_eq!(table.key_column(), Some("id"));
    }

    #[test]
    fn left_join_keeps_unmatched_rows() {
        let left = sample().with_key("id").unwrap();
        let right = Table::from_columns(vec![
            ("id".to_string(), cells(&["c", "a"])),
            ("accession".to_string(), cells(&["EPI3", "EPI1"])),
        ])
        .unwrap()
        .with_key("id")
        .unwrap();
        let joined = left.join(&right, &["accession"], JoinKind::Left).unwrap();
        assert_eq!(joined.height(), 3);
        assert_eq!(
            joined.values("accession").unwrap(),
            vec![Some("EPI1"), None, Some("EPI3")]
        );
        assert_eq!(joined.column_names(), vec!["id", "age", "accession"]);
    }

    #[test]
    fn strict_join_fails_on_unmatched_key() {
        let left = sample().with_key("id").unwrap();
        let right = Table::from_columns(vec![
            ("id".to_string(), cells(&["a"])),
            ("accession".to_string(), cells(&["EPI1"])),
        ])
        .unwrap()
        .with_key("id")
        .unwrap();
        let result = left.join(&right, &["accession"], JoinKind::Strict);
        assert!(matches!(result, Err(TableError::UnmatchedKey { key }) if key == "b"));
    }

    #[test]
    fn join_rejects_overlapping_columns() {
        let left = sample().with_key("id").unwrap();
        let right = sample().with_key("id").unwrap();
        assert!(matches!(
            left.join(&right, &["age"], JoinKind::Left),
            Err(TableError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn join_requires_keys() {
        let right = sample().with_key("id").unwrap();
        assert!(matches!(
            sample().join(&right, &["age"], JoinKind::Left),
            Err(TableError::NoKey)
        ));
    }

    #[test]
    fn empty_table_has_columns() {
        let table = Table::empty(&["a".to_string(), "b".to_string()]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }
}
