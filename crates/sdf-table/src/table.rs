//! In-memory row store with CSV persistence.
//!
//! A [`Table`] holds an ordered list of column names and, optionally, one of
//! them designated as the index. Rows are keyed by their index value, or by
//! insertion position when no index is declared.
//!
//! The store checks row *shape* only. Whether a value suits its column is
//! decided by the [`Column`](crate::Column) layer before a row reaches the
//! table.
//!
//! On disk a table is a CSV file:
//! ```text
//! <dir>/
//! └── <name>.csv   # header row, index column first when declared
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use sdf_models::Value;
use tracing::{debug, info};

use crate::atomic::atomic_write;
use crate::error::{Result, TableError};

/// File extension of persisted tables.
pub const TABLE_EXTENSION: &str = ".csv";

/// One stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Index value, or insertion position when the table has no index.
    pub key: Value,
    /// Cell values by column name, index column excluded.
    pub cells: HashMap<String, Value>,
}

/// Ordered columns plus rows keyed by index value.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    index: Option<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table.
    ///
    /// `columns` includes the index column when one is given.
    ///
    /// # Errors
    /// Fails on an empty column list, blank or repeated names, or an index
    /// that is not one of the columns.
    pub fn create<S: AsRef<str>>(columns: &[S], index: Option<&str>) -> Result<Self> {
        if columns.is_empty() {
            return Err(TableError::EmptySchema);
        }

        let mut seen = BTreeSet::new();
        let mut names = Vec::with_capacity(columns.len());
        for column in columns {
            let name = column.as_ref();
            if name.trim().is_empty() || name.contains(['\n', '\r']) {
                return Err(TableError::InvalidColumnName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
            names.push(name.to_string());
        }

        if let Some(index) = index {
            if !seen.contains(index) {
                return Err(TableError::UnknownIndex(index.to_string()));
            }
        }

        Ok(Self {
            columns: names,
            index: index.map(String::from),
            rows: Vec::new(),
        })
    }

    /// All declared column names, index included, in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Name of the index column, if one is declared.
    pub fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    /// Columns that hold cell data, i.e. every column but the index.
    pub fn data_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(move |c| Some(*c) != self.index.as_deref())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row.
    ///
    /// The row must carry exactly the declared columns, in any order. With an
    /// index declared, the index cell becomes the row key. Index values are
    /// not checked for uniqueness.
    ///
    /// # Errors
    /// Returns [`TableError::RowShapeMismatch`] if the key sets differ.
    pub fn insert_row(&mut self, mut row: HashMap<String, Value>) -> Result<()> {
        let expected: BTreeSet<&str> = self.columns.iter().map(String::as_str).collect();
        let found: BTreeSet<&str> = row.keys().map(String::as_str).collect();
        if expected != found {
            return Err(TableError::RowShapeMismatch {
                expected: expected.into_iter().map(String::from).collect(),
                found: found.into_iter().map(String::from).collect(),
            });
        }

        let key = match &self.index {
            Some(index) => row.remove(index).unwrap_or_default(),
            None => Value::Int64(self.rows.len() as i64),
        };

        debug!(key = %key, "Inserting row");
        self.rows.push(Row { key, cells: row });
        Ok(())
    }

    /// Reads a cell. With repeated index values the first row wins.
    pub fn get_value(&self, key: &Value, column: &str) -> Option<&Value> {
        self.rows
            .iter()
            .find(|r| &r.key == key)
            .and_then(|r| r.cells.get(column))
    }

    /// Overwrites a cell in place without validating the value.
    ///
    /// Every row sharing `key` is amended.
    ///
    /// # Errors
    /// Fails if `column` is not a data column or no row has `key`.
    pub fn amend(&mut self, key: &Value, column: &str, value: Value) -> Result<()> {
        if !self.data_columns().any(|c| c == column) {
            return Err(TableError::UnknownColumn(column.to_string()));
        }

        let mut amended = 0;
        for row in self.rows.iter_mut().filter(|r| &r.key == key) {
            row.cells.insert(column.to_string(), value.clone());
            amended += 1;
        }
        if amended == 0 {
            return Err(TableError::RowNotFound(key.to_string()));
        }

        debug!(key = %key, column, amended, "Amended cell");
        Ok(())
    }

    /// Writes the table to `<dir>/<name>.csv` and returns the file path.
    ///
    /// `.csv` is appended when `name` lacks it, `dir` is created when
    /// missing, and an existing file is overwritten.
    pub fn save(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        let file_name = if name.ends_with(TABLE_EXTENSION) {
            name.to_string()
        } else {
            format!("{}{}", name, TABLE_EXTENSION)
        };
        let path = dir.join(file_name);

        let header = self.header();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&header)?;
        for row in &self.rows {
            let record = header.iter().map(|column| {
                if Some(column.as_str()) == self.index.as_deref() {
                    row.key.to_string()
                } else {
                    row.cells.get(column).map(Value::to_string).unwrap_or_default()
                }
            });
            writer.write_record(record)?;
        }
        let bytes = writer.into_inner().map_err(|e| TableError::WriteError {
            path: path.clone(),
            source: std::io::Error::new(e.error().kind(), e.to_string()),
        })?;

        atomic_write(&path, &bytes)?;
        info!(path = %path.display(), rows = self.rows.len(), "Saved table");
        Ok(path)
    }

    /// Reads `<dir>/<name>` back into a table.
    ///
    /// The column list comes from the header. Cells are type-inferred (see
    /// [`Value::infer`]) with no knowledge of the columns that wrote them, so
    /// a string cell that reads as a number or bool comes back as one:
    /// `Str("42")` reloads as `Int64(42)`. Pass the index column name to key
    /// rows by it again.
    ///
    /// # Errors
    /// Fails if `name` lacks `.csv`, the file is missing, the header is
    /// empty, or a record is ragged.
    pub fn load(dir: &Path, name: &str, index: Option<&str>) -> Result<Self> {
        if !name.ends_with(TABLE_EXTENSION) {
            return Err(TableError::InvalidExtension(name.to_string()));
        }
        let path = dir.join(name);
        if !path.exists() {
            return Err(TableError::NotFound { path });
        }

        let mut reader = csv::Reader::from_path(&path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut table = Table::create(columns.as_slice(), index)?;

        for record in reader.records() {
            let record = record?;
            let row = columns
                .iter()
                .cloned()
                .zip(record.iter().map(Value::infer))
                .collect();
            table.insert_row(row)?;
        }

        info!(path = %path.display(), rows = table.len(), "Loaded table");
        Ok(table)
    }

    /// Header order on disk: index first, then the data columns.
    fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len());
        if let Some(index) = &self.index {
            header.push(index.clone());
        }
        header.extend(self.data_columns().map(String::from));
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn indexed_table() -> Table {
        Table::create(&["col1", "col2", "ind"], Some("ind")).unwrap()
    }

    fn row(ind: i64, col1: Value, col2: Value) -> HashMap<String, Value> {
        HashMap::from([
            ("ind".to_string(), Value::Int64(ind)),
            ("col1".to_string(), col1),
            ("col2".to_string(), col2),
        ])
    }

    #[test]
    fn test_create_requires_columns() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            Table::create(&empty, None),
            Err(TableError::EmptySchema)
        ));
        assert!(matches!(
            Table::create(&["a", " "], None),
            Err(TableError::InvalidColumnName(_))
        ));
        assert!(matches!(
            Table::create(&["a", "a"], None),
            Err(TableError::DuplicateColumn(_))
        ));
        assert!(matches!(
            Table::create(&["a"], Some("b")),
            Err(TableError::UnknownIndex(_))
        ));
    }

    #[test]
    fn test_insert_row_uses_index_value_as_key() {
        let mut table = indexed_table();
        table
            .insert_row(row(7, Value::Int64(1), Value::from("x")))
            .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].key, Value::Int64(7));
        assert!(!table.rows()[0].cells.contains_key("ind"));
        assert_eq!(
            table.get_value(&Value::Int64(7), "col2"),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn test_insert_row_auto_numbers_without_index() {
        let mut table = Table::create(&["a"], None).unwrap();
        for i in 0..3 {
            table
                .insert_row(HashMap::from([("a".to_string(), Value::Int64(i * 10))]))
                .unwrap();
        }
        let keys: Vec<&Value> = table.rows().iter().map(|r| &r.key).collect();
        assert_eq!(keys, vec![&Value::Int64(0), &Value::Int64(1), &Value::Int64(2)]);
    }

    #[test]
    fn test_insert_row_rejects_wrong_shape() {
        let mut table = indexed_table();
        let mut short = row(1, Value::Int64(1), Value::Int64(2));
        short.remove("col2");
        assert!(matches!(
            table.insert_row(short),
            Err(TableError::RowShapeMismatch { .. })
        ));

        let mut extra = row(1, Value::Int64(1), Value::Int64(2));
        extra.insert("col3".to_string(), Value::Null);
        assert!(table.insert_row(extra).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_insert_row_does_not_check_values() {
        let mut table = indexed_table();
        table
            .insert_row(row(1, Value::Bool(true), Value::Null))
            .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_duplicate_index_values_are_accepted() {
        let mut table = indexed_table();
        table.insert_row(row(1, Value::Int64(1), Value::Int64(2))).unwrap();
        table.insert_row(row(1, Value::Int64(3), Value::Int64(4))).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get_value(&Value::Int64(1), "col1"),
            Some(&Value::Int64(1))
        );

        table.amend(&Value::Int64(1), "col1", Value::Int64(0)).unwrap();
        assert!(table
            .rows()
            .iter()
            .all(|r| r.cells["col1"] == Value::Int64(0)));
    }

    #[test]
    fn test_amend_overwrites_without_validation() {
        let mut table = indexed_table();
        table.insert_row(row(5, Value::Int64(1), Value::Int64(2))).unwrap();

        table
            .amend(&Value::Int64(5), "col2", Value::from("CHANGED"))
            .unwrap();
        assert_eq!(
            table.get_value(&Value::Int64(5), "col2"),
            Some(&Value::from("CHANGED"))
        );
    }

    #[test]
    fn test_amend_unknown_targets() {
        let mut table = indexed_table();
        table.insert_row(row(5, Value::Int64(1), Value::Int64(2))).unwrap();

        assert!(matches!(
            table.amend(&Value::Int64(6), "col2", Value::Null),
            Err(TableError::RowNotFound(_))
        ));
        assert!(matches!(
            table.amend(&Value::Int64(5), "nope", Value::Null),
            Err(TableError::UnknownColumn(_))
        ));
        assert!(matches!(
            table.amend(&Value::Int64(5), "ind", Value::Null),
            Err(TableError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_save_appends_extension_and_creates_dir() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("tables");
        let mut table = indexed_table();
        table.insert_row(row(0, Value::Int64(1), Value::from("a b"))).unwrap();

        let path = table.save(&target, "data").unwrap();

        assert_eq!(path, target.join("data.csv"));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "ind,col1,col2\n0,1,a b\n");
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let mut table = Table::create(&["a"], None).unwrap();
        table
            .insert_row(HashMap::from([("a".to_string(), Value::Int64(1))]))
            .unwrap();
        table.save(dir.path(), "t.csv").unwrap();

        let other = Table::create(&["b"], None).unwrap();
        other.save(dir.path(), "t.csv").unwrap();

        let text = fs::read_to_string(dir.path().join("t.csv")).unwrap();
        assert_eq!(text, "b\n");
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let mut table = indexed_table();
        table.insert_row(row(0, Value::Int64(12), Value::from("white"))).unwrap();
        table.insert_row(row(1, Value::Float64(2.5), Value::Null)).unwrap();
        table.insert_row(row(2, Value::Bool(false), Value::from("with, comma"))).unwrap();
        table.save(dir.path(), "round").unwrap();

        let loaded = Table::load(dir.path(), "round.csv", Some("ind")).unwrap();

        let original: BTreeSet<&String> = table.columns().iter().collect();
        let reloaded: BTreeSet<&String> = loaded.columns().iter().collect();
        assert_eq!(original, reloaded);
        assert_eq!(loaded.rows(), table.rows());
    }

    #[test]
    fn test_load_reinfers_string_cells() {
        let dir = tempdir().unwrap();
        let mut table = indexed_table();
        table
            .insert_row(row(0, Value::from("42"), Value::from("true")))
            .unwrap();
        table.save(dir.path(), "typed").unwrap();

        let loaded = Table::load(dir.path(), "typed.csv", Some("ind")).unwrap();
        let first = Value::Int64(0);
        assert_eq!(loaded.get_value(&first, "col1"), Some(&Value::Int64(42)));
        assert_eq!(loaded.get_value(&first, "col2"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_load_without_index_keeps_index_as_column() {
        let dir = tempdir().unwrap();
        let mut table = indexed_table();
        table.insert_row(row(4, Value::Int64(1), Value::Int64(2))).unwrap();
        table.save(dir.path(), "plain").unwrap();

        let loaded = Table::load(dir.path(), "plain.csv", None).unwrap();
        assert_eq!(loaded.columns(), ["ind", "col1", "col2"]);
        assert_eq!(loaded.get_value(&Value::Int64(0), "ind"), Some(&Value::Int64(4)));
    }

    #[test]
    fn test_load_requires_extension_and_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Table::load(dir.path(), "table", None),
            Err(TableError::InvalidExtension(_))
        ));
        assert!(matches!(
            Table::load(dir.path(), "missing.csv", None),
            Err(TableError::NotFound { .. })
        ));
    }

    #[test]
    fn test_load_truncated_file_fails_loudly() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.csv"), "ind,col1,col2\n0,1,2\n1,5").unwrap();

        assert!(matches!(
            Table::load(dir.path(), "broken.csv", Some("ind")),
            Err(TableError::Csv(_))
        ));
    }
}
