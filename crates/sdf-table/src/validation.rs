//! Column validation table export.
//!
//! The validation table describes the columns of a data table so that a
//! spreadsheet front end can rebuild drop-downs and limits. It has one column
//! per data column (by tag) plus an `index` column:
//!
//! | index | Col_A  | Col_B |
//! |-------|--------|-------|
//! | 0     | name   | name  |
//! | 1     | kind   | kind  |
//! | 2     | min    | min   |
//! | 3     | max    | max   |
//! | 4..   | option | (pad) |
//!
//! Option lists are ragged; shorter ones are padded with empty cells.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sdf_models::Value;

use crate::column::Column;
use crate::error::Result;
use crate::table::Table;

/// Name of the index column of a validation table.
pub const VALIDATION_INDEX: &str = "index";

/// Fixed leading rows of a validation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRow {
    Name = 0,
    Kind = 1,
    LimitMin = 2,
    LimitMax = 3,
}

impl ValidationRow {
    /// Leading rows in file order.
    pub const ALL: [ValidationRow; 4] = [
        ValidationRow::Name,
        ValidationRow::Kind,
        ValidationRow::LimitMin,
        ValidationRow::LimitMax,
    ];

    fn cell(&self, column: &Column) -> Value {
        match self {
            ValidationRow::Name => Value::from(column.name()),
            ValidationRow::Kind => Value::from(column.kind().as_str()),
            ValidationRow::LimitMin => column.limit().map(|(min, _)| min.clone()).unwrap_or_default(),
            ValidationRow::LimitMax => column.limit().map(|(_, max)| max.clone()).unwrap_or_default(),
        }
    }
}

/// Table describing a set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationTable {
    table: Table,
}

impl ValidationTable {
    /// Builds the validation table for `columns`.
    ///
    /// Returns `Ok(None)` when there are no columns to describe.
    pub fn from_columns(columns: &[Column]) -> Result<Option<Self>> {
        if columns.is_empty() {
            return Ok(None);
        }

        let mut names: Vec<&str> = columns.iter().map(|c| c.tag().as_str()).collect();
        names.push(VALIDATION_INDEX);
        let mut table = Table::create(names.as_slice(), Some(VALIDATION_INDEX))?;

        let mut next_index: i64 = 0;
        let mut push_row = |table: &mut Table, cell: &dyn Fn(&Column) -> Value| -> Result<()> {
            let mut row: HashMap<String, Value> = columns
                .iter()
                .map(|c| (c.tag().to_string(), cell(c)))
                .collect();
            row.insert(VALIDATION_INDEX.to_string(), Value::Int64(next_index));
            next_index += 1;
            table.insert_row(row)
        };

        for fixed in ValidationRow::ALL {
            push_row(&mut table, &|c: &Column| fixed.cell(c))?;
        }

        let max_options = columns.iter().map(Column::num_options).max().unwrap_or(0);
        for i in 0..max_options {
            push_row(&mut table, &|c: &Column| c.options().get(i).cloned().unwrap_or_default())?;
        }

        Ok(Some(Self { table }))
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Writes the validation table; see [`Table::save`].
    pub fn save(&self, dir: &Path, name: &str) -> Result<PathBuf> {
        self.table.save(dir, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Bounds;
    use sdf_models::DataKind;
    use std::fs;
    use tempfile::tempdir;

    fn sample_columns() -> Vec<Column> {
        let number = Column::new(DataKind::Int64, "Test Number")
            .with_limit(Bounds::range(10i64, 100i64))
            .unwrap();
        let mut colours = Column::new(DataKind::Str, "Categories Col");
        colours.set_options(vec![
            Value::from("white"),
            Value::from("red"),
            Value::from("blue"),
        ]);
        let flag = Column::new(DataKind::Bool, "Flag");
        vec![number, colours, flag]
    }

    #[test]
    fn test_empty_columns_yield_none() {
        assert!(ValidationTable::from_columns(&[]).unwrap().is_none());
    }

    #[test]
    fn test_fixed_rows_describe_columns() {
        let validation = ValidationTable::from_columns(&sample_columns())
            .unwrap()
            .unwrap();
        let table = validation.table();

        assert_eq!(table.len(), 4 + 3);
        let at = |row: i64, col: &str| table.get_value(&Value::Int64(row), col).cloned();
        assert_eq!(at(0, "Test_Number"), Some(Value::from("Test Number")));
        assert_eq!(at(1, "Test_Number"), Some(Value::from("int64")));
        assert_eq!(at(2, "Test_Number"), Some(Value::Int64(10)));
        assert_eq!(at(3, "Test_Number"), Some(Value::Int64(100)));
        assert_eq!(at(2, "Categories_Col"), Some(Value::Int64(0)));
        assert_eq!(at(3, "Flag"), Some(Value::Null));
    }

    #[test]
    fn test_option_rows_are_padded() {
        let validation = ValidationTable::from_columns(&sample_columns())
            .unwrap()
            .unwrap();
        let table = validation.table();

        assert_eq!(
            table.get_value(&Value::Int64(4), "Categories_Col"),
            Some(&Value::from("white"))
        );
        assert_eq!(
            table.get_value(&Value::Int64(6), "Categories_Col"),
            Some(&Value::from("blue"))
        );
        assert_eq!(
            table.get_value(&Value::Int64(6), "Test_Number"),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_save_writes_ragged_csv() {
        let dir = tempdir().unwrap();
        let columns = vec![Column::new(DataKind::Bool, "Flag")];
        let validation = ValidationTable::from_columns(&columns).unwrap().unwrap();

        let path = validation.save(dir.path(), "tracker_validation").unwrap();

        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "index,Flag\n0,Flag\n1,bool\n2,\n3,\n");
    }
}
