//! Trackers: named data tables bound to validating columns.
//!
//! A tracker owns its [`Column`] descriptors and a [`Table`] whose columns are
//! the column tags plus an index. Values are validated against their column
//! before they reach the table.
//!
//! Trackers live in their own directory under a project directory:
//! ```text
//! project_dir/
//! └── {tracker_tag}/
//!     ├── {tracker_tag}_data.csv
//!     └── {tracker_tag}_validation.csv
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use sdf_models::{Tag, Value};
use tracing::{debug, info, warn};

use crate::column::Column;
use crate::error::{Result, TableError};
use crate::table::Table;
use crate::validation::ValidationTable;

/// Index column used when none is requested.
pub const DEFAULT_INDEX: &str = "index";

/// Paths written by [`Tracker::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTracker {
    pub data: PathBuf,
    pub validation: Option<PathBuf>,
}

/// A named, validated data table.
#[derive(Debug, Clone)]
pub struct Tracker {
    name: String,
    tag: Tag,
    dir: PathBuf,
    index: String,
    next_index: i64,
    columns: Vec<Column>,
    data: Table,
}

impl Tracker {
    /// Creates a tracker and its directory under `project_dir`.
    ///
    /// # Errors
    /// Fails if `columns` is empty, a column tag is empty, two columns share a
    /// tag (or a tag equals the index name), the tracker directory already
    /// exists, or it cannot be created. Column errors leave nothing on disk.
    pub fn init(
        name: &str,
        columns: Vec<Column>,
        project_dir: &Path,
        index: Option<&str>,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(TableError::EmptySchema);
        }

        let index = index.unwrap_or(DEFAULT_INDEX).to_string();
        let mut seen: HashSet<&str> = HashSet::from([index.as_str()]);
        for column in &columns {
            if !seen.insert(column.tag().as_str()) {
                return Err(TableError::DuplicateColumn(format!(
                    "{} (name: {})",
                    column.tag(),
                    column.name()
                )));
            }
        }

        let mut names: Vec<&str> = columns.iter().map(|c| c.tag().as_str()).collect();
        names.push(index.as_str());
        let data = Table::create(names.as_slice(), Some(index.as_str()))?;

        // Nothing touches the disk until every column check has passed.
        let tag = Tag::from_name(name);
        let dir = project_dir.join(tag.as_str());
        if dir.is_dir() {
            return Err(TableError::AlreadyExists { path: dir });
        }
        fs::create_dir_all(&dir).map_err(|source| TableError::DirectoryError {
            path: dir.clone(),
            source,
        })?;

        info!(tracker = %tag, dir = %dir.display(), columns = columns.len(), "Initialised tracker");
        Ok(Self {
            name: name.to_string(),
            tag,
            dir,
            index,
            next_index: 0,
            columns,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by tag.
    pub fn column(&self, tag: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.tag().as_str() == tag)
    }

    /// Column tags in declaration order.
    pub fn column_tags(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.tag().as_str()).collect()
    }

    pub fn data(&self) -> &Table {
        &self.data
    }

    /// Adds a row from a partial `{tag: value}` map.
    ///
    /// Cells not mentioned stay empty. Values that fail their column's
    /// validation, and tags that are not columns, are skipped with a warning.
    /// Returns `false` and inserts nothing when no value survives.
    pub fn add_row(&mut self, data: &HashMap<String, Value>) -> Result<bool> {
        let mut row: HashMap<String, Value> = self
            .columns
            .iter()
            .map(|c| (c.tag().to_string(), Value::Null))
            .collect();

        let mut valid = 0;
        for (tag, value) in data {
            let Some(column) = self.column(tag) else {
                debug!(tracker = %self.tag, column = %tag, "Ignoring unknown column");
                continue;
            };
            if column.validate(value) {
                row.insert(tag.clone(), value.clone());
                valid += 1;
            } else {
                warn!(
                    tracker = %self.tag,
                    column = %tag,
                    name = column.name(),
                    value = %value,
                    required = %column.kind(),
                    "Failed validation, value not added"
                );
            }
        }

        if valid == 0 {
            warn!(tracker = %self.tag, "There were no valid entries to add to the table");
            return Ok(false);
        }

        row.insert(self.index.clone(), Value::Int64(self.next_index));
        self.data.insert_row(row)?;
        self.next_index += 1;
        Ok(true)
    }

    /// Adds several rows; returns how many were inserted.
    pub fn add_rows(&mut self, rows: &[HashMap<String, Value>]) -> Result<usize> {
        let mut inserted = 0;
        for row in rows {
            if self.add_row(row)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Changes an existing value after validating it.
    ///
    /// Returns `false` for an unknown tag or a value the column rejects.
    ///
    /// # Errors
    /// Fails if no row has `index_value`.
    pub fn amend_val(&mut self, index_value: i64, tag: &str, value: Value) -> Result<bool> {
        let Some(column) = self.column(tag) else {
            warn!(tracker = %self.tag, column = tag, "Provided tag not present in the table");
            return Ok(false);
        };
        if !column.validate(&value) {
            warn!(
                tracker = %self.tag,
                column = tag,
                value = %value,
                required = %column.kind(),
                "Validation failed, value is not compatible with the column"
            );
            return Ok(false);
        }

        self.data.amend(&Value::Int64(index_value), tag, value)?;
        Ok(true)
    }

    /// Writes the data and validation tables into the tracker directory.
    pub fn save(&self) -> Result<SavedTracker> {
        let data = self.data.save(&self.dir, &format!("{}_data", self.tag))?;
        let validation = match ValidationTable::from_columns(&self.columns)? {
            Some(table) => Some(table.save(&self.dir, &format!("{}_validation", self.tag))?),
            None => None,
        };
        Ok(SavedTracker { data, validation })
    }
}
