//! Error types for table operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while defining, filling or persisting tables.
///
/// Every variant is a contract violation: the operation was aborted and
/// nothing was changed. Value-level validation failures are reported as
/// `false` by the column layer instead.
#[derive(Error, Debug)]
pub enum TableError {
    /// Failed to read from file system.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to file system.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to parse a JSON definition.
    #[error("failed to parse definition: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Table file does not exist.
    #[error("table file not found: {path}")]
    NotFound { path: PathBuf },

    /// Directory that must be fresh already exists.
    #[error("already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Table file name without the `.csv` extension.
    #[error("table name must end with .csv, got: {0}")]
    InvalidExtension(String),

    /// A table was declared without columns.
    #[error("a table needs at least one column")]
    EmptySchema,

    /// A column name that cannot be used as a header.
    #[error("invalid column name: {0:?}")]
    InvalidColumnName(String),

    /// Two columns share the same tag.
    #[error("column with this tag already exists: {0}")]
    DuplicateColumn(String),

    /// The index column is not one of the declared columns.
    #[error("index column {0} is not a declared column")]
    UnknownIndex(String),

    /// Inserted row does not carry exactly the declared columns.
    #[error("row columns {found:?} do not match table columns {expected:?}")]
    RowShapeMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// No row with the given index value.
    #[error("row not found: {0}")]
    RowNotFound(String),

    /// No column with the given name.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Limit bounds that do not fit the column kind.
    #[error("invalid limit: {0}")]
    InvalidLimit(String),

    /// A column definition whose options fail the column's own checks.
    #[error("invalid options for column {0}")]
    InvalidOptions(String),
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;
