//! Error types for project workspaces.

use std::path::PathBuf;

use sdf_table::TableError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A project directory already exists.
    #[error("project already exists: {path}")]
    ProjectExists { path: PathBuf },

    /// A project directory does not exist.
    #[error("project not found: {path}")]
    ProjectNotFound { path: PathBuf },

    /// The project name has no characters usable in a directory name.
    #[error("invalid project name: {0:?}")]
    InvalidName(String),

    /// Failed to create a directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tracker or table failure.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result type alias for workspace operations.
pub type Result<T> = std::result::Result<T, CoreError>;
