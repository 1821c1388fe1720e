//! Whole-file writes through a sibling temp file.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, TableError};

/// Replaces `path` with `data`.
///
/// The bytes go to a temp file in the same directory which is then renamed
/// over the target, so readers see either the old or the new file. Missing
/// parent directories are created. An existing file is overwritten without
/// any collision check.
///
/// # Errors
/// Returns an error if the directory, the write or the rename fails.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| TableError::DirectoryError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source| TableError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    temp_file.write_all(data).map_err(write_err)?;
    temp_file.flush().map_err(write_err)?;
    temp_file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
