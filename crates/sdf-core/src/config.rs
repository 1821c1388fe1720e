//! Configuration for SDF.
//!
//! All application data lives under `~/.sdf/`:
//!
//! ```text
//! ~/.sdf/
//! ├── .env.local    # Environment overrides, loaded on startup
//! └── projects/     # One directory per project
//!     └── {project_tag}/
//!         └── {tracker_tag}/
//! ```
//!
//! # Environment Variables
//!
//! - `SDF_STATE_DIR`: Override the base state directory
//! - `SDF_PROJECTS_DIR`: Override the projects directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "SDF_STATE_DIR";

/// Environment variable for custom projects directory.
pub const PROJECTS_DIR_ENV: &str = "SDF_PROJECTS_DIR";

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".sdf";

const PROJECTS_SUBDIR: &str = "projects";
const ENV_FILE: &str = ".env.local";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Base directory for SDF data, resolved once per process.
///
/// A non-empty `SDF_STATE_DIR` wins; otherwise `.sdf` under the home
/// directory, or under the working directory when there is no home.
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE.get_or_init(resolve_state_dir).clone()
}

fn resolve_state_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(STATE_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    let base = dirs::home_dir().unwrap_or_default();
    base.join(DEFAULT_STATE_DIR)
}

/// Path of the optional `.env.local` overrides file.
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE)
}

/// Loads `.env.local` into the process environment, if present.
///
/// Call before [`SdfConfig::from_env`] so the file can set
/// `SDF_PROJECTS_DIR`.
pub fn load_env() {
    let path = env_file();
    if path.exists() {
        match dotenvy::from_path(&path) {
            Ok(()) => debug!(path = %path.display(), "Loaded environment file"),
            Err(e) => debug!(path = %path.display(), error = %e, "Ignoring unreadable environment file"),
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdfConfig {
    projects_dir: PathBuf,
}

impl SdfConfig {
    /// Configuration with every path at its default.
    pub fn new() -> Self {
        Self {
            projects_dir: state_dir().join(PROJECTS_SUBDIR),
        }
    }

    /// Configuration with `SDF_PROJECTS_DIR` applied over the defaults.
    pub fn from_env() -> Self {
        match std::env::var(PROJECTS_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new().with_projects_dir(dir),
            _ => Self::new(),
        }
    }

    /// Sets the projects directory.
    pub fn with_projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.projects_dir = dir.into();
        self
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    /// Ensure the projects directory exists.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_projects_dir(&self) -> std::io::Result<()> {
        if !self.projects_dir.exists() {
            std::fs::create_dir_all(&self.projects_dir)?;
        }
        Ok(())
    }
}

impl Default for SdfConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // Environment variables are process-wide, so these tests only check
    // path construction.

    #[test]
    fn test_state_dir_name() {
        let dir = state_dir();
        assert!(dir.is_absolute() || dir.ends_with(".sdf"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env.local"));
    }

    #[test]
    fn test_default_projects_dir() {
        assert!(SdfConfig::default().projects_dir().ends_with("projects"));
    }

    #[test]
    fn test_with_projects_dir() {
        let config = SdfConfig::new().with_projects_dir("/tmp/sdf-projects");
        assert_eq!(config.projects_dir(), Path::new("/tmp/sdf-projects"));
    }

    #[test]
    fn test_ensure_projects_dir() {
        let dir = tempdir().unwrap();
        let config = SdfConfig::new().with_projects_dir(dir.path().join("a/b"));
        config.ensure_projects_dir().unwrap();
        assert!(config.projects_dir().is_dir());
        // Idempotent.
        config.ensure_projects_dir().unwrap();
    }
}
