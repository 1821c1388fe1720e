//! Project workspaces: one directory per project holding its trackers.

use std::fs;
use std::path::{Path, PathBuf};

use sdf_models::Tag;
use sdf_table::{Column, Tracker};
use tracing::info;

use crate::config::SdfConfig;
use crate::error::{CoreError, Result};

/// A project directory under the configured projects directory.
#[derive(Debug, Clone)]
pub struct ProjectWorkspace {
    name: String,
    tag: Tag,
    dir: PathBuf,
}

impl ProjectWorkspace {
    /// Creates `<projects_dir>/<tag>` for a new project.
    ///
    /// # Errors
    /// Fails if the name sanitises to nothing, the directory already exists,
    /// or it cannot be created.
    pub fn init(config: &SdfConfig, name: &str) -> Result<Self> {
        let workspace = Self::locate(config, name)?;
        if workspace.dir.exists() {
            return Err(CoreError::ProjectExists {
                path: workspace.dir,
            });
        }
        fs::create_dir_all(&workspace.dir).map_err(|source| CoreError::DirectoryError {
            path: workspace.dir.clone(),
            source,
        })?;
        info!(project = %workspace.tag, dir = %workspace.dir.display(), "Initialised project");
        Ok(workspace)
    }

    /// Opens an existing project directory.
    pub fn open(config: &SdfConfig, name: &str) -> Result<Self> {
        let workspace = Self::locate(config, name)?;
        if !workspace.dir.is_dir() {
            return Err(CoreError::ProjectNotFound {
                path: workspace.dir,
            });
        }
        Ok(workspace)
    }

    /// Opens the project, creating it first if needed.
    pub fn open_or_init(config: &SdfConfig, name: &str) -> Result<Self> {
        match Self::open(config, name) {
            Err(CoreError::ProjectNotFound { .. }) => Self::init(config, name),
            other => other,
        }
    }

    fn locate(config: &SdfConfig, name: &str) -> Result<Self> {
        let tag = Tag::from_name(name);
        if tag.as_str().is_empty() {
            return Err(CoreError::InvalidName(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            dir: config.projects_dir().join(tag.as_str()),
            tag,
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

    /// Creates a tracker inside this project.
    pub fn add_tracker(
        &self,
        name: &str,
        columns: Vec<Column>,
        index: Option<&str>,
    ) -> Result<Tracker> {
        Ok(Tracker::init(name, columns, &self.dir, index)?)
    }
}
