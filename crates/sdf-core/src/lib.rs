//! SDF Core - configuration and project workspaces shared by SDF front ends.
//!
//! - **config**: state directory, `.env.local` loading and [`SdfConfig`]
//! - **workspace**: per-project directories holding trackers

pub mod config;
pub mod error;
pub mod workspace;

pub use config::{env_file, load_env, state_dir, SdfConfig, PROJECTS_DIR_ENV, STATE_DIR_ENV};
pub use error::{CoreError, Result};
pub use workspace::ProjectWorkspace;
