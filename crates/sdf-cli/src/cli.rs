//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use sdf_core::SdfConfig;
use std::path::PathBuf;

/// Build version string with git hash and build date, e.g.
/// `0.1.0 (abc1234, 2026-10-19)`.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("SDF_GIT_HASH");
    const BUILD_DATE: &str = env!("SDF_BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// SDF - sustainability KPI scoring and project data trackers
#[derive(Parser, Debug)]
#[command(name = "sdf")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Directory holding project workspaces
    #[arg(short, long, env = "SDF_PROJECTS_DIR")]
    pub projects_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate every KPI of a project definition
    Evaluate {
        /// Path to the project definition (JSON)
        #[arg(required = true)]
        definition: PathBuf,

        /// Only evaluate this KPI
        #[arg(short, long)]
        kpi: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Create a tracker from a column schema and optionally load rows
    TrackerInit {
        /// Tracker name
        #[arg(short, long)]
        name: String,

        /// Path to the column schema (JSON)
        #[arg(short, long)]
        schema: PathBuf,

        /// Path to rows to add (JSON array of objects keyed by column tag)
        #[arg(short, long)]
        rows: Option<PathBuf>,

        /// Project the tracker belongs to (created if missing)
        #[arg(long, default_value = "default")]
        project: String,

        /// Name of the index column
        #[arg(short, long)]
        index: Option<String>,
    },
}

/// Output format for evaluation results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    /// Runtime configuration, honouring `--projects-dir`.
    pub fn config(&self) -> SdfConfig {
        match &self.projects_dir {
            Some(dir) => SdfConfig::new().with_projects_dir(dir),
            None => SdfConfig::from_env(),
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_parse_evaluate() {
        let cli = Cli::parse_from(["sdf", "evaluate", "project.json"]);
        match cli.command {
            Commands::Evaluate {
                definition,
                kpi,
                format,
            } => {
                assert_eq!(definition, PathBuf::from("project.json"));
                assert!(kpi.is_none());
                assert_eq!(format, OutputFormat::Text);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_cli_parse_evaluate_json() {
        let cli = Cli::parse_from(["sdf", "evaluate", "p.json", "--format", "json", "-k", "VP1"]);
        match cli.command {
            Commands::Evaluate { kpi, format, .. } => {
                assert_eq!(kpi.as_deref(), Some("VP1"));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Evaluate command"),
        }
    }

    #[test]
    fn test_cli_parse_tracker_init() {
        let cli = Cli::parse_from([
            "sdf",
            "--projects-dir",
            "/tmp/sdf",
            "tracker-init",
            "--name",
            "Energy",
            "--schema",
            "schema.json",
        ]);
        assert_eq!(cli.config().projects_dir(), Path::new("/tmp/sdf"));
        match cli.command {
            Commands::TrackerInit {
                name,
                rows,
                project,
                ..
            } => {
                assert_eq!(name, "Energy");
                assert!(rows.is_none());
                assert_eq!(project, "default");
            }
            _ => panic!("Expected TrackerInit command"),
        }
    }

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["sdf"]).is_err());
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["sdf", "-vvv", "evaluate", "p.json"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
