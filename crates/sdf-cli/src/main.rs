//! SDF CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use sdf_cli::cli::Cli;
use sdf_cli::commands;

fn main() {
    // Local overrides first, then the user's state directory file.
    let _ = dotenvy::from_filename(".env.local");
    sdf_core::load_env();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let config = cli.config();

    if let Err(e) = commands::execute(cli.command, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
