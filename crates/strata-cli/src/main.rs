//! Strata CLI - build multi-curve markets from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Build the curves described in a market file
//! strata build --market usd.toml
//!
//! # Same, with custom solver settings and JSON output
//! strata build --market usd.toml --config strata.toml --format json
//!
//! # Print the default configuration
//! strata config --format toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;
mod market;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build(args) => commands::build::execute(&args)?,
        Commands::Config(args) => commands::config::execute(&args)?,
    }

    Ok(())
}

/// Logs go to stderr so that stdout only carries the report.
fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "strata=warn",
        (false, 0) => "strata=info",
        (false, 1) => "strata=debug",
        (false, _) => "strata=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
