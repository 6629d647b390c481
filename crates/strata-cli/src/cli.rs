//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{BuildArgs, ConfigArgs};

/// Strata - multi-curve building and rates calibration
#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Build the curves of a market file
    Build(BuildArgs),

    /// Print the effective configuration
    Config(ConfigArgs),
}
