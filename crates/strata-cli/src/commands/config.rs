//! Config command implementation.
//!
//! Prints the configuration `build` would use.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use strata_config::ConfigFormat;

use crate::commands::load_config;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file to check and print (defaults when absent)
    #[arg(short, long, env = "STRATA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "toml")]
    pub format: ConfigOutput,
}

/// Config output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ConfigOutput {
    /// TOML
    #[default]
    Toml,
    /// JSON
    Json,
}

impl From<ConfigOutput> for ConfigFormat {
    fn from(output: ConfigOutput) -> Self {
        match output {
            ConfigOutput::Toml => ConfigFormat::Toml,
            ConfigOutput::Json => ConfigFormat::Json,
        }
    }
}

/// Executes the config command.
pub fn execute(args: &ConfigArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_string_as(args.format.into())?);
    if args.format == ConfigOutput::Json {
        println!();
    }
    Ok(())
}
