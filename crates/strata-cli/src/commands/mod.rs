//! CLI command implementations.

pub mod build;
pub mod config;

pub use build::BuildArgs;
pub use config::ConfigArgs;

use std::path::Path;

use anyhow::{Context, Result};
use strata_config::{StrataConfig, Validate};

/// Loads and validates a configuration file, or returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<StrataConfig> {
    let config = match path {
        Some(path) => StrataConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => StrataConfig::default(),
    };
    config.validate_or_error()?;
    Ok(config)
}
