//! The top-level configuration and its file formats.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calibration::{CurveBuildingConfig, LmmCalibrationConfig};
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::root_finder::RootFinderConfig;

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML.
    Toml,
    /// JSON.
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// All Strata settings.
///
/// Every section and field has a default, so an empty file is a valid
/// configuration.
///
/// # Example
///
/// ```rust
/// use strata_config::{ConfigFormat, StrataConfig};
///
/// let config = StrataConfig::from_str_as(
///     "[lmm_calibration]\nmax_multiplier = 5.0\n",
///     ConfigFormat::Toml,
/// )
/// .unwrap();
/// assert_eq!(config.lmm_calibration.max_multiplier, 5.0);
/// assert_eq!(config.root_finder.max_steps, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StrataConfig {
    /// Vector root finder used for curve building.
    pub root_finder: RootFinderConfig,
    /// Curve building.
    pub curve_building: CurveBuildingConfig,
    /// LMM volatility calibration.
    pub lmm_calibration: LmmCalibrationConfig,
}

impl StrataConfig {
    /// Parses and validates a configuration.
    pub fn from_str_as(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads and validates a configuration file, `.toml` or `.json`.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str_as(&content, format)
    }

    /// Renders the configuration.
    pub fn to_string_as(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => Ok(toml::to_string_pretty(self)?),
            ConfigFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Validate for StrataConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(
            self.root_finder
                .validate()
                .into_iter()
                .map(|e| e.nested("root_finder")),
        );
        errors.extend(
            self.curve_building
                .validate()
                .into_iter()
                .map(|e| e.nested("curve_building")),
        );
        errors.extend(
            self.lmm_calibration
                .validate()
                .into_iter()
                .map(|e| e.nested("lmm_calibration")),
        );
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CalibrationTarget, JacobianStrategy};
    use strata_math::linear_algebra::DecompositionKind;

    #[test]
    fn test_empty_toml_is_default() {
        let config = StrataConfig::from_str_as("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, StrataConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "root_finder": { "strategy": "broyden", "decomposition": "lu" },
            "curve_building": { "target": "present_value" }
        }"#;
        let config = StrataConfig::from_str_as(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.root_finder.strategy, JacobianStrategy::Broyden);
        assert_eq!(config.root_finder.decomposition, DecompositionKind::Lu);
        assert_eq!(config.curve_building.target, CalibrationTarget::PresentValue);
        assert_eq!(config.lmm_calibration, LmmCalibrationConfig::default());
    }

    #[test]
    fn test_invalid_values_name_their_section() {
        let err = StrataConfig::from_str_as(
            "[root_finder]\nmax_steps = 0\n",
            ConfigFormat::Toml,
        )
        .unwrap_err();
        match err {
            ConfigError::Validation { field, .. } => assert_eq!(field, "root_finder.max_steps"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_strategy_is_a_parse_error() {
        let err = StrataConfig::from_str_as(
            "[root_finder]\nstrategy = \"secant\"\n",
            ConfigFormat::Toml,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Deserialization(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("c.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("d.yaml")).is_err());
    }
}
