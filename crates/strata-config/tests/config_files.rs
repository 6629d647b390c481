//! Loading configuration files from disk.

use std::io::Write;

use proptest::prelude::*;
use strata_config::{ConfigError, ConfigFormat, JacobianStrategy, StrataConfig, Validate};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn toml_file_round_trips() {
    let mut config = StrataConfig::default();
    config.root_finder.strategy = JacobianStrategy::Broyden;
    config.lmm_calibration.function_accuracy = 1e-6;
    let text = config.to_string_as(ConfigFormat::Toml).unwrap();

    let file = write_temp(".toml", &text);
    assert_eq!(StrataConfig::load(file.path()).unwrap(), config);
}

#[test]
fn json_file_round_trips() {
    let config = StrataConfig::default();
    let text = config.to_string_as(ConfigFormat::Json).unwrap();

    let file = write_temp(".json", &text);
    assert_eq!(StrataConfig::load(file.path()).unwrap(), config);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = StrataConfig::load("/nonexistent/strata.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn unknown_extension_is_rejected() {
    let file = write_temp(".yaml", "root_finder: {}");
    let err = StrataConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

proptest! {
    #[test]
    fn multiplier_bounds_are_valid_iff_ordered(min in 0.01_f64..5.0, max in 0.01_f64..20.0) {
        let mut config = StrataConfig::default();
        config.lmm_calibration.min_multiplier = min;
        config.lmm_calibration.max_multiplier = max;
        prop_assert_eq!(config.is_valid(), max > min);
    }
}
