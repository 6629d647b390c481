//! Strata Configuration Layer
//!
//! Settings for the numerical parts of Strata, loaded from TOML or JSON.
//!
//! # Features
//!
//! - **Root finder**: tolerances, step cap, Jacobian strategy and decomposition
//!   of the Newton-type vector root finder
//! - **Curve building**: the calibration target (par spread or present value)
//! - **LMM calibration**: multiplier bounds and accuracies of the successive
//!   volatility calibration
//! - **Validation**: every section implements [`Validate`]
//!
//! # Example
//!
//! ```rust
//! use strata_config::{JacobianStrategy, StrataConfig, Validate};
//!
//! let mut config = StrataConfig::default();
//! config.root_finder.strategy = JacobianStrategy::ShermanMorrison;
//! assert!(config.is_valid());
//!
//! let finder = config.root_finder.root_finder().unwrap();
//! assert_eq!(finder.max_steps(), 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]

pub mod calibration;
pub mod error;
pub mod loader;
pub mod root_finder;

pub use calibration::{
    CalibrationTarget, CurveBuildingConfig, LmmCalibrationConfig, DEFAULT_FUNCTION_ACCURACY,
    DEFAULT_MAX_MULTIPLIER, DEFAULT_MIN_MULTIPLIER, DEFAULT_VARIABLE_ACCURACY,
};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use loader::{ConfigFormat, StrataConfig};
pub use root_finder::{JacobianStrategy, RootFinderConfig};
