//! Successive calibration of LMM volatilities to physical swaptions.
//!
//! Swaptions are calibrated one after the other. Each one owns the LMM
//! periods between the end of the previous swaption's periods and its own
//! last payment, and a single multiplier on those volatilities is solved so
//! that the LMM price matches the swaption's target price.

mod engine;
mod objective;

pub use engine::{
    CalibratedSwaption, LmmCalibrationResult, SuccessiveRootFinderCalibrationEngine,
};
pub use objective::SwaptionPhysicalLmmDdCalibrationObjective;
