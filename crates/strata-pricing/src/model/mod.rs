//! Pricing models.

pub mod black;
pub mod lmm;

pub use lmm::LmmDdParameters;
