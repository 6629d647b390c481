//! # Strata Math
//!
//! Numerical building blocks for the Strata rates analytics library.
//!
//! This crate provides:
//!
//! - **Linear Algebra**: checked matrix operations and LU / QR / SVD
//!   decompositions behind a common [`Decomposition`](linear_algebra::Decomposition) trait
//! - **Root Finding**: Brent and bracketing for scalar functions, and a
//!   Newton-type vector root finder with interchangeable Jacobian strategies
//! - **Differentiation**: finite-difference Jacobians of vector fields
//! - **Interpolation**: linear interpolation with node sensitivities
//!
//! The numeric layer logs through the `log` facade: one `trace!` record per
//! Newton step, `debug!` on convergence and `warn!` on failure.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod differentiation;
pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod rootfinding;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::differentiation::{FiniteDifferenceType, VectorFieldFirstOrderDifferentiator};
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator};
    pub use crate::linear_algebra::{
        Decomposition, DecompositionKind, DecompositionResult, LuDecomposition, QrDecomposition,
        SvdDecomposition,
    };
    pub use crate::rootfinding::newton::strategies::{
        BroydenUpdate, InverseJacobianDirectionFunction, InverseJacobianEstimateInitialization,
        JacobianDirection, JacobianDirectionFunction, JacobianEstimateInitialization,
        JacobianInitialization, JacobianUpdate, NewtonDefaultUpdate, ShermanMorrisonUpdate,
    };
    pub use crate::rootfinding::{
        bracket_root, brent, NewtonResult, NewtonVectorRootFinder, SolverConfig, SolverResult,
        SolverState,
    };
}

pub use error::{MathError, MathResult};
pub use nalgebra::{DMatrix, DVector};
