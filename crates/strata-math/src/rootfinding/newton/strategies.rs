//! Jacobian strategies used by [`NewtonVectorRootFinder`](super::NewtonVectorRootFinder).
//!
//! A Newton-type iteration carries a matrix estimate, either of the Jacobian
//! `J` or of its inverse `J⁻¹`. Three independent policies act on it:
//!
//! - [`JacobianInitialization`] builds the first estimate from `J(x₀)`
//! - [`JacobianDirection`] turns the estimate and the residual `y` into the
//!   step `p` with `J p = y` (the iteration then moves to `x - λp`)
//! - [`JacobianUpdate`] produces the next estimate after a step
//!
//! Strategies are pure: they read their arguments and return new matrices.
//! Estimates of `J` pair with [`JacobianDirectionFunction`]; estimates of
//! `J⁻¹` pair with [`InverseJacobianDirectionFunction`].

use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::linear_algebra::Decomposition;

/// Evaluates the true Jacobian at a point.
pub type JacobianFunction<'a> = dyn Fn(&DVector<f64>) -> MathResult<DMatrix<f64>> + 'a;

/// Produces the starting matrix estimate.
pub trait JacobianInitialization: fmt::Debug + Send + Sync {
    /// Returns the estimate given the Jacobian at the initial point.
    fn initialize(&self, jacobian: &DMatrix<f64>) -> MathResult<DMatrix<f64>>;
}

/// Computes the Newton step from the current estimate and residual.
pub trait JacobianDirection: fmt::Debug + Send + Sync {
    /// Returns `p` such that `J p = y`.
    fn direction(&self, estimate: &DMatrix<f64>, y: &DVector<f64>) -> MathResult<DVector<f64>>;
}

/// Produces the estimate used by the next iteration.
pub trait JacobianUpdate: fmt::Debug + Send + Sync {
    /// Returns the new estimate after the step `delta_x` from the previous
    /// point to `x`, which changed the residual by `delta_y`.
    fn update(
        &self,
        jacobian: &JacobianFunction<'_>,
        x: &DVector<f64>,
        delta_x: &DVector<f64>,
        delta_y: &DVector<f64>,
        estimate: &DMatrix<f64>,
    ) -> MathResult<DMatrix<f64>>;
}

fn check_square(m: &DMatrix<f64>, what: &str) -> MathResult<usize> {
    if m.is_empty() {
        return Err(MathError::invalid_input(format!("{what} is empty")));
    }
    if !m.is_square() {
        return Err(MathError::invalid_input(format!(
            "{what} must be square, got {}x{}",
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(m.nrows())
}

fn check_vector(v: &DVector<f64>, n: usize) -> MathResult<()> {
    if v.len() != n {
        return Err(MathError::dimension_mismatch((n, n), (v.len(), 1)));
    }
    Ok(())
}

// ============================================================================
// Initialization
// ============================================================================

/// Uses the Jacobian at the initial point as the estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JacobianEstimateInitialization;

impl JacobianInitialization for JacobianEstimateInitialization {
    fn initialize(&self, jacobian: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
        check_square(jacobian, "Jacobian")?;
        Ok(jacobian.clone())
    }
}

/// Inverts the Jacobian at the initial point by solving against the identity.
#[derive(Debug, Clone)]
pub struct InverseJacobianEstimateInitialization {
    decomposition: Arc<dyn Decomposition>,
}

impl InverseJacobianEstimateInitialization {
    /// Creates the initialization with the decomposition used for inversion.
    #[must_use]
    pub fn new(decomposition: Arc<dyn Decomposition>) -> Self {
        Self { decomposition }
    }
}

impl JacobianInitialization for InverseJacobianEstimateInitialization {
    fn initialize(&self, jacobian: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
        check_square(jacobian, "Jacobian")?;
        self.decomposition.decompose(jacobian)?.inverse()
    }
}

// ============================================================================
// Direction
// ============================================================================

/// Solves `J p = y` by decomposing the Jacobian estimate.
#[derive(Debug, Clone)]
pub struct JacobianDirectionFunction {
    decomposition: Arc<dyn Decomposition>,
}

impl JacobianDirectionFunction {
    /// Creates the direction function with the decomposition used for solving.
    #[must_use]
    pub fn new(decomposition: Arc<dyn Decomposition>) -> Self {
        Self { decomposition }
    }
}

impl JacobianDirection for JacobianDirectionFunction {
    fn direction(&self, estimate: &DMatrix<f64>, y: &DVector<f64>) -> MathResult<DVector<f64>> {
        let n = check_square(estimate, "Jacobian estimate")?;
        check_vector(y, n)?;
        self.decomposition.decompose(estimate)?.solve_vector(y)
    }
}

/// Multiplies the residual by an inverse-Jacobian estimate.
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseJacobianDirectionFunction;

impl JacobianDirection for InverseJacobianDirectionFunction {
    fn direction(&self, estimate: &DMatrix<f64>, y: &DVector<f64>) -> MathResult<DVector<f64>> {
        let n = check_square(estimate, "inverse Jacobian estimate")?;
        check_vector(y, n)?;
        Ok(estimate * y)
    }
}

// ============================================================================
// Update
// ============================================================================

/// Re-evaluates the true Jacobian at the new point (full Newton).
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonDefaultUpdate;

impl JacobianUpdate for NewtonDefaultUpdate {
    fn update(
        &self,
        jacobian: &JacobianFunction<'_>,
        x: &DVector<f64>,
        _delta_x: &DVector<f64>,
        _delta_y: &DVector<f64>,
        _estimate: &DMatrix<f64>,
    ) -> MathResult<DMatrix<f64>> {
        if x.is_empty() {
            return Err(MathError::invalid_input("point is empty"));
        }
        jacobian(x)
    }
}

/// Broyden's rank-one update of the Jacobian estimate:
/// `J + (Δy - J Δx) Δxᵀ / (Δxᵀ Δx)`.
///
/// A zero step leaves the estimate unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct BroydenUpdate;

impl JacobianUpdate for BroydenUpdate {
    fn update(
        &self,
        _jacobian: &JacobianFunction<'_>,
        _x: &DVector<f64>,
        delta_x: &DVector<f64>,
        delta_y: &DVector<f64>,
        estimate: &DMatrix<f64>,
    ) -> MathResult<DMatrix<f64>> {
        let n = check_square(estimate, "Jacobian estimate")?;
        check_vector(delta_x, n)?;
        check_vector(delta_y, n)?;

        let length2 = delta_x.norm_squared();
        if length2 == 0.0 {
            return Ok(estimate.clone());
        }
        let v = delta_y - estimate * delta_x;
        Ok(estimate + (v * delta_x.transpose()) / length2)
    }
}

/// Sherman-Morrison rank-one update of the inverse-Jacobian estimate `H`:
/// `H + (Δx - H Δy) Δxᵀ H / (Δxᵀ H Δy)`.
///
/// This is Broyden's update carried out directly on the inverse. A zero
/// denominator leaves the estimate unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShermanMorrisonUpdate;

impl JacobianUpdate for ShermanMorrisonUpdate {
    fn update(
        &self,
        _jacobian: &JacobianFunction<'_>,
        _x: &DVector<f64>,
        delta_x: &DVector<f64>,
        delta_y: &DVector<f64>,
        estimate: &DMatrix<f64>,
    ) -> MathResult<DMatrix<f64>> {
        let n = check_square(estimate, "inverse Jacobian estimate")?;
        check_vector(delta_x, n)?;
        check_vector(delta_y, n)?;

        let h_dy = estimate * delta_y;
        let denom = delta_x.dot(&h_dy);
        if denom == 0.0 || !denom.is_finite() {
            return Ok(estimate.clone());
        }
        let u = delta_x - h_dy;
        let xt_h = estimate.tr_mul(delta_x).transpose();
        Ok(estimate + (u * xt_h) / denom)
    }
}
