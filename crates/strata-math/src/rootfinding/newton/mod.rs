//! Newton-type root finder for vector functions `f: Rⁿ → Rⁿ`.
//!
//! The iteration keeps a matrix estimate (of the Jacobian or its inverse)
//! whose handling is delegated to the strategies in [`strategies`]. Each step:
//!
//! 1. computes the Newton direction `p` from the estimate and `f(x)`;
//! 2. backtracks on `λ` (halving, down to [`MIN_STEP_FRACTION`]) until
//!    `‖f(x - λp)‖` decreases;
//! 3. updates the estimate;
//! 4. stops when `‖Δx‖ ≤ abs + rel·‖x‖` and `‖f(x)‖ ≤ abs` hold together.
//!
//! Running out of steps, or a line search that cannot reduce the residual,
//! fails with [`MathError::RootNotFound`] carrying the last estimate. Singular
//! matrices met by the strategies propagate unchanged.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DVector;
//! use strata_math::linear_algebra::DecompositionKind;
//! use strata_math::rootfinding::NewtonVectorRootFinder;
//!
//! let finder = NewtonVectorRootFinder::newton_default(
//!     1e-10, 1e-10, 100, DecompositionKind::Svd.decomposition(),
//! ).unwrap();
//!
//! let f = |x: &DVector<f64>| -> strata_math::MathResult<DVector<f64>> {
//!     Ok(DVector::from_vec(vec![x[0] * x[0] + x[1] * x[1] - 4.0, x[0] - x[1]]))
//! };
//! let result = finder.solve(f, &DVector::from_vec(vec![1.0, 0.5])).unwrap();
//! assert!((result.root[0] - 2.0_f64.sqrt()).abs() < 1e-9);
//! ```

pub mod strategies;

use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};
use nalgebra::{DMatrix, DVector};

use crate::differentiation::VectorFieldFirstOrderDifferentiator;
use crate::error::{MathError, MathResult};
use crate::linear_algebra::Decomposition;

use strategies::{
    BroydenUpdate, InverseJacobianDirectionFunction, InverseJacobianEstimateInitialization,
    JacobianDirection, JacobianDirectionFunction, JacobianEstimateInitialization,
    JacobianInitialization, JacobianUpdate, NewtonDefaultUpdate, ShermanMorrisonUpdate,
};

/// Default absolute tolerance.
pub const DEFAULT_ABSOLUTE_TOLERANCE: f64 = 1e-10;

/// Default relative tolerance.
pub const DEFAULT_RELATIVE_TOLERANCE: f64 = 1e-10;

/// Default maximum number of Newton steps.
pub const DEFAULT_MAX_STEPS: u32 = 100;

/// Smallest step fraction tried by the line search.
pub const MIN_STEP_FRACTION: f64 = 1e-6;

/// Lifecycle of one `solve` call.
///
/// A returned [`NewtonResult`] carries the final state. A call that ends in
/// an error stopped in [`SolverState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// Evaluating the function and building the first estimate.
    Initializing,
    /// Taking Newton steps.
    Iterating,
    /// Both tolerances met.
    Converged,
    /// Step budget exhausted or line search stalled.
    Failed,
}

impl SolverState {
    /// Final state of a finished `solve` call.
    pub fn of(outcome: &MathResult<NewtonResult>) -> Self {
        match outcome {
            Ok(result) => result.state,
            Err(_) => Self::Failed,
        }
    }
}

impl fmt::Display for SolverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::Iterating => "iterating",
            Self::Converged => "converged",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A converged solution.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// The root.
    pub root: DVector<f64>,
    /// Function value at the root.
    pub function_value: DVector<f64>,
    /// Number of Newton steps taken.
    pub iterations: u32,
    /// State the solver stopped in.
    pub state: SolverState,
}

impl NewtonResult {
    /// Euclidean norm of the function value at the root.
    #[must_use]
    pub fn residual_norm(&self) -> f64 {
        self.function_value.norm()
    }
}

/// Newton-type vector root finder with pluggable Jacobian strategies.
#[derive(Debug)]
pub struct NewtonVectorRootFinder {
    absolute_tolerance: f64,
    relative_tolerance: f64,
    max_steps: u32,
    initialization: Box<dyn JacobianInitialization>,
    direction: Box<dyn JacobianDirection>,
    update: Box<dyn JacobianUpdate>,
    differentiator: VectorFieldFirstOrderDifferentiator,
}

impl NewtonVectorRootFinder {
    /// Creates a root finder from its strategies.
    pub fn new(
        absolute_tolerance: f64,
        relative_tolerance: f64,
        max_steps: u32,
        initialization: Box<dyn JacobianInitialization>,
        direction: Box<dyn JacobianDirection>,
        update: Box<dyn JacobianUpdate>,
    ) -> MathResult<Self> {
        if !(absolute_tolerance.is_finite() && absolute_tolerance >= 0.0) {
            return Err(MathError::invalid_input(format!(
                "absolute tolerance must be non-negative, got {absolute_tolerance}"
            )));
        }
        if !(relative_tolerance.is_finite() && relative_tolerance >= 0.0) {
            return Err(MathError::invalid_input(format!(
                "relative tolerance must be non-negative, got {relative_tolerance}"
            )));
        }
        if max_steps == 0 {
            return Err(MathError::invalid_input("max steps must be positive"));
        }
        Ok(Self {
            absolute_tolerance,
            relative_tolerance,
            max_steps,
            initialization,
            direction,
            update,
            differentiator: VectorFieldFirstOrderDifferentiator::default(),
        })
    }

    /// Full Newton: the true Jacobian is re-evaluated at every step and
    /// solved with `decomposition`.
    pub fn newton_default(
        absolute_tolerance: f64,
        relative_tolerance: f64,
        max_steps: u32,
        decomposition: Arc<dyn Decomposition>,
    ) -> MathResult<Self> {
        Self::new(
            absolute_tolerance,
            relative_tolerance,
            max_steps,
            Box::new(JacobianEstimateInitialization),
            Box::new(JacobianDirectionFunction::new(decomposition)),
            Box::new(NewtonDefaultUpdate),
        )
    }

    /// Broyden: the Jacobian is computed once and then rank-one updated.
    pub fn broyden(
        absolute_tolerance: f64,
        relative_tolerance: f64,
        max_steps: u32,
        decomposition: Arc<dyn Decomposition>,
    ) -> MathResult<Self> {
        Self::new(
            absolute_tolerance,
            relative_tolerance,
            max_steps,
            Box::new(JacobianEstimateInitialization),
            Box::new(JacobianDirectionFunction::new(decomposition)),
            Box::new(BroydenUpdate),
        )
    }

    /// Broyden on the inverse: the Jacobian is inverted once and the inverse
    /// is rank-one updated, so no system is solved after the first step.
    pub fn sherman_morrison(
        absolute_tolerance: f64,
        relative_tolerance: f64,
        max_steps: u32,
        decomposition: Arc<dyn Decomposition>,
    ) -> MathResult<Self> {
        Self::new(
            absolute_tolerance,
            relative_tolerance,
            max_steps,
            Box::new(InverseJacobianEstimateInitialization::new(decomposition)),
            Box::new(InverseJacobianDirectionFunction),
            Box::new(ShermanMorrisonUpdate),
        )
    }

    /// Replaces the finite-difference differentiator used by [`solve`](Self::solve).
    #[must_use]
    pub fn with_differentiator(mut self, differentiator: VectorFieldFirstOrderDifferentiator) -> Self {
        self.differentiator = differentiator;
        self
    }

    /// Absolute tolerance.
    pub fn absolute_tolerance(&self) -> f64 {
        self.absolute_tolerance
    }

    /// Relative tolerance.
    pub fn relative_tolerance(&self) -> f64 {
        self.relative_tolerance
    }

    /// Maximum number of steps.
    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    /// Solves `f(x) = 0` from `start`, with a finite-difference Jacobian.
    pub fn solve<F>(&self, function: F, start: &DVector<f64>) -> MathResult<NewtonResult>
    where
        F: Fn(&DVector<f64>) -> MathResult<DVector<f64>>,
    {
        let differentiator = self.differentiator;
        let jacobian = |x: &DVector<f64>| differentiator.differentiate(&function, x);
        self.solve_with_jacobian(&function, jacobian, start)
    }

    /// Solves `f(x) = 0` from `start` with an analytic Jacobian.
    pub fn solve_with_jacobian<F, J>(
        &self,
        function: F,
        jacobian: J,
        start: &DVector<f64>,
    ) -> MathResult<NewtonResult>
    where
        F: Fn(&DVector<f64>) -> MathResult<DVector<f64>>,
        J: Fn(&DVector<f64>) -> MathResult<DMatrix<f64>>,
    {
        let mut state = SolverState::Initializing;
        trace!("newton root finder: {state}");
        if start.is_empty() {
            return Err(MathError::invalid_input("initial guess is empty"));
        }

        let mut x = start.clone();
        let mut y = evaluate(&function, &x)?;
        if y.len() != x.len() {
            return Err(MathError::dimension_mismatch((x.len(), 1), (y.len(), 1)));
        }
        if y.norm() <= self.absolute_tolerance {
            debug!("initial guess is already a root (|f| = {:.3e})", y.norm());
            return Ok(NewtonResult {
                root: x,
                function_value: y,
                iterations: 0,
                state: transition(state, SolverState::Converged),
            });
        }
        let mut estimate = self.initialization.initialize(&jacobian(&x)?)?;
        let jacobian_ref: &strategies::JacobianFunction<'_> = &jacobian;

        state = transition(state, SolverState::Iterating);
        let mut iterations = 0;
        while iterations < self.max_steps {
            iterations += 1;
            let p = self.direction.direction(&estimate, &y)?;

            let Some((x_new, y_new)) = line_search(&function, &x, &y, &p, self.absolute_tolerance)?
            else {
                transition(state, SolverState::Failed);
                warn!(
                    "line search stalled at step {iterations} (|f| = {:.3e})",
                    y.norm()
                );
                return Err(MathError::root_not_found(
                    iterations,
                    y.norm(),
                    x.iter().copied().collect(),
                ));
            };

            let delta_x = &x_new - &x;
            let delta_y = &y_new - &y;
            estimate = self
                .update
                .update(jacobian_ref, &x_new, &delta_x, &delta_y, &estimate)?;
            x = x_new;
            y = y_new;
            trace!(
                "newton step {iterations}: |dx| = {:.3e}, |f| = {:.3e}",
                delta_x.norm(),
                y.norm()
            );

            if self.is_converged(&delta_x, &x, &y) {
                state = transition(state, SolverState::Converged);
                debug!(
                    "newton converged in {iterations} steps (|f| = {:.3e})",
                    y.norm()
                );
                return Ok(NewtonResult {
                    root: x,
                    function_value: y,
                    iterations,
                    state,
                });
            }
        }

        transition(state, SolverState::Failed);
        warn!(
            "newton failed to converge in {} steps (|f| = {:.3e})",
            self.max_steps,
            y.norm()
        );
        Err(MathError::root_not_found(
            self.max_steps,
            y.norm(),
            x.iter().copied().collect(),
        ))
    }

    fn is_converged(&self, delta_x: &DVector<f64>, x: &DVector<f64>, y: &DVector<f64>) -> bool {
        delta_x.norm() <= self.absolute_tolerance + self.relative_tolerance * x.norm()
            && y.norm() <= self.absolute_tolerance
    }
}

fn transition(from: SolverState, to: SolverState) -> SolverState {
    trace!("newton root finder: {from} -> {to}");
    to
}

fn evaluate<F>(function: &F, x: &DVector<f64>) -> MathResult<DVector<f64>>
where
    F: Fn(&DVector<f64>) -> MathResult<DVector<f64>>,
{
    let y = function(x)?;
    if y.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "function is not finite at {:?}",
            x.as_slice()
        )));
    }
    Ok(y)
}

/// Backtracks from the full step until the residual decreases.
///
/// Points where the function fails or is not finite count as no decrease.
/// Returns `None` when the step fraction falls below [`MIN_STEP_FRACTION`].
fn line_search<F>(
    function: &F,
    x: &DVector<f64>,
    y: &DVector<f64>,
    p: &DVector<f64>,
    absolute_tolerance: f64,
) -> MathResult<Option<(DVector<f64>, DVector<f64>)>>
where
    F: Fn(&DVector<f64>) -> MathResult<DVector<f64>>,
{
    let g0 = y.norm_squared();
    let mut lambda = 1.0;
    while lambda >= MIN_STEP_FRACTION {
        let candidate = x - p * lambda;
        match evaluate(function, &candidate) {
            Ok(y_new) => {
                let g1 = y_new.norm_squared();
                if g1 < g0 || g1.sqrt() <= absolute_tolerance {
                    return Ok(Some((candidate, y_new)));
                }
            }
            Err(MathError::InvalidInput { .. }) => {}
            Err(e) => return Err(e),
        }
        lambda *= 0.5;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear_algebra::DecompositionKind;
    use approx::assert_relative_eq;

    fn circle_line(x: &DVector<f64>) -> MathResult<DVector<f64>> {
        Ok(DVector::from_vec(vec![
            x[0] * x[0] + x[1] * x[1] - 4.0,
            x[0] - x[1],
        ]))
    }

    fn circle_line_jacobian(x: &DVector<f64>) -> MathResult<DMatrix<f64>> {
        Ok(DMatrix::from_row_slice(
            2,
            2,
            &[2.0 * x[0], 2.0 * x[1], 1.0, -1.0],
        ))
    }

    fn finders() -> Vec<NewtonVectorRootFinder> {
        let d = DecompositionKind::Lu.decomposition();
        vec![
            NewtonVectorRootFinder::newton_default(1e-10, 1e-10, 100, d.clone()).unwrap(),
            NewtonVectorRootFinder::broyden(1e-10, 1e-10, 100, d.clone()).unwrap(),
            NewtonVectorRootFinder::sherman_morrison(1e-10, 1e-10, 100, d).unwrap(),
        ]
    }

    #[test]
    fn test_all_strategies_converge() {
        let start = DVector::from_vec(vec![1.0, 0.5]);
        for finder in finders() {
            let result = finder
                .solve_with_jacobian(circle_line, circle_line_jacobian, &start)
                .unwrap();
            assert_relative_eq!(result.root[0], 2.0_f64.sqrt(), epsilon = 1e-9);
            assert_relative_eq!(result.root[1], 2.0_f64.sqrt(), epsilon = 1e-9);
            assert!(result.residual_norm() <= 1e-10);
            assert_eq!(result.state, SolverState::Converged);
        }
    }

    #[test]
    fn test_finite_difference_jacobian() {
        let finder = NewtonVectorRootFinder::newton_default(
            1e-10,
            1e-10,
            100,
            DecompositionKind::Svd.decomposition(),
        )
        .unwrap();
        let result = finder
            .solve(circle_line, &DVector::from_vec(vec![3.0, 1.0]))
            .unwrap();
        assert_relative_eq!(result.root[0], 2.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_scalar_root() {
        let finder = NewtonVectorRootFinder::newton_default(
            1e-12,
            1e-12,
            50,
            DecompositionKind::Qr.decomposition(),
        )
        .unwrap();
        let f = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0].exp() - 3.0))
        };
        let result = finder.solve(f, &DVector::from_element(1, 0.0)).unwrap();
        assert_relative_eq!(result.root[0], 3.0_f64.ln(), epsilon = 1e-10);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_start_at_root() {
        let finders = finders();
        let finder = &finders[0];
        let root = DVector::from_vec(vec![2.0_f64.sqrt(), 2.0_f64.sqrt()]);
        let outcome = finder.solve(circle_line, &root);
        assert_eq!(SolverState::of(&outcome), SolverState::Converged);
        assert_eq!(outcome.unwrap().iterations, 0);
    }

    #[test]
    fn test_no_root_fails() {
        let finder = NewtonVectorRootFinder::newton_default(
            1e-10,
            1e-10,
            20,
            DecompositionKind::Lu.decomposition(),
        )
        .unwrap();
        let f = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let err = finder.solve(f, &DVector::from_element(1, 0.5)).unwrap_err();
        match err {
            MathError::RootNotFound {
                iterations,
                residual_norm,
                estimate,
            } => {
                assert!(iterations <= 20);
                assert!(residual_norm >= 1.0);
                assert_eq!(estimate.len(), 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_step_budget_exhausted() {
        let finder = NewtonVectorRootFinder::newton_default(
            1e-14,
            0.0,
            2,
            DecompositionKind::Lu.decomposition(),
        )
        .unwrap();
        let outcome = finder.solve_with_jacobian(
            circle_line,
            circle_line_jacobian,
            &DVector::from_vec(vec![10.0, -3.0]),
        );
        assert_eq!(SolverState::of(&outcome), SolverState::Failed);
        assert!(matches!(
            outcome.unwrap_err(),
            MathError::RootNotFound { iterations: 2, .. }
        ));
    }

    #[test]
    fn test_singular_jacobian_propagates() {
        let finders = finders();
        let f = |x: &DVector<f64>| -> MathResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![
                x[0] + x[1] - 1.0,
                2.0 * (x[0] + x[1]) - 3.0,
            ]))
        };
        let j = |_: &DVector<f64>| -> MathResult<DMatrix<f64>> {
            Ok(DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 2.0, 2.0]))
        };
        let err = finders[0]
            .solve_with_jacobian(f, j, &DVector::from_vec(vec![0.0, 0.0]))
            .unwrap_err();
        assert!(err.is_singular());
    }

    #[test]
    fn test_invalid_configuration() {
        let d = DecompositionKind::Lu.decomposition();
        assert!(NewtonVectorRootFinder::newton_default(-1.0, 1e-10, 10, d.clone()).is_err());
        assert!(NewtonVectorRootFinder::newton_default(1e-10, f64::NAN, 10, d.clone()).is_err());
        assert!(NewtonVectorRootFinder::newton_default(1e-10, 1e-10, 0, d).is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        let finders = finders();
        let f = |_: &DVector<f64>| -> MathResult<DVector<f64>> { Ok(DVector::from_element(3, 1.0)) };
        let err = finders[0]
            .solve(f, &DVector::from_vec(vec![0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, MathError::DimensionMismatch { .. }));
    }
}
