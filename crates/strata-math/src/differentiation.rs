//! Finite-difference Jacobians of vector fields.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};

/// Default bump size.
pub const DEFAULT_EPS: f64 = 1e-6;

/// Finite-difference scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FiniteDifferenceType {
    /// `(f(x + h) - f(x)) / h`
    Forward,
    /// `(f(x + h) - f(x - h)) / 2h`
    #[default]
    Central,
    /// `(f(x) - f(x - h)) / h`
    Backward,
}

/// Approximates the Jacobian of `f: Rⁿ → Rᵐ` by bumping each input in turn.
#[derive(Debug, Clone, Copy)]
pub struct VectorFieldFirstOrderDifferentiator {
    eps: f64,
    scheme: FiniteDifferenceType,
}

impl Default for VectorFieldFirstOrderDifferentiator {
    fn default() -> Self {
        Self {
            eps: DEFAULT_EPS,
            scheme: FiniteDifferenceType::Central,
        }
    }
}

impl VectorFieldFirstOrderDifferentiator {
    /// Creates a differentiator.
    pub fn new(scheme: FiniteDifferenceType, eps: f64) -> MathResult<Self> {
        if !(eps.is_finite() && eps > 0.0) {
            return Err(MathError::invalid_input(format!(
                "finite-difference bump must be positive, got {eps}"
            )));
        }
        Ok(Self { eps, scheme })
    }

    /// Returns the `m x n` Jacobian of `f` at `x`.
    pub fn differentiate<F>(&self, f: F, x: &DVector<f64>) -> MathResult<DMatrix<f64>>
    where
        F: Fn(&DVector<f64>) -> MathResult<DVector<f64>>,
    {
        let n = x.len();
        if n == 0 {
            return Err(MathError::invalid_input("cannot differentiate at an empty point"));
        }
        let base = match self.scheme {
            FiniteDifferenceType::Central => None,
            _ => Some(f(x)?),
        };

        let mut columns: Vec<DVector<f64>> = Vec::with_capacity(n);
        for j in 0..n {
            let mut up = x.clone();
            let mut down = x.clone();
            up[j] += self.eps;
            down[j] -= self.eps;
            let column = match (self.scheme, &base) {
                (FiniteDifferenceType::Forward, Some(y)) => (f(&up)? - y) / self.eps,
                (FiniteDifferenceType::Backward, Some(y)) => (y - f(&down)?) / self.eps,
                _ => (f(&up)? - f(&down)?) / (2.0 * self.eps),
            };
            if let Some(first) = columns.first() {
                if first.len() != column.len() {
                    return Err(MathError::dimension_mismatch(
                        (first.len(), 1),
                        (column.len(), 1),
                    ));
                }
            }
            columns.push(column);
        }

        Ok(DMatrix::from_columns(&columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field(x: &DVector<f64>) -> MathResult<DVector<f64>> {
        Ok(DVector::from_vec(vec![
            x[0] * x[0] + x[1],
            x[0] * x[1].sin(),
            (x[1]).exp(),
        ]))
    }

    #[test]
    fn test_central_jacobian() {
        let x = DVector::from_vec(vec![1.5, 0.3]);
        let jac = VectorFieldFirstOrderDifferentiator::default()
            .differentiate(field, &x)
            .unwrap();

        assert_eq!(jac.shape(), (3, 2));
        assert_relative_eq!(jac[(0, 0)], 3.0, epsilon = 1e-8);
        assert_relative_eq!(jac[(0, 1)], 1.0, epsilon = 1e-8);
        assert_relative_eq!(jac[(1, 0)], 0.3_f64.sin(), epsilon = 1e-8);
        assert_relative_eq!(jac[(1, 1)], 1.5 * 0.3_f64.cos(), epsilon = 1e-8);
        assert_relative_eq!(jac[(2, 1)], 0.3_f64.exp(), epsilon = 1e-8);
    }

    #[test]
    fn test_forward_jacobian() {
        let x = DVector::from_vec(vec![1.5, 0.3]);
        let jac = VectorFieldFirstOrderDifferentiator::new(FiniteDifferenceType::Forward, 1e-7)
            .unwrap()
            .differentiate(field, &x)
            .unwrap();
        assert_relative_eq!(jac[(0, 0)], 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_eps() {
        assert!(VectorFieldFirstOrderDifferentiator::new(FiniteDifferenceType::Central, 0.0).is_err());
    }
}
