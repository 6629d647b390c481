//! Linear algebra utilities.
//!
//! Dense real matrices and vectors are nalgebra's [`DMatrix<f64>`] and
//! [`DVector<f64>`]. The free functions in this module wrap the operations the
//! root finders and curve builders need with explicit dimension checks, so a
//! shape error surfaces as [`MathError::DimensionMismatch`] instead of a panic.
//!
//! Decompositions live in [`decomposition`].

pub mod decomposition;

pub use decomposition::{
    Decomposition, DecompositionKind, DecompositionResult, LuDecomposition, QrDecomposition,
    SvdDecomposition,
};

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Builds a matrix from rows, rejecting ragged input.
///
/// # Example
///
/// ```rust
/// use strata_math::linear_algebra::matrix_from_rows;
///
/// let m = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(m[(1, 0)], 3.0);
/// assert!(matrix_from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
/// ```
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> MathResult<DMatrix<f64>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(MathError::invalid_input(format!(
            "row {i} has {} entries, expected {ncols}",
            row.len()
        )));
    }
    let data: Vec<f64> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(nrows, ncols, &data))
}

fn check_same_shape(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MathResult<()> {
    if a.shape() != b.shape() {
        return Err(MathError::dimension_mismatch(a.shape(), b.shape()));
    }
    Ok(())
}

/// Returns `a + b`.
pub fn add(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    check_same_shape(a, b)?;
    Ok(a + b)
}

/// Returns `a - b`.
pub fn subtract(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    check_same_shape(a, b)?;
    Ok(a - b)
}

/// Returns the matrix product `a * b`.
pub fn multiply(a: &DMatrix<f64>, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    if a.ncols() != b.nrows() {
        return Err(MathError::dimension_mismatch(a.shape(), b.shape()));
    }
    Ok(a * b)
}

/// Returns the matrix-vector product `a * v`.
pub fn multiply_vector(a: &DMatrix<f64>, v: &DVector<f64>) -> MathResult<DVector<f64>> {
    if a.ncols() != v.len() {
        return Err(MathError::dimension_mismatch(a.shape(), (v.len(), 1)));
    }
    Ok(a * v)
}

/// Returns the vector-matrix product `vᵀ * a` as a column vector.
pub fn multiply_transposed_vector(v: &DVector<f64>, a: &DMatrix<f64>) -> MathResult<DVector<f64>> {
    if a.nrows() != v.len() {
        return Err(MathError::dimension_mismatch((1, v.len()), a.shape()));
    }
    Ok(a.tr_mul(v))
}

/// Returns `factor * a`.
#[must_use]
pub fn scale(a: &DMatrix<f64>, factor: f64) -> DMatrix<f64> {
    a * factor
}

/// Returns the transpose of `a`.
#[must_use]
pub fn transpose(a: &DMatrix<f64>) -> DMatrix<f64> {
    a.transpose()
}

/// Returns the outer product `u * vᵀ`.
#[must_use]
pub fn outer_product(u: &DVector<f64>, v: &DVector<f64>) -> DMatrix<f64> {
    u * v.transpose()
}

/// Returns the inner product `u · v`.
pub fn inner_product(u: &DVector<f64>, v: &DVector<f64>) -> MathResult<f64> {
    if u.len() != v.len() {
        return Err(MathError::dimension_mismatch((u.len(), 1), (v.len(), 1)));
    }
    Ok(u.dot(v))
}

/// Euclidean norm of a vector.
#[must_use]
pub fn norm2(v: &DVector<f64>) -> f64 {
    v.norm()
}

/// Maximum absolute entry of a vector.
#[must_use]
pub fn norm_inf(v: &DVector<f64>) -> f64 {
    v.amax()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ragged_rows_rejected() {
        let err = matrix_from_rows(&[vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, MathError::InvalidInput { .. }));
    }

    #[test]
    fn test_dimension_checks() {
        let a = DMatrix::<f64>::zeros(2, 3);
        let b = DMatrix::<f64>::zeros(2, 2);
        assert!(matches!(
            add(&a, &b),
            Err(MathError::DimensionMismatch { .. })
        ));
        assert!(multiply(&a, &b).is_err());
        assert!(multiply(&b, &a).is_ok());
        assert!(multiply_vector(&a, &DVector::zeros(2)).is_err());
        assert!(inner_product(&DVector::zeros(2), &DVector::zeros(3)).is_err());
    }

    #[test]
    fn test_products() {
        let a = matrix_from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let v = DVector::from_vec(vec![1.0, -1.0]);

        let av = multiply_vector(&a, &v).unwrap();
        assert_relative_eq!(av[0], -1.0);
        assert_relative_eq!(av[1], -1.0);

        let va = multiply_transposed_vector(&v, &a).unwrap();
        assert_relative_eq!(va[0], -2.0);
        assert_relative_eq!(va[1], -2.0);

        let outer = outer_product(&v, &v);
        assert_relative_eq!(outer[(0, 1)], -1.0);
        assert_relative_eq!(norm2(&v), 2.0_f64.sqrt());
        assert_relative_eq!(norm_inf(&av), 1.0);

        let sum = subtract(&add(&a, &a).unwrap(), &scale(&a, 2.0)).unwrap();
        assert_relative_eq!(sum.norm(), 0.0);
        assert_relative_eq!(transpose(&a)[(0, 1)], 3.0);
    }
}
