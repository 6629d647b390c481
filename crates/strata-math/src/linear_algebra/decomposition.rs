//! Matrix decompositions: LU, QR and SVD.
//!
//! Every decomposition implements [`Decomposition`], producing a boxed
//! [`DecompositionResult`] that can solve against vectors and matrices. The
//! root finders only depend on the traits, so the decomposition is chosen by
//! the caller (see [`DecompositionKind`]).
//!
//! A matrix is treated as numerically singular when its smallest pivot
//! (LU), smallest diagonal entry of R (QR) or smallest singular value (SVD) is
//! below `threshold` times the largest one. Singular input fails with
//! [`MathError::SingularMatrix`]; results never carry NaN.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use nalgebra::linalg::{LU, QR, SVD};
use nalgebra::{DMatrix, DVector, Dyn};
use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default relative threshold below which a matrix is considered singular.
pub const DEFAULT_SINGULARITY_THRESHOLD: f64 = 1e-13;

/// A matrix decomposition algorithm.
pub trait Decomposition: fmt::Debug + Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Decomposes a square matrix.
    fn decompose(&self, matrix: &DMatrix<f64>) -> MathResult<Box<dyn DecompositionResult>>;
}

/// The result of a decomposition, able to solve linear systems.
pub trait DecompositionResult: fmt::Debug + Send + Sync {
    /// Dimension of the decomposed (square) matrix.
    fn dimension(&self) -> usize;

    /// Solves `A x = b`.
    fn solve_vector(&self, b: &DVector<f64>) -> MathResult<DVector<f64>>;

    /// Solves `A X = B` column by column.
    fn solve_matrix(&self, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>>;

    /// Returns `A⁻¹`.
    fn inverse(&self) -> MathResult<DMatrix<f64>> {
        let n = self.dimension();
        self.solve_matrix(&DMatrix::identity(n, n))
    }
}

fn check_square(matrix: &DMatrix<f64>, name: &str) -> MathResult<usize> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(MathError::invalid_input(format!(
            "{name} decomposition needs a square matrix, got {rows}x{cols}"
        )));
    }
    if rows == 0 {
        return Err(MathError::invalid_input(format!(
            "{name} decomposition of an empty matrix"
        )));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "{name} decomposition of a matrix with non-finite entries"
        )));
    }
    Ok(rows)
}

fn check_rhs_rows(n: usize, rows: usize, cols: usize) -> MathResult<()> {
    if rows != n {
        return Err(MathError::dimension_mismatch((n, n), (rows, cols)));
    }
    Ok(())
}

/// True when the smallest magnitude is negligible against the largest.
fn is_degenerate(magnitudes: impl Iterator<Item = f64>, threshold: f64) -> bool {
    let (min, max) = magnitudes.fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    max == 0.0 || min <= threshold * max
}

// ============================================================================
// LU
// ============================================================================

/// LU decomposition with partial pivoting.
#[derive(Debug, Clone, Copy)]
pub struct LuDecomposition {
    threshold: f64,
}

impl Default for LuDecomposition {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

impl LuDecomposition {
    /// Creates an LU decomposition with a custom singularity threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Result of [`LuDecomposition`].
#[derive(Debug, Clone)]
pub struct LuResult {
    lu: LU<f64, Dyn, Dyn>,
    n: usize,
}

impl Decomposition for LuDecomposition {
    fn name(&self) -> &'static str {
        "LU"
    }

    fn decompose(&self, matrix: &DMatrix<f64>) -> MathResult<Box<dyn DecompositionResult>> {
        let n = check_square(matrix, self.name())?;
        let lu = matrix.clone().lu();
        let u = lu.u();
        if is_degenerate(u.diagonal().iter().map(|v| v.abs()), self.threshold) {
            return Err(MathError::singular(self.name()));
        }
        Ok(Box::new(LuResult { lu, n }))
    }
}

impl DecompositionResult for LuResult {
    fn dimension(&self) -> usize {
        self.n
    }

    fn solve_vector(&self, b: &DVector<f64>) -> MathResult<DVector<f64>> {
        check_rhs_rows(self.n, b.len(), 1)?;
        self.lu.solve(b).ok_or_else(|| MathError::singular("LU"))
    }

    fn solve_matrix(&self, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
        check_rhs_rows(self.n, b.nrows(), b.ncols())?;
        self.lu.solve(b).ok_or_else(|| MathError::singular("LU"))
    }
}

// ============================================================================
// QR
// ============================================================================

/// QR decomposition by Householder reflections.
#[derive(Debug, Clone, Copy)]
pub struct QrDecomposition {
    threshold: f64,
}

impl Default for QrDecomposition {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

impl QrDecomposition {
    /// Creates a QR decomposition with a custom singularity threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Result of [`QrDecomposition`].
#[derive(Debug, Clone)]
pub struct QrResult {
    qr: QR<f64, Dyn, Dyn>,
    n: usize,
}

impl Decomposition for QrDecomposition {
    fn name(&self) -> &'static str {
        "QR"
    }

    fn decompose(&self, matrix: &DMatrix<f64>) -> MathResult<Box<dyn DecompositionResult>> {
        let n = check_square(matrix, self.name())?;
        let qr = matrix.clone().qr();
        let r = qr.r();
        if is_degenerate(r.diagonal().iter().map(|v| v.abs()), self.threshold) {
            return Err(MathError::singular(self.name()));
        }
        Ok(Box::new(QrResult { qr, n }))
    }
}

impl DecompositionResult for QrResult {
    fn dimension(&self) -> usize {
        self.n
    }

    fn solve_vector(&self, b: &DVector<f64>) -> MathResult<DVector<f64>> {
        check_rhs_rows(self.n, b.len(), 1)?;
        self.qr.solve(b).ok_or_else(|| MathError::singular("QR"))
    }

    fn solve_matrix(&self, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
        check_rhs_rows(self.n, b.nrows(), b.ncols())?;
        self.qr.solve(b).ok_or_else(|| MathError::singular("QR"))
    }
}

// ============================================================================
// SVD
// ============================================================================

/// Singular value decomposition.
#[derive(Debug, Clone, Copy)]
pub struct SvdDecomposition {
    threshold: f64,
}

impl Default for SvdDecomposition {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SINGULARITY_THRESHOLD,
        }
    }
}

impl SvdDecomposition {
    /// Creates an SVD with a custom singularity threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }
}

/// Result of [`SvdDecomposition`].
#[derive(Debug, Clone)]
pub struct SvdResult {
    svd: SVD<f64, Dyn, Dyn>,
    n: usize,
}

impl SvdResult {
    /// Singular values in no particular order.
    #[must_use]
    pub fn singular_values(&self) -> &DVector<f64> {
        &self.svd.singular_values
    }

    /// Ratio of the largest to the smallest singular value.
    #[must_use]
    pub fn condition_number(&self) -> f64 {
        let max = self.svd.singular_values.max();
        let min = self.svd.singular_values.min();
        max / min
    }
}

impl Decomposition for SvdDecomposition {
    fn name(&self) -> &'static str {
        "SVD"
    }

    fn decompose(&self, matrix: &DMatrix<f64>) -> MathResult<Box<dyn DecompositionResult>> {
        let n = check_square(matrix, self.name())?;
        let svd = matrix.clone().svd(true, true);
        if is_degenerate(svd.singular_values.iter().copied(), self.threshold) {
            return Err(MathError::singular(self.name()));
        }
        Ok(Box::new(SvdResult { svd, n }))
    }
}

impl DecompositionResult for SvdResult {
    fn dimension(&self) -> usize {
        self.n
    }

    fn solve_vector(&self, b: &DVector<f64>) -> MathResult<DVector<f64>> {
        check_rhs_rows(self.n, b.len(), 1)?;
        self.svd
            .solve(b, 0.0)
            .map_err(|_| MathError::singular("SVD"))
    }

    fn solve_matrix(&self, b: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
        check_rhs_rows(self.n, b.nrows(), b.ncols())?;
        self.svd
            .solve(b, 0.0)
            .map_err(|_| MathError::singular("SVD"))
    }
}

// ============================================================================
// Selection by name
// ============================================================================

/// Named choice of decomposition, used by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DecompositionKind {
    /// LU with partial pivoting.
    Lu,
    /// Householder QR.
    Qr,
    /// Singular value decomposition.
    #[default]
    Svd,
}

impl DecompositionKind {
    /// Creates the decomposition with the default singularity threshold.
    #[must_use]
    pub fn decomposition(self) -> Arc<dyn Decomposition> {
        match self {
            Self::Lu => Arc::new(LuDecomposition::default()),
            Self::Qr => Arc::new(QrDecomposition::default()),
            Self::Svd => Arc::new(SvdDecomposition::default()),
        }
    }
}

impl fmt::Display for DecompositionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lu => "lu",
            Self::Qr => "qr",
            Self::Svd => "svd",
        };
        f.write_str(name)
    }
}

impl FromStr for DecompositionKind {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lu" => Ok(Self::Lu),
            "qr" => Ok(Self::Qr),
            "svd" => Ok(Self::Svd),
            other => Err(MathError::invalid_input(format!(
                "unknown decomposition '{other}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn system() -> (DMatrix<f64>, DVector<f64>) {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, -2.0, 1.0, -2.0, 4.0, -2.0, 1.0, -2.0, 4.0]);
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let b = &a * &x;
        (a, b)
    }

    fn all() -> Vec<Arc<dyn Decomposition>> {
        vec![
            DecompositionKind::Lu.decomposition(),
            DecompositionKind::Qr.decomposition(),
            DecompositionKind::Svd.decomposition(),
        ]
    }

    #[test]
    fn test_solve_vector_all_decompositions() {
        let (a, b) = system();
        for d in all() {
            let x = d.decompose(&a).unwrap().solve_vector(&b).unwrap();
            assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
            assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
            assert_relative_eq!(x[2], 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_inverse_all_decompositions() {
        let (a, _) = system();
        for d in all() {
            let inv = d.decompose(&a).unwrap().inverse().unwrap();
            let product = &a * &inv;
            for i in 0..3 {
                for j in 0..3 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_singular_matrix_fails() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        for d in all() {
            let err = d.decompose(&a).unwrap_err();
            assert!(err.is_singular(), "{} accepted a singular matrix", d.name());
        }
    }

    #[test]
    fn test_zero_matrix_fails() {
        let a = DMatrix::<f64>::zeros(2, 2);
        for d in all() {
            assert!(d.decompose(&a).unwrap_err().is_singular());
        }
    }

    #[test]
    fn test_non_square_rejected() {
        let a = DMatrix::<f64>::zeros(2, 3);
        for d in all() {
            assert!(matches!(
                d.decompose(&a),
                Err(MathError::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn test_rhs_dimension_checked() {
        let (a, _) = system();
        for d in all() {
            let result = d.decompose(&a).unwrap();
            assert!(matches!(
                result.solve_vector(&DVector::zeros(2)),
                Err(MathError::DimensionMismatch { .. })
            ));
        }
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("SVD".parse::<DecompositionKind>().unwrap(), DecompositionKind::Svd);
        assert_eq!("lu".parse::<DecompositionKind>().unwrap(), DecompositionKind::Lu);
        assert!("cholesky".parse::<DecompositionKind>().is_err());
        assert_eq!(DecompositionKind::default(), DecompositionKind::Svd);
    }
}
