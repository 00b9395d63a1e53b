//! inference::hessian — standard errors from observed information.
//!
//! Purpose
//! -------
//! Turn a gradient map evaluated around an estimate `θ̂` into per-parameter
//! standard errors. The observed information `J(θ̂)` is built with
//! [`compute_hessian`] and inverted through a truncated symmetric
//! eigendecomposition, so weakly identified directions inflate their SEs
//! instead of producing `inf` or `NaN`.
//!
//! Conventions
//! -----------
//! - The gradient map passed to [`calc_standard_errors`] is the gradient of
//!   the **negative** log-likelihood on the scale whose variance is wanted
//!   (the SFA estimator uses the total, not the average, log-likelihood).
//! - Eigenvalues at or below [`EIGEN_EPS`] are treated as zero.
//! - No explicit inverse is formed; [`symmetric_pinv`] is shared with the
//!   OLS code in `regression`.
use crate::optimization::{
    errors::OptResult, loglik_optimizer::finite_diff::compute_hessian,
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Classical standard errors at `theta_hat`.
///
/// Computes `J(θ̂)` as the finite-difference Jacobian of `f` and returns
/// `sqrt(diag(J⁺))`.
///
/// # Errors
/// Any error [`compute_hessian`] returns (dimension mismatch, non-finite
/// entries).
///
/// # Examples
/// ```rust
/// # use ndarray::array;
/// # use efficiency_panel::inference::hessian::calc_standard_errors;
/// let a = array![[4.0, 0.0], [0.0, 1.0]];
/// let f = |theta: &ndarray::Array1<f64>| a.dot(theta);
/// let se = calc_standard_errors(&f, &array![1.0, -1.0]).expect("finite information");
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    f: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let obs_info = compute_hessian(f, theta_hat)?;
    let cov = symmetric_pinv(&obs_info);
    Ok(cov.diag().mapv(|v| v.max(0.0).sqrt()))
}

/// Moore–Penrose pseudo-inverse of a symmetric matrix.
///
/// `A⁺ = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k`. Negative and near-zero
/// eigenvalues are dropped, so the result is positive semi-definite.
pub fn symmetric_pinv(a: &Array2<f64>) -> Array2<f64> {
    let n = a.nrows();
    let eigen = to_dmatrix(a).symmetric_eigen();
    let q = eigen.eigenvectors;
    let mut pinv = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigen.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            let qi = q[(i, k)] / lambda;
            for j in 0..n {
                pinv[[i, j]] += qi * q[(j, k)];
            }
        }
    }
    pinv
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into `nalgebra` storage, column by column.
pub(crate) fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - SEs for quadratic objectives with known information matrices.
    // - Pseudo-inverse behavior on full-rank and singular matrices.
    //
    // They intentionally DO NOT cover:
    // - SFA-specific inference (see `efficiency::sfa`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Classical SEs equal `sqrt(diag(A⁻¹))` for a linear gradient map.
    //
    // Given
    // -----
    // - g(θ) = Aθ with A = [[2, 1], [1, 2]] (A⁻¹ = [[2, −1], [−1, 2]] / 3).
    //
    // Expect
    // ------
    // - Both SEs ≈ sqrt(2/3).
    fn calc_standard_errors_matches_inverse_diagonal() {
        // Arrange
        let a = array![[2.0, 1.0], [1.0, 2.0]];
        let f = |theta: &Array1<f64>| a.dot(theta);

        // Act
        let se = calc_standard_errors(&f, &array![0.2, 0.4]).expect("finite information");

        // Assert
        let expected = (2.0f64 / 3.0).sqrt();
        assert!((se[0] - expected).abs() < 1e-6);
        assert!((se[1] - expected).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A singular matrix has its null direction dropped instead of blowing up.
    //
    // Given
    // -----
    // - A = [[1, 1], [1, 1]] (eigenvalues 2 and 0).
    //
    // Expect
    // ------
    // - A⁺ = A / 4, every entry finite.
    fn symmetric_pinv_drops_null_directions() {
        // Arrange
        let a = array![[1.0, 1.0], [1.0, 1.0]];

        // Act
        let pinv = symmetric_pinv(&a);

        // Assert
        for v in pinv.iter() {
            assert!((v - 0.25).abs() < 1e-10);
        }
    }

    #[test]
    fn symmetric_pinv_inverts_diagonal_matrix() {
        let pinv = symmetric_pinv(&array![[4.0, 0.0], [0.0, 0.5]]);
        assert!((pinv[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((pinv[[1, 1]] - 2.0).abs() < 1e-12);
        assert!(pinv[[0, 1]].abs() < 1e-12);
    }
}
