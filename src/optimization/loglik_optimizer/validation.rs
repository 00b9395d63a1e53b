//! Validation helpers for log-likelihood optimization.
//!
//! Tolerance checks run when options are built; gradient, parameter,
//! objective and Hessian checks run around every solver interaction so a
//! non-finite number never leaves the optimizer as a "result".
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Reason attached to a rejected tolerance, or `None` when it is acceptable.
fn tolerance_problem(tol: f64) -> Option<&'static str> {
    if !tol.is_finite() {
        Some("Tolerance must be finite.")
    } else if tol <= 0.0 {
        Some("Tolerance must be positive.")
    } else {
        None
    }
}

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|r| (t, r))) {
        Some((tol, reason)) => Err(OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol.and_then(|t| tolerance_problem(t).map(|r| (t, r))) {
        Some((tol, reason)) => Err(OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if `grad.len() != dim`.
/// - [`OptError::InvalidGradient`] for the first non-finite element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Validate and unwrap an estimated parameter vector.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if the solver produced no parameter.
/// - [`OptError::InvalidThetaHat`] for the first non-finite element.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if the matrix is not `dim × dim`.
/// - [`OptError::InvalidHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    match hessian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::InvalidHessian { row, col, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Rejection reasons for tolerances.
    // - First-offender reporting for gradients, estimates and Hessians.
    //
    // They intentionally DO NOT cover:
    // - How callers react to the errors.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive when given.
    //
    // Given
    // -----
    // - `None`, `Some(NaN)`, `Some(0.0)`.
    //
    // Expect
    // ------
    // - `Ok`, then errors carrying the matching reason.
    fn tolerance_checks_distinguish_reasons() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(matches!(
            verify_tol_grad(Some(f64::NAN)),
            Err(OptError::InvalidTolGrad { reason: "Tolerance must be finite.", .. })
        ));
        assert!(matches!(
            verify_tol_cost(Some(0.0)),
            Err(OptError::InvalidTolCost { reason: "Tolerance must be positive.", .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Gradient and estimate validation report the first offending index.
    //
    // Given
    // -----
    // - Vectors with a non-finite entry at index 1.
    //
    // Expect
    // ------
    // - `index == 1` in both errors; a short gradient is a dimension mismatch.
    fn vector_validation_reports_first_offender() {
        assert!(matches!(
            validate_grad(&array![0.0, f64::INFINITY, f64::NAN], 3),
            Err(OptError::InvalidGradient { index: 1, .. })
        ));
        assert!(matches!(
            validate_grad(&array![0.0], 2),
            Err(OptError::GradientDimMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            validate_theta_hat(Some(array![1.0, f64::NAN])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
    }

    #[test]
    // Purpose
    // -------
    // Hessian validation checks shape before content.
    //
    // Given
    // -----
    // - A 2×2 matrix checked against dim 3, and one with a NaN at (1, 0).
    //
    // Expect
    // ------
    // - `HessianDimMismatch`, then `InvalidHessian { row: 1, col: 0 }`.
    fn hessian_validation_checks_shape_then_entries() {
        let h = array![[1.0, 0.0], [f64::NAN, 1.0]];
        assert!(matches!(validate_hessian(&h, 3), Err(OptError::HessianDimMismatch { .. })));
        assert!(matches!(
            validate_hessian(&h, 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
    }
}
