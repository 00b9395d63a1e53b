//! Numerical stability utilities.
//!
//! Provides safe implementations of common nonlinear transforms
//! that are prone to overflow/underflow in naïve form, plus the standard
//! normal helpers used by composed-error likelihoods.
//! The functions here follow guarded strategies similar to those
//! in major ML libraries (e.g. PyTorch, TensorFlow), using explicit
//! cutoffs (`x > 20.0`) to keep `f64` arithmetic in a well-conditioned regime.
//!
//! # Provided items
//! - [`SIGMA_FLOOR`]: lower bound added to every positive scale parameter.
//! - [`EIGEN_EPS`], [`GENERAL_TOL`]: shared tolerances for eigenvalue
//!   truncation and generic zero tests.
//! - [`safe_softplus(x)`]: stable version of `ln(1 + exp(x))`,
//!   mapping ℝ → (0, ∞) without overflow.
//! - [`safe_softplus_inv(x)`]: inverse of softplus, mapping
//!   (0, ∞) → ℝ without catastrophic cancellation.
//! - [`safe_logistic(x)`]: derivative of softplus, mapping ℝ → (0, 1).
//! - [`norm_pdf`], [`norm_cdf`], [`log_norm_cdf`], [`inv_mills`]: standard
//!   normal density, distribution, log-distribution and the ratio
//!   `φ(z)/Φ(z)`, with an asymptotic branch deep in the left tail.

use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Lower bound for scale parameters mapped through softplus.
///
/// Keeps `σ_v` and `σ_u` away from zero so the composed-error
/// log-likelihood stays bounded when residuals fit (almost) perfectly.
pub const SIGMA_FLOOR: f64 = 1e-6;

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Generic absolute tolerance for "is this numerically zero" checks.
pub const GENERAL_TOL: f64 = 1e-12;

/// Below this argument `Φ(z)` is evaluated through its asymptotic series.
const LEFT_TAIL_CUTOFF: f64 = -30.0;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// Computes softplus without overflow for large positive `x` and
/// with good precision for large negative `x`. This implementation
/// uses a simple piecewise guard:
///
/// - For sufficiently large `x`, `softplus(x) ≈ x + ln1p(exp(-x)) ≈ x`.
/// - Otherwise, it falls back to `ln1p(exp(x))`.
///
/// # Parameters
/// - `x`: real input
///
/// # Returns
/// - `softplus(x)` as `f64`.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: solves for `t` in
/// `softplus(t) = x`, returning `t = ln(exp(x) - 1)`.
///
/// - For sufficiently large `x`, `ln(exp(x) - 1) ≈ x`.
/// - Otherwise, it uses `ln(expm1(x))`.
///
/// # Parameters
/// - `x`: a positive real (the softplus output), must be finite and `> 0`.
///
/// # Returns
/// - `t` such that `softplus(t) = x`.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic `1 / (1 + exp(-x))`, the derivative of
/// [`safe_softplus`].
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Standard normal density `φ(z)`.
pub fn norm_pdf(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * PI).sqrt()
}

/// Standard normal distribution function `Φ(z) = ½ erfc(−z/√2)`.
pub fn norm_cdf(z: f64) -> f64 {
    0.5 * erfc(-z * FRAC_1_SQRT_2)
}

/// `ln Φ(z)` without underflow in the left tail.
///
/// For `z < -30` uses `ln φ(z) − ln(−z) + ln(1 − z⁻² + 3z⁻⁴)`.
pub fn log_norm_cdf(z: f64) -> f64 {
    if z < LEFT_TAIL_CUTOFF {
        let z2 = z * z;
        let series = 1.0 - 1.0 / z2 + 3.0 / (z2 * z2);
        -0.5 * z2 - 0.5 * (2.0 * PI).ln() - (-z).ln() + series.ln()
    } else {
        norm_cdf(z).ln()
    }
}

/// Inverse Mills ratio `φ(z)/Φ(z)`.
///
/// In the far left tail the ratio behaves like `−z / (1 − z⁻² + 3z⁻⁴)`.
pub fn inv_mills(z: f64) -> f64 {
    if z < LEFT_TAIL_CUTOFF {
        let z2 = z * z;
        -z / (1.0 - 1.0 / z2 + 3.0 / (z2 * z2))
    } else {
        (-0.5 * z * z - 0.5 * (2.0 * PI).ln() - log_norm_cdf(z)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of stable transforms with naïve formulas on safe grids.
    // - Continuity of the left-tail branches of `log_norm_cdf` / `inv_mills`.
    //
    // They intentionally DO NOT cover:
    // - Likelihood-level behavior (see `efficiency::sfa`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Softplus and its inverse agree with the naïve formulas and invert
    // each other on a moderate grid.
    //
    // Given
    // -----
    // - x ∈ {−5, −1, 0, 1, 5}.
    //
    // Expect
    // ------
    // - `safe_softplus(x) ≈ ln(1 + eˣ)` and `safe_softplus_inv(safe_softplus(x)) ≈ x`.
    fn softplus_matches_naive_and_inverts() {
        for &x in &[-5.0_f64, -1.0, 0.0, 1.0, 5.0] {
            // Act
            let sp = safe_softplus(x);

            // Assert
            assert_relative_eq!(sp, (1.0 + x.exp()).ln(), epsilon = 1e-12);
            assert_relative_eq!(safe_softplus_inv(sp), x, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // The logistic is the derivative of softplus.
    //
    // Given
    // -----
    // - A central finite difference of softplus at several points.
    //
    // Expect
    // ------
    // - Agreement with `safe_logistic` to ~1e-6.
    fn logistic_is_softplus_derivative() {
        let h = 1e-5;
        for &x in &[-30.0_f64, -2.0, 0.0, 3.0, 40.0] {
            let fd = (safe_softplus(x + h) - safe_softplus(x - h)) / (2.0 * h);
            assert_relative_eq!(safe_logistic(x), fd, epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Left-tail asymptotics join the direct evaluation without a visible jump.
    //
    // Given
    // -----
    // - Arguments just either side of the cutoff.
    //
    // Expect
    // ------
    // - `log_norm_cdf` and `inv_mills` differ by a tiny relative amount.
    fn left_tail_branches_are_continuous() {
        // Arrange
        let below = LEFT_TAIL_CUTOFF - 1e-9;
        let above = LEFT_TAIL_CUTOFF + 1e-9;

        // Act / Assert
        assert_relative_eq!(log_norm_cdf(below), log_norm_cdf(above), max_relative = 1e-6);
        assert_relative_eq!(inv_mills(below), inv_mills(above), max_relative = 1e-6);
        assert!(log_norm_cdf(-60.0).is_finite());
        assert!(inv_mills(-60.0) > 59.0);
    }

    #[test]
    // Purpose
    // -------
    // Known values of the standard normal.
    //
    // Given
    // -----
    // - z = 0 and z = 1.96.
    //
    // Expect
    // ------
    // - Φ(0) = 0.5, Φ(1.96) ≈ 0.975, φ(0) = 1/√(2π).
    fn normal_helpers_hit_reference_values() {
        assert_relative_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(norm_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_relative_eq!(norm_pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(inv_mills(0.0), 2.0 * norm_pdf(0.0), epsilon = 1e-12);
    }
}
