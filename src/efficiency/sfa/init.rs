//! Corrected-OLS starting values for the composed-error MLE.
//!
//! OLS slopes are consistent under the composed error; only the intercept is
//! biased by `−s·E[u] = −s·σ_u·√(2/π)`. `σ_u` is recovered from the third
//! central moment of the OLS residuals,
//! `m₃ = −s·√(2/π)·(4/π − 1)·σ_u³`, and `σ_v² = m₂ − (1 − 2/π)·σ_u²`.
//! Residuals skewed the wrong way (or a variance split that goes negative)
//! fall back to a small share of the residual spread.
use ndarray::Array1;
use std::f64::consts::{FRAC_2_PI, PI};

use crate::{
    efficiency::{options::FrontierKind, sfa::likelihood::SfaData},
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{SIGMA_FLOOR, safe_softplus_inv},
    },
    regression::least_squares,
};

/// Smallest starting scale; keeps `softplus⁻¹(σ − floor)` finite.
const MIN_START_SIGMA: f64 = 1e-3;

/// Share of the residual standard deviation used for σ_u on wrong skew.
const WRONG_SKEW_SHARE: f64 = 0.1;

/// Starting `θ = (β, τ_v, τ_u)` for [`ComposedErrorLikelihood`](super::likelihood::ComposedErrorLikelihood).
pub fn cols_start(data: &SfaData, frontier: FrontierKind) -> Theta {
    let sign = frontier.sign();
    let mut beta = least_squares(&data.x, &data.y);
    let resid: Array1<f64> = &data.y - &data.x.dot(&beta);
    let n = resid.len().max(1) as f64;
    let centre = resid.sum() / n;
    let m2 = resid.iter().map(|e| (e - centre).powi(2)).sum::<f64>() / n;
    let m3 = resid.iter().map(|e| (e - centre).powi(3)).sum::<f64>() / n;

    let skew_factor = FRAC_2_PI.sqrt() * (4.0 / PI - 1.0);
    let su_cubed = -sign * m3 / skew_factor;
    let spread = m2.sqrt();
    let mut sigma_u = if su_cubed > 0.0 { su_cubed.cbrt() } else { WRONG_SKEW_SHARE * spread };
    let mut sigma_v2 = m2 - (1.0 - FRAC_2_PI) * sigma_u * sigma_u;
    if sigma_v2 <= 0.0 {
        sigma_u = WRONG_SKEW_SHARE * spread;
        sigma_v2 = m2 - (1.0 - FRAC_2_PI) * sigma_u * sigma_u;
    }
    let sigma_u = sigma_u.max(MIN_START_SIGMA);
    let sigma_v = sigma_v2.max(0.0).sqrt().max(MIN_START_SIGMA);

    if !beta.is_empty() {
        beta[0] += sign * sigma_u * FRAC_2_PI.sqrt();
    }
    let p = beta.len();
    let mut theta = Array1::<f64>::zeros(p + 2);
    theta.slice_mut(ndarray::s![..p]).assign(&beta);
    theta[p] = safe_softplus_inv(sigma_v - SIGMA_FLOOR);
    theta[p + 1] = safe_softplus_inv(sigma_u - SIGMA_FLOOR);
    theta.mapv_inplace(|v| if v.is_finite() { v } else { 0.0 });
    theta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efficiency::sfa::likelihood::SfaParams;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A perfect log-linear fit gives OLS slopes and floored scales.
    //
    // Given
    // -----
    // - y = 0.5 + 0.8·x exactly.
    //
    // Expect
    // ------
    // - Slope 0.8; both σ at the starting minimum; intercept shifted up by
    //   σ_u·√(2/π) for a production frontier.
    fn exact_fit_yields_floored_scales() {
        // Arrange
        let log_x = array![[0.0], [1.0], [2.0], [3.0]];
        let log_y = log_x.column(0).mapv(|x| 0.5 + 0.8 * x);
        let data = SfaData::new(log_y, &log_x).expect("finite");

        // Act
        let theta = cols_start(&data, FrontierKind::Production);
        let params = SfaParams::from_theta(&theta);

        // Assert
        assert_abs_diff_eq!(params.beta[1], 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(params.sigma_u, MIN_START_SIGMA, epsilon = 1e-9);
        assert_abs_diff_eq!(params.sigma_v, MIN_START_SIGMA, epsilon = 1e-9);
        assert_abs_diff_eq!(params.beta[0], 0.5 + MIN_START_SIGMA * FRAC_2_PI.sqrt(), epsilon = 1e-9);
    }

    #[test]
    // Purpose
    // -------
    // Negatively skewed residuals on a production frontier give a σ_u
    // estimate larger than the wrong-skew fallback.
    //
    // Given
    // -----
    // - Residual pattern with one large shortfall.
    //
    // Expect
    // ------
    // - σ_u above 10% of the residual spread; finite θ.
    fn negative_skew_identifies_inefficiency() {
        // Arrange
        let log_x = array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0]];
        let shocks = [0.1, 0.05, -0.9, 0.1, 0.08, 0.12];
        let log_y = Array1::from_iter(shocks.iter().enumerate().map(|(i, e)| 1.0 + 0.5 * i as f64 + e));
        let data = SfaData::new(log_y, &log_x).expect("finite");

        // Act
        let theta = cols_start(&data, FrontierKind::Production);
        let params = SfaParams::from_theta(&theta);

        // Assert
        assert!(theta.iter().all(|v| v.is_finite()));
        let resid = &data.y - &data.x.dot(&least_squares(&data.x, &data.y));
        let spread = (resid.mapv(|e| e * e).sum() / 6.0).sqrt();
        assert!(params.sigma_u > WRONG_SKEW_SHARE * spread);
    }
}
