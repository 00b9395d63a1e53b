//! Unit-level technical efficiency from fitted composed residuals.
//!
//! With `s` the frontier sign, the conditional distribution of `u` given
//! `ε` is `N⁺(μ*, σ*²)` where `μ* = −s·ε·σ_u²/σ²` and `σ* = σ_u·σ_v/σ`.
//!
//! - Jondrow: `exp(−E[u | ε])`, `E[u | ε] = μ* + σ*·φ(μ*/σ*)/Φ(μ*/σ*)`.
//! - Battese–Coelli: `E[exp(−u) | ε] = exp(−μ* + σ*²/2)·Φ(μ*/σ* − σ*)/Φ(μ*/σ*)`.
//! - Mode: `exp(−max(μ*, 0))`.
//!
//! Every variant lies in `(0, 1]`; results are clamped to absorb round-off.
use ndarray::Array1;

use crate::{
    efficiency::{options::TeMethod, sfa::likelihood::SfaParams},
    optimization::numerical_stability::{inv_mills, log_norm_cdf},
};

/// Technical efficiency of each residual in `residuals`.
pub fn technical_efficiency(
    residuals: &Array1<f64>, params: &SfaParams, sign: f64, method: TeMethod,
) -> Array1<f64> {
    let sigma2 = params.sigma2();
    let s_star = params.sigma_u * params.sigma_v / sigma2.sqrt();
    let shrink = params.sigma_u * params.sigma_u / sigma2;
    residuals.mapv(|e| {
        let mu_star = -sign * e * shrink;
        let z = mu_star / s_star;
        let te = match method {
            TeMethod::Jondrow => (-(mu_star + s_star * inv_mills(z))).exp(),
            TeMethod::BatteseCoelli => {
                (log_norm_cdf(z - s_star) - log_norm_cdf(z) - mu_star + 0.5 * s_star * s_star).exp()
            }
            TeMethod::Mode => (-mu_star.max(0.0)).exp(),
        };
        te.clamp(f64::MIN_POSITIVE, 1.0)
    })
}
