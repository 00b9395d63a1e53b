//! Normal / half-normal composed-error log-likelihood with analytic gradient.
//!
//! Parameters live in unconstrained space:
//! `θ = (β₀, …, βₘ, τ_v, τ_u)` with `σ_v = SIGMA_FLOOR + softplus(τ_v)` and
//! `σ_u = SIGMA_FLOOR + softplus(τ_u)`. With `σ² = σ_v² + σ_u²`,
//! `λ = σ_u/σ_v` and `ε = y − xβ`, each unit contributes
//!
//! ```text
//! ℓᵢ = ½ln(2/π) − ln σ − εᵢ²/(2σ²) + ln Φ(−s·εᵢ·λ/σ)
//! ```
//!
//! where `s = +1` for a production frontier and `−1` for a cost frontier.
//! The gradient is accumulated in `(β, σ_v, σ_u)` and mapped to `θ` through
//! the softplus Jacobian.
use ndarray::{Array1, Array2, s};
use std::f64::consts::PI;

use crate::{
    efficiency::options::FrontierKind,
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Cost, Grad, LogLikelihood, Theta},
        numerical_stability::{SIGMA_FLOOR, inv_mills, log_norm_cdf, safe_logistic, safe_softplus},
    },
};

/// Log-space regression data: `y` (n) and `x` (n × p, intercept column first).
#[derive(Debug, Clone, PartialEq)]
pub struct SfaData {
    pub y: Array1<f64>,
    pub x: Array2<f64>,
}

impl SfaData {
    /// Prepend an intercept column to `log_inputs`.
    ///
    /// # Errors
    /// [`OptError::InvalidLogLikInput`] for empty, mis-shaped or non-finite data.
    pub fn new(log_output: Array1<f64>, log_inputs: &Array2<f64>) -> OptResult<Self> {
        let n = log_output.len();
        if n == 0 {
            return Err(OptError::InvalidLogLikInput { reason: "no observations" });
        }
        if log_inputs.nrows() != n {
            return Err(OptError::InvalidLogLikInput {
                reason: "input and output row counts differ",
            });
        }
        if log_output.iter().chain(log_inputs.iter()).any(|v| !v.is_finite()) {
            return Err(OptError::InvalidLogLikInput { reason: "non-finite log value" });
        }
        let mut x = Array2::<f64>::ones((n, log_inputs.ncols() + 1));
        x.slice_mut(s![.., 1..]).assign(log_inputs);
        Ok(SfaData { y: log_output, x })
    }

    pub fn n_obs(&self) -> usize {
        self.y.len()
    }

    /// Regression coefficients including the intercept.
    pub fn n_betas(&self) -> usize {
        self.x.ncols()
    }
}

/// Frontier parameters in natural space.
#[derive(Debug, Clone, PartialEq)]
pub struct SfaParams {
    pub beta: Array1<f64>,
    pub sigma_v: f64,
    pub sigma_u: f64,
}

impl SfaParams {
    /// Map `θ` to `(β, σ_v, σ_u)`; `θ` must hold `p + 2` entries.
    pub fn from_theta(theta: &Theta) -> Self {
        let p = theta.len() - 2;
        SfaParams {
            beta: theta.slice(s![..p]).to_owned(),
            sigma_v: SIGMA_FLOOR + safe_softplus(theta[p]),
            sigma_u: SIGMA_FLOOR + safe_softplus(theta[p + 1]),
        }
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma_v * self.sigma_v + self.sigma_u * self.sigma_u
    }

    pub fn lambda(&self) -> f64 {
        self.sigma_u / self.sigma_v
    }

    /// Composed residuals `ε = y − xβ`.
    pub fn residuals(&self, data: &SfaData) -> Array1<f64> {
        &data.y - &data.x.dot(&self.beta)
    }
}

/// Composed-error likelihood for a production or cost frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComposedErrorLikelihood {
    pub frontier: FrontierKind,
}

impl ComposedErrorLikelihood {
    pub fn new(frontier: FrontierKind) -> Self {
        ComposedErrorLikelihood { frontier }
    }
}

impl LogLikelihood for ComposedErrorLikelihood {
    type Data = SfaData;

    fn value(&self, theta: &Theta, data: &SfaData) -> OptResult<Cost> {
        self.check(theta, data)?;
        let params = SfaParams::from_theta(theta);
        let sign = self.frontier.sign();
        let sigma = params.sigma2().sqrt();
        let a = params.lambda() / sigma;
        let constant = 0.5 * (2.0 / PI).ln() - sigma.ln();

        let total = params
            .residuals(data)
            .iter()
            .map(|&e| constant - e * e / (2.0 * sigma * sigma) + log_norm_cdf(-sign * e * a))
            .sum::<f64>();
        if !total.is_finite() {
            return Err(OptError::NonFiniteCost { value: total });
        }
        Ok(total)
    }

    fn check(&self, theta: &Theta, data: &SfaData) -> OptResult<()> {
        let expected = data.n_betas() + 2;
        if theta.len() != expected {
            return Err(OptError::ThetaLengthMismatch { expected, actual: theta.len() });
        }
        if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::InvalidThetaInput { index, value });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &SfaData) -> OptResult<Grad> {
        self.check(theta, data)?;
        let p = data.n_betas();
        let params = SfaParams::from_theta(theta);
        let sign = self.frontier.sign();
        let (sv, su) = (params.sigma_v, params.sigma_u);
        let sigma2 = params.sigma2();
        let sigma = sigma2.sqrt();
        let sigma3 = sigma2 * sigma;
        let a = su / (sv * sigma);
        // ∂a/∂σ_v and ∂a/∂σ_u
        let da_dv = -su * (sigma2 + sv * sv) / (sv * sv * sigma3);
        let da_du = sv / sigma3;

        let mut d_eps = Array1::<f64>::zeros(data.n_obs());
        let (mut d_sv, mut d_su) = (0.0, 0.0);
        for (i, &e) in params.residuals(data).iter().enumerate() {
            let mills = inv_mills(-sign * e * a);
            d_eps[i] = -e / sigma2 - sign * a * mills;
            let quad = e * e / (sigma2 * sigma2);
            d_sv += -sv / sigma2 + quad * sv - sign * e * mills * da_dv;
            d_su += -su / sigma2 + quad * su - sign * e * mills * da_du;
        }

        let mut grad = Array1::<f64>::zeros(p + 2);
        // ε = y − xβ, so ∂ℓ/∂β = −xᵀ ∂ℓ/∂ε.
        grad.slice_mut(s![..p]).assign(&data.x.t().dot(&d_eps).mapv(|g| -g));
        grad[p] = d_sv * safe_logistic(theta[p]);
        grad[p + 1] = d_su * safe_logistic(theta[p + 1]);
        if let Some((index, &value)) = grad.iter().enumerate().find(|(_, g)| !g.is_finite()) {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "composed-error gradient is not finite",
            });
        }
        Ok(grad)
    }
}
