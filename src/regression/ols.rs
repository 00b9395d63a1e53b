//! regression::ols — ordinary least squares with classical inference.
//!
//! Purpose
//! -------
//! Fit `y = Xβ + e` and report coefficients, standard errors, t-statistics,
//! two-sided Student-t p-values, R², adjusted R² and the overall F test.
//!
//! Key behaviors
//! -------------
//! - `β = (XᵀX)⁺ Xᵀy` through the eigen pseudo-inverse shared with
//!   `inference`, so exactly collinear designs still produce an answer.
//! - `σ² = RSS / (n − p)`, `Cov(β) = σ² (XᵀX)⁺`.
//! - Every reported statistic is finite: non-finite coefficients and
//!   statistics become `0.0`, non-finite p-values become `1.0`.
//!
//! Conventions
//! -----------
//! - When `has_intercept` is set, R² is centered and the model degrees of
//!   freedom exclude the intercept; otherwise R² is uncentered.
use crate::{
    inference::{hessian::symmetric_pinv, pvalues::student_t_two_sided},
    regression::errors::{RegressionError, RegressionResult},
    utils::finite_or,
};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Fitted OLS model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub coefficients: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub t_stats: Vec<f64>,
    pub p_values: Vec<f64>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_p_value: f64,
    pub residual_variance: f64,
    pub n_obs: usize,
    pub n_params: usize,
}

/// Least-squares coefficients without inference; works for any shape.
pub fn least_squares(x: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
    let xt = x.t();
    symmetric_pinv(&xt.dot(x)).dot(&xt.dot(y))
}

/// Fit OLS with classical standard errors.
///
/// # Errors
/// - [`RegressionError::DimensionMismatch`] when `x.nrows() != y.len()`.
/// - [`RegressionError::NonFiniteInput`] for the first row with NaN / ±∞.
/// - [`RegressionError::InsufficientObservations`] when `n ≤ p`.
pub fn fit_ols(
    x: &Array2<f64>, y: &Array1<f64>, has_intercept: bool,
) -> RegressionResult<OlsFit> {
    let (n, p) = x.dim();
    if n != y.len() {
        return Err(RegressionError::DimensionMismatch { rows: n, response: y.len() });
    }
    if let Some(row) =
        (0..n).find(|&i| !y[i].is_finite() || x.row(i).iter().any(|v| !v.is_finite()))
    {
        return Err(RegressionError::NonFiniteInput { row });
    }
    if n <= p {
        return Err(RegressionError::InsufficientObservations { n_obs: n, n_params: p });
    }

    let xtx_pinv = symmetric_pinv(&x.t().dot(x));
    let beta = xtx_pinv.dot(&x.t().dot(y));
    let residuals = y - &x.dot(&beta);
    let rss = residuals.dot(&residuals);
    let dof = (n - p) as f64;
    let sigma2 = rss / dof;

    let tss = if has_intercept {
        let y_bar = y.sum() / n as f64;
        y.iter().map(|v| (v - y_bar).powi(2)).sum::<f64>()
    } else {
        y.dot(y)
    };
    let r_squared = if tss > 0.0 { (1.0 - rss / tss).clamp(0.0, 1.0) } else { 0.0 };
    let k_const = usize::from(has_intercept);
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (n - k_const) as f64 / dof;
    let df_model = p.saturating_sub(k_const);
    let (f_statistic, f_p_value) = f_test(r_squared, df_model, n - p);

    let mut coefficients = Vec::with_capacity(p);
    let mut std_errors = Vec::with_capacity(p);
    let mut t_stats = Vec::with_capacity(p);
    let mut p_values = Vec::with_capacity(p);
    for j in 0..p {
        let b = beta[j];
        let se = (sigma2 * xtx_pinv[[j, j]]).max(0.0).sqrt();
        let t = if se > 0.0 { b / se } else { f64::NAN };
        coefficients.push(finite_or(b, 0.0));
        std_errors.push(finite_or(se, 0.0));
        t_stats.push(finite_or(t, 0.0));
        p_values.push(finite_or(student_t_two_sided(t, dof), 1.0));
    }

    Ok(OlsFit {
        coefficients,
        std_errors,
        t_stats,
        p_values,
        r_squared: finite_or(r_squared, 0.0),
        adj_r_squared: finite_or(adj_r_squared, 0.0),
        f_statistic: finite_or(f_statistic, 0.0),
        f_p_value: finite_or(f_p_value, 1.0),
        residual_variance: finite_or(sigma2, 0.0),
        n_obs: n,
        n_params: p,
    })
}

// ---- Helper methods ----

fn f_test(r_squared: f64, df_model: usize, df_resid: usize) -> (f64, f64) {
    if df_model == 0 || df_resid == 0 || r_squared >= 1.0 {
        return (0.0, 1.0);
    }
    let f = (r_squared / df_model as f64) / ((1.0 - r_squared) / df_resid as f64);
    match FisherSnedecor::new(df_model as f64, df_resid as f64) {
        Ok(dist) => (f, dist.sf(f)),
        Err(_) => (f, 1.0),
    }
}
