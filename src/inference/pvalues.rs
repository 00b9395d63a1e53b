//! inference::pvalues — two-sided p-values for Wald-type statistics.
//!
//! Both helpers map a non-finite statistic (zero or missing standard error)
//! to `1.0`, the "no evidence" value the result tables use as a sentinel.
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// `2 · (1 − Φ(|z|))` under a standard normal reference.
pub fn normal_two_sided(z: f64) -> f64 {
    if !z.is_finite() {
        return 1.0;
    }
    match Normal::new(0.0, 1.0) {
        Ok(dist) => (2.0 * dist.sf(z.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// `2 · (1 − F_ν(|t|))` under a Student-t reference with `dof` degrees of
/// freedom. Falls back to `1.0` when `dof` is not positive.
pub fn student_t_two_sided(t: f64, dof: f64) -> f64 {
    if !t.is_finite() || dof.is_nan() || dof <= 0.0 {
        return 1.0;
    }
    match StudentsT::new(0.0, 1.0, dof) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Wald statistic `estimate / se`, or `NaN` when `se` is not usable.
pub fn wald_statistic(estimate: f64, se: f64) -> f64 {
    if se.is_finite() && se > 0.0 { estimate / se } else { f64::NAN }
}
