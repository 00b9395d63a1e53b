//! inference — post-estimation uncertainty for fitted models.
//!
//! Purpose
//! -------
//! Standard errors and p-values for the SFA frontier coefficients and the
//! determinants regression.
//!
//! Key behaviors
//! -------------
//! - [`calc_standard_errors`] inverts the observed information of a fitted
//!   likelihood through [`symmetric_pinv`].
//! - [`normal_two_sided`] and [`student_t_two_sided`] turn Wald statistics
//!   into p-values, returning `1.0` when a statistic is unusable.
//!
//! Invariants & assumptions
//! ------------------------
//! - Parameters live in the optimizer's unconstrained space; mapping back
//!   to model quantities happens in the estimator.
//! - Nothing here panics on singular information; those directions are
//!   truncated.

pub mod hessian;
pub mod pvalues;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{calc_standard_errors, symmetric_pinv};
pub use self::pvalues::{normal_two_sided, student_t_two_sided, wald_statistic};

pub mod prelude {
    pub use super::hessian::{calc_standard_errors, symmetric_pinv};
    pub use super::pvalues::{normal_two_sided, student_t_two_sided, wald_statistic};
}
