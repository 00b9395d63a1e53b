//! numerical_stability — numerically robust transforms and normal helpers.
//!
//! Purpose
//! -------
//! Collect numerically stable scalar transforms and small shared tolerances
//! so the likelihood, inference and decomposition layers can assume
//! well-conditioned `f64` arithmetic.
//!
//! Key behaviors
//! -------------
//! - Provide stable scalar transforms (`safe_softplus`, its inverse, and
//!   `safe_logistic`) for mapping unconstrained reals into strictly
//!   positive scale parameters without overflow/underflow.
//! - Provide standard normal helpers (`norm_pdf`, `norm_cdf`,
//!   `log_norm_cdf`, `inv_mills`) that stay finite deep in the left tail,
//!   where composed-error likelihoods spend much of their time.
//! - Centralize tolerances (`SIGMA_FLOOR`, `EIGEN_EPS`, `GENERAL_TOL`).
//!
//! Invariants & assumptions
//! ------------------------
//! - All transforms assume finite `f64` inputs; shape and domain checks
//!   happen in the estimator and optimizer layers.
//!
//! Conventions
//! -----------
//! - Pure functions only: no logging, I/O or global state.
//!
//! Downstream usage
//! ----------------
//! - The SFA likelihood maps `(τ_v, τ_u)` to `(σ_v, σ_u)` via
//!   `SIGMA_FLOOR + safe_softplus(τ)` and differentiates through
//!   `safe_logistic`.
//! - Inference and PCA reuse `EIGEN_EPS` to truncate tiny eigenvalues.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] compare against naïve formulas on
//!   safe grids and check continuity of the tail branches.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, GENERAL_TOL, SIGMA_FLOOR, inv_mills, log_norm_cdf, norm_cdf, norm_pdf,
    safe_logistic, safe_softplus, safe_softplus_inv,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use efficiency_panel::optimization::numerical_stability::prelude::*;
//
// to import the main numerical-stability surface in a single line.

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, GENERAL_TOL, SIGMA_FLOOR, inv_mills, log_norm_cdf, norm_cdf, norm_pdf,
        safe_logistic, safe_softplus, safe_softplus_inv,
    };
}
