//! optimization — numerical solvers shared by the efficiency estimators.
//!
//! Purpose
//! -------
//! Hold every piece of numerical machinery the estimators rely on:
//! - `loglik_optimizer`: L-BFGS maximization of log-likelihoods (SFA).
//! - `linear_program`: a dense two-phase simplex behind the
//!   [`LinearProgramSolver`](linear_program::LinearProgramSolver) trait (DEA).
//! - `numerical_stability`: softplus / logistic reparameterizations and
//!   tail-safe normal distribution helpers.
//! - `errors`: the single [`OptError`](errors::OptError) surface that all of
//!   the above report through.
//!
//! Conventions
//! -----------
//! - Solvers conceptually maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`.
//! - Linear programs are stated over non-negative variables; callers encode
//!   everything else through constraints.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw argmin errors.

pub mod errors;
pub mod linear_program;
pub mod loglik_optimizer;
pub mod numerical_stability;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::linear_program::prelude::*;
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
