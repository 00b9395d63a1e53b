//! loglik_optimizer — argmin-backed maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Maximize a log-likelihood `ℓ(θ)` with L-BFGS. Models implement
//! [`LogLikelihood`]; estimators either call [`maximize`] directly or go
//! through a [`LikelihoodMaximizer`] strategy ([`LbfgsMaximizer`] by
//! default) so the optimizer can be swapped without touching the model.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the argmin cost
//!   `c(θ) = -ℓ(θ)` and falls back to finite differences when a model has
//!   no analytic gradient.
//! - [`builders`] construct L-BFGS with the line search named by
//!   [`LineSearcher`]; [`run::run_lbfgs`] executes it and normalizes the
//!   final state into an [`OptimOutcome`].
//! - [`finite_diff::compute_hessian`] feeds the standard-error code in
//!   `inference`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gradients returned by [`LogLikelihood::grad`] are `∇ℓ`, never `∇c`.
//! - Invalid inputs surface as [`OptError`](crate::optimization::errors::OptError)
//!   values; nothing here panics.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    LbfgsMaximizer, LikelihoodMaximizer, LineSearcher, LogLikelihood, MLEOptions, OptimOutcome,
    Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        LbfgsMaximizer, LikelihoodMaximizer, LogLikelihood, MLEOptions, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
