//! efficiency::sfa — stochastic frontier analysis by maximum likelihood.
//!
//! Purpose
//! -------
//! Fit a log-linear production or cost frontier with a normal / half-normal
//! composed error and score each usable unit by its conditional technical
//! efficiency.
//!
//! Key behaviors
//! -------------
//! - [`likelihood`]: the composed-error log-likelihood with an analytic
//!   gradient, plugged into the L-BFGS maximizer through `LogLikelihood`.
//! - [`init`]: corrected-OLS starting values.
//! - [`te`]: Jondrow, Battese–Coelli and mode efficiency estimators.
//! - [`estimator`]: table-level orchestration, inference and metrics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Only rows passing the validity filter are logged and fitted; every
//!   other row scores exactly `0.0`.
//! - A single output field is used; extra outputs produce a notice.
//! - Standard errors that cannot be computed degrade to `NaN` with p-value
//!   `1.0` and a notice; estimation itself failing is an error.

pub mod estimator;
pub mod init;
pub mod likelihood;
pub mod te;

// ---- Re-exports ----

pub use self::estimator::{INTERCEPT, SfaEstimator, SfaFit, SfaOutcome, run_sfa};
pub use self::likelihood::{ComposedErrorLikelihood, SfaData, SfaParams};
pub use self::te::technical_efficiency;
