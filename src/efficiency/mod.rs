//! efficiency — DEA and SFA scoring of operating units.
//!
//! Purpose
//! -------
//! Score every row of a unit table against an efficient frontier, either
//! deterministic (data envelopment analysis) or stochastic (composed-error
//! maximum likelihood), and summarize the scores in a flat metrics map.
//!
//! Key behaviors
//! -------------
//! - Both estimators run on the rows kept by the validity filter and
//!   zero-fill everything else (score `0.0`, percentile `0`).
//! - Scores live in `[0, 1]`; output-oriented DEA reports `1/φ*`.
//! - Metrics are computed over all rows, so invalid rows pull the mean down.
//! - Solvers are pluggable: [`DeaEstimator`] is generic over
//!   `LinearProgramSolver`, [`SfaEstimator`] over `LikelihoodMaximizer`.
//!
//! Conventions
//! -----------
//! - Degenerate inputs (no usable row) are outcomes, not errors; they log at
//!   `debug` level.
//! - Solver failures are logged at `error` level with the unit context and
//!   returned as [`EfficiencyError::Estimation`].
//!
//! Downstream usage
//! ----------------
//! - `productivity` reuses [`dea::score_units`] and [`dea::evaluate_against`].
//! - `multivariate` and `determinants` go through [`derive_scores`].

pub mod dea;
pub mod derive;
pub mod errors;
pub mod metrics;
pub mod options;
pub mod sfa;

// ---- Re-exports ----

pub use self::dea::{
    DeaEstimator, DeaOutcome, DeaScores, evaluate_against, radial_scores, run_dea, score_units,
};
pub use self::derive::{DerivedScores, derive_scores};
pub use self::errors::{EfficiencyError, EfficiencyResult};
pub use self::metrics::{MetricValue, MetricsMap, percentile_ranks};
pub use self::options::{
    DeaOptions, EfficiencyMethod, FrontierKind, Orientation, OutputSelection, ReturnsToScale,
    SfaOptions, TeMethod,
};
pub use self::sfa::{SfaEstimator, SfaFit, SfaOutcome, run_sfa};

pub mod prelude {
    pub use super::dea::{DeaEstimator, DeaOutcome, run_dea};
    pub use super::derive::{DerivedScores, derive_scores};
    pub use super::errors::{EfficiencyError, EfficiencyResult};
    pub use super::metrics::{MetricValue, MetricsMap};
    pub use super::options::{
        DeaOptions, EfficiencyMethod, FrontierKind, Orientation, OutputSelection, ReturnsToScale,
        SfaOptions, TeMethod,
    };
    pub use super::sfa::{SfaEstimator, SfaOutcome, run_sfa};
}
