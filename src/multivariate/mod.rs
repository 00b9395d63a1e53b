//! multivariate — principal components and k-means segmentation of units.
//!
//! Purpose
//! -------
//! Reduce unit features to a few orthogonal components and group units in
//! that space, optionally after scoring them with DEA or SFA so clusters can
//! be profiled by mean efficiency.
//!
//! Key behaviors
//! -------------
//! - [`PcaModel`] fits a covariance eigen decomposition (optionally on
//!   standardized columns) and projects rows onto the leading components.
//! - [`kmeans`] partitions coordinates with seeded k-means++ restarts.
//! - [`silhouette_score`] rates a partition; the pipeline uses it to pick
//!   `k` when none is given.
//! - [`run_pca`], [`run_pca_clustering`] and [`run_efficiency_clustering`]
//!   work on [`UnitTable`](crate::data::UnitTable)s and return annotated
//!   tables plus metadata.
//!
//! Conventions
//! -----------
//! - All randomness comes from `ChaCha8Rng` seeded through
//!   [`KMeansOptions::seed`]; identical inputs give identical partitions.
//! - Row-count problems are reported as errors before any fitting.

pub mod errors;
pub mod kmeans;
pub mod pca;
pub mod pipeline;
pub mod silhouette;

// ---- Re-exports ----

pub use self::errors::{MultivariateError, MultivariateResult};
pub use self::kmeans::{KMeansFit, KMeansOptions, kmeans};
pub use self::pca::{PcaModel, PcaOptions};
pub use self::pipeline::{
    ClusterOptions, ClusterOutcome, ClusterProfile, DEFAULT_CLUSTER_COLUMN,
    EfficiencyClusterOutcome, PcaOutcome, run_efficiency_clustering, run_pca, run_pca_clustering,
};
pub use self::silhouette::silhouette_score;

pub mod prelude {
    pub use super::errors::{MultivariateError, MultivariateResult};
    pub use super::kmeans::KMeansOptions;
    pub use super::pca::{PcaModel, PcaOptions};
    pub use super::pipeline::{
        ClusterOptions, ClusterOutcome, EfficiencyClusterOutcome, run_efficiency_clustering,
        run_pca, run_pca_clustering,
    };
}
