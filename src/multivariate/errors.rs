//! Error surface for the projection and clustering pipeline.
//!
//! Row-count problems are caller mistakes raised before any numeric work;
//! failures of the efficiency pre-pass are carried through unchanged.
use crate::{data::errors::DataError, efficiency::errors::EfficiencyError};

pub type MultivariateResult<T> = Result<T, MultivariateError>;

#[derive(Debug, Clone, PartialEq)]
pub enum MultivariateError {
    // ---- Configuration ----
    Data(DataError),

    /// Fewer usable rows than the pipeline needs.
    InsufficientRows { n_rows: usize, required: usize },

    /// An explicit cluster count larger than the number of usable rows.
    ClusterCountExceedsRows { k: usize, n_rows: usize },

    /// An explicit cluster count below 2.
    InvalidClusterCount { k: usize },

    /// An option value outside its domain.
    InvalidOption { name: &'static str, value: String, reason: &'static str },

    // ---- Upstream ----
    Efficiency(EfficiencyError),
}

impl std::error::Error for MultivariateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MultivariateError::Data(err) => Some(err),
            MultivariateError::Efficiency(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for MultivariateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultivariateError::Data(err) => write!(f, "{err}"),
            MultivariateError::InsufficientRows { n_rows, required } => write!(
                f,
                "At least {required} usable rows are required for clustering, found {n_rows}"
            ),
            MultivariateError::ClusterCountExceedsRows { k, n_rows } => write!(
                f,
                "The number of clusters (k={k}) cannot exceed the number of rows ({n_rows})"
            ),
            MultivariateError::InvalidClusterCount { k } => {
                write!(f, "The number of clusters must be at least 2, got {k}")
            }
            MultivariateError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid value '{value}' for option '{name}': {reason}")
            }
            MultivariateError::Efficiency(err) => write!(f, "{err}"),
        }
    }
}

impl From<DataError> for MultivariateError {
    fn from(err: DataError) -> Self {
        MultivariateError::Data(err)
    }
}

impl From<EfficiencyError> for MultivariateError {
    fn from(err: EfficiencyError) -> Self {
        match err {
            EfficiencyError::Data(err) => MultivariateError::Data(err),
            other => MultivariateError::Efficiency(other),
        }
    }
}
