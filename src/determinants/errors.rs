//! Error surface for the determinants regression.
//!
//! Missing columns are reported once with every absent name, whether they
//! were declared as dependent, explanatory, or estimator fields.
use crate::{
    data::errors::DataError, efficiency::errors::EfficiencyError,
    regression::errors::RegressionError,
};

pub type DeterminantResult<T> = Result<T, DeterminantError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DeterminantError {
    // ---- Configuration ----
    Data(DataError),

    /// `top_n == 0` or `alpha` outside `(0, 1)`.
    InvalidOption { name: &'static str, value: String, reason: &'static str },

    // ---- Estimation ----
    /// The efficiency pre-pass failed or its method name was unknown.
    Efficiency(EfficiencyError),

    /// The least-squares fit could not be formed.
    Regression(RegressionError),
}

impl std::error::Error for DeterminantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeterminantError::Data(err) => Some(err),
            DeterminantError::Efficiency(err) => Some(err),
            DeterminantError::Regression(err) => Some(err),
            DeterminantError::InvalidOption { .. } => None,
        }
    }
}

impl std::fmt::Display for DeterminantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeterminantError::Data(err) => write!(f, "{err}"),
            DeterminantError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid value '{value}' for option '{name}': {reason}")
            }
            DeterminantError::Efficiency(err) => write!(f, "{err}"),
            DeterminantError::Regression(err) => write!(f, "Regression failed: {err}"),
        }
    }
}

impl From<DataError> for DeterminantError {
    fn from(err: DataError) -> Self {
        DeterminantError::Data(err)
    }
}

impl From<EfficiencyError> for DeterminantError {
    fn from(err: EfficiencyError) -> Self {
        match err {
            EfficiencyError::Data(err) => DeterminantError::Data(err),
            other => DeterminantError::Efficiency(other),
        }
    }
}

impl From<RegressionError> for DeterminantError {
    fn from(err: RegressionError) -> Self {
        DeterminantError::Regression(err)
    }
}
