//! Error surface for the DEA and SFA estimators.
//!
//! `EfficiencyError` wraps configuration mistakes from the data layer,
//! estimation failures from the optimization layer (with the unit or
//! period that triggered them), and invalid estimator options.
use crate::{data::errors::DataError, optimization::errors::OptError};

pub type EfficiencyResult<T> = Result<T, EfficiencyError>;

#[derive(Debug, Clone, PartialEq)]
pub enum EfficiencyError {
    // ---- Configuration ----
    /// Missing or empty field declarations, shape mismatches.
    Data(DataError),

    /// An efficiency method name that is neither DEA nor SFA.
    UnknownMethod { name: String },

    /// An option value outside its domain.
    InvalidOption { name: &'static str, value: String, reason: &'static str },

    // ---- Estimation ----
    /// LP or MLE failure, tagged with where it happened.
    Estimation { context: String, source: OptError },
}

impl EfficiencyError {
    pub(crate) fn estimation(context: impl Into<String>, source: OptError) -> Self {
        EfficiencyError::Estimation { context: context.into(), source }
    }
}

impl std::error::Error for EfficiencyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EfficiencyError::Data(err) => Some(err),
            EfficiencyError::Estimation { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for EfficiencyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EfficiencyError::Data(err) => write!(f, "{err}"),
            EfficiencyError::UnknownMethod { name } => {
                write!(f, "Unknown efficiency method '{name}': expected 'DEA' or 'SFA'")
            }
            EfficiencyError::InvalidOption { name, value, reason } => {
                write!(f, "Invalid value '{value}' for option '{name}': {reason}")
            }
            EfficiencyError::Estimation { context, source } => {
                write!(f, "Estimation failed ({context}): {source}")
            }
        }
    }
}

impl From<DataError> for EfficiencyError {
    fn from(err: DataError) -> Self {
        EfficiencyError::Data(err)
    }
}
