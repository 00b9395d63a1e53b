//! Errors raised while fitting linear regressions.

pub type RegressionResult<T> = Result<T, RegressionError>;

#[derive(Debug, Clone, PartialEq)]
pub enum RegressionError {
    /// Design matrix rows and response length differ.
    DimensionMismatch { rows: usize, response: usize },

    /// Not enough observations to leave residual degrees of freedom.
    InsufficientObservations { n_obs: usize, n_params: usize },

    /// Design matrix or response contains NaN / ±∞.
    NonFiniteInput { row: usize },
}

impl std::error::Error for RegressionError {}

impl std::fmt::Display for RegressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegressionError::DimensionMismatch { rows, response } => {
                write!(f, "Design matrix has {rows} rows but the response has {response} values")
            }
            RegressionError::InsufficientObservations { n_obs, n_params } => {
                write!(
                    f,
                    "Insufficient observations: {n_obs} rows for {n_params} parameters (need more rows than parameters)"
                )
            }
            RegressionError::NonFiniteInput { row } => {
                write!(f, "Non-finite value in regression row {row}")
            }
        }
    }
}
