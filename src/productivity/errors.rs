//! Error surface for the two-period productivity estimator.
//!
//! Input-incompatibility errors (no shared units, a subsetting column that
//! is not an input, an empty selection) are caller mistakes and carry the
//! period labels or field names needed to correct the request.
use crate::{data::errors::DataError, efficiency::errors::EfficiencyError};

pub type ProductivityResult<T> = Result<T, ProductivityError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ProductivityError {
    // ---- Configuration ----
    Data(DataError),

    /// The subsetting column is not one of the declared inputs.
    SubsetColumnNotInput { column: String, inputs: Vec<String> },

    // ---- Input incompatibility ----
    /// The two periods share no usable unit id.
    NoCommonUnits { period_t: i64, period_t1: i64 },

    /// The subsetting rule left no unit.
    EmptySubset { period_t: i64, period_t1: i64 },

    /// A usable row has no integral unit id.
    MissingUnitId { period: i64, row: usize, id_field: String },

    // ---- Estimation ----
    Efficiency(EfficiencyError),

    /// The worker pool for cross evaluations could not be built.
    WorkerPool { reason: String },
}

impl std::error::Error for ProductivityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProductivityError::Data(err) => Some(err),
            ProductivityError::Efficiency(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductivityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductivityError::Data(err) => write!(f, "{err}"),
            ProductivityError::SubsetColumnNotInput { column, inputs } => write!(
                f,
                "Subsetting column '{column}' must be one of the inputs: {}",
                inputs.join(", ")
            ),
            ProductivityError::NoCommonUnits { period_t, period_t1 } => {
                write!(f, "No common units between periods {period_t} and {period_t1}")
            }
            ProductivityError::EmptySubset { period_t, period_t1 } => write!(
                f,
                "No units left after subsetting for periods {period_t} and {period_t1}"
            ),
            ProductivityError::MissingUnitId { period, row, id_field } => write!(
                f,
                "Row {row} of period {period} has no integral '{id_field}' value"
            ),
            ProductivityError::Efficiency(err) => write!(f, "{err}"),
            ProductivityError::WorkerPool { reason } => {
                write!(f, "Could not start the cross-evaluation worker pool: {reason}")
            }
        }
    }
}

impl From<DataError> for ProductivityError {
    fn from(err: DataError) -> Self {
        ProductivityError::Data(err)
    }
}

impl From<EfficiencyError> for ProductivityError {
    fn from(err: EfficiencyError) -> Self {
        match err {
            EfficiencyError::Data(err) => ProductivityError::Data(err),
            other => ProductivityError::Efficiency(other),
        }
    }
}
