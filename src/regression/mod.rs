//! regression — linear least squares used by SFA start values and the
//! determinants analysis.

pub mod errors;
pub mod ols;

// ---- Re-exports ----

pub use self::errors::{RegressionError, RegressionResult};
pub use self::ols::{OlsFit, fit_ols, least_squares};

pub mod prelude {
    pub use super::errors::{RegressionError, RegressionResult};
    pub use super::ols::{OlsFit, fit_ols, least_squares};
}
