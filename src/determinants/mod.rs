//! determinants — regression of efficiency (or any column) on unit
//! characteristics.
//!
//! Purpose
//! -------
//! Explain differences between units with an OLS regression whose
//! dependent variable is either an existing column or a DEA / SFA score
//! computed on the fly, and single out the significant variables with the
//! largest effects.
//!
//! Key behaviors
//! -------------
//! - [`DependentSpec`] selects the dependent variable;
//!   [`DependentSpec::from_request`] maps the `"eficiencia"` sentinel to a
//!   derived score.
//! - [`run_determinants`] returns a [`DeterminantReport`] with one
//!   [`CoefficientRow`] per parameter, R², adjusted R², the observation
//!   count and the key variables.
//!
//! Downstream usage
//! ----------------
//! - The report derives `Serialize` and can be emitted as JSON directly.

pub mod analysis;
pub mod errors;

// ---- Re-exports ----

pub use self::analysis::{
    CoefficientRow, DERIVE_EFFICIENCY, DIRECT_METHOD, DependentSpec, DeterminantOptions,
    DeterminantReport, run_determinants,
};
pub use self::errors::{DeterminantError, DeterminantResult};

pub mod prelude {
    pub use super::analysis::{
        CoefficientRow, DependentSpec, DeterminantOptions, DeterminantReport, run_determinants,
    };
    pub use super::errors::{DeterminantError, DeterminantResult};
}
