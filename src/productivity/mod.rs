//! productivity — two-period Malmquist productivity change.
//!
//! Purpose
//! -------
//! Decompose the productivity change of units observed in two periods into
//! efficiency change (catch-up) and technology change (frontier shift).
//!
//! Key behaviors
//! -------------
//! - Both periods go through the validity filter; units are matched by an
//!   integral id column and kept in period-t order.
//! - An optional [`UnitSubset`] restricts the matched units (explicit ids,
//!   top-N by an input column, or a count cap).
//! - Own-period DEA frontiers are built on the selected units only; cross
//!   evaluations fan out over a rayon pool of `n_jobs` threads.
//!
//! Invariants & assumptions
//! ------------------------
//! - `EFFCH = EFF_t1/EFF_t`, `Malmquist = EFFCH·TECH` and
//!   `%ΔProd = (Malmquist − 1)·100` hold exactly for every row.
//! - `TECH ≡ 1` when cross evaluation is disabled.
//! - Errors about shared units or subsetting are caller errors and are
//!   never retried.

pub mod errors;
pub mod malmquist;
pub mod subset;

// ---- Re-exports ----

pub use self::errors::{ProductivityError, ProductivityResult};
pub use self::malmquist::{
    DEFAULT_ID_FIELD, MalmquistOptions, MalmquistOutcome, MalmquistRow, PeriodTable,
    run_malmquist, run_malmquist_with,
};
pub use self::subset::UnitSubset;

pub mod prelude {
    pub use super::errors::{ProductivityError, ProductivityResult};
    pub use super::malmquist::{MalmquistOptions, MalmquistOutcome, PeriodTable, run_malmquist};
    pub use super::subset::UnitSubset;
}
