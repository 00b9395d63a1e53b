//! data — unit tables, validity partitioning, and table-level errors.
//!
//! Purpose
//! -------
//! Hold the rectangular dataset the analytical core consumes and the shared
//! rule deciding which rows are usable by the efficiency estimators.
//!
//! Key behaviors
//! -------------
//! - [`UnitTable`] stores ordered records of numeric/textual cells and
//!   returns new tables when columns are appended.
//! - [`ValidityPartition`] splits rows on the strictly-positive rule over
//!   declared input and output fields.
//! - [`DataError`] reports configuration mistakes (absent or empty field
//!   lists) with the offending names.
//!
//! Invariants & assumptions
//! ------------------------
//! - Tables are never mutated by estimators; annotations produce new tables.
//! - No cell is coerced: non-numeric or missing cells read as `NaN`.
//!
//! Downstream usage
//! ----------------
//! - `efficiency`, `productivity`, `multivariate` and `determinants` all
//!   start from a [`UnitTable`] and declared field names.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; property tests check that the
//!   validity scatter always zero-fills invalid rows.

pub mod errors;
pub mod table;
pub mod validity;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{DataError, DataResult};
pub use self::table::{Record, UnitTable, Value};
pub use self::validity::ValidityPartition;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use efficiency_panel::data::prelude::*;
//
// to import the table surface in a single line.

pub mod prelude {
    pub use super::errors::{DataError, DataResult};
    pub use super::table::{Record, UnitTable, Value};
    pub use super::validity::ValidityPartition;
}
