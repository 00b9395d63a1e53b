//! efficiency_panel — productive-efficiency analytics for panels of operating
//! units.
//!
//! Purpose
//! -------
//! Serve as the crate root for the analytical core: score units against
//! efficient frontiers (DEA, SFA), decompose productivity change between two
//! periods (Malmquist), segment units in a reduced feature space (PCA +
//! k-means), and regress efficiency on unit characteristics.
//!
//! Key behaviors
//! -------------
//! - Every analysis takes an immutable [`data::UnitTable`] plus declared
//!   field names and returns a new annotated table together with a flat,
//!   serializable metrics map or report.
//! - The validity filter ([`data::ValidityPartition`]) decides which rows the
//!   frontier estimators see; every other row is zero-filled in the output.
//! - Numerical back ends are pluggable: DEA runs on any
//!   `LinearProgramSolver`, SFA on any `LikelihoodMaximizer`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Analyses are pure functions of their inputs; no global state or I/O.
//! - Efficiency scores lie in `[0, 1]`; percentiles in `0..=100`, `0` only
//!   for rows outside the valid set.
//! - Only the Malmquist cross evaluations run in parallel (rayon).
//!
//! Conventions
//! -----------
//! - Configuration mistakes (absent fields, bad options) are returned as the
//!   layer's error enum and never retried; degenerate-but-legal inputs
//!   produce zero-valued outcomes.
//! - Logging goes through the `log` facade; the host application picks the
//!   backend.
//!
//! Downstream usage
//! ----------------
//! - A presentation layer (HTTP, CLI, notebook) maps request parameters onto
//!   the option structs and serializes the returned tables and metrics.
//! - Each module exposes a `prelude` for one-line imports.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; integration tests under `tests/`
//!   exercise one full pipeline each.

pub mod data;
pub mod determinants;
pub mod efficiency;
pub mod inference;
pub mod multivariate;
pub mod optimization;
pub mod productivity;
pub mod regression;
pub mod utils;
