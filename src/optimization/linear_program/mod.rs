//! linear_program — linear programs over non-negative variables.
//!
//! Purpose
//! -------
//! Provide the LP layer DEA is built on: a plain statement type
//! ([`LinearProgram`]), a solver seam ([`LinearProgramSolver`]) and a
//! dense two-phase simplex ([`DenseSimplex`]) that is the default
//! implementation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every variable is implicitly bounded below by zero.
//! - Solvers validate the program before pivoting; non-finite inputs and
//!   ragged rows are errors, never panics.
//! - An [`LpSolution`] objective is always reported in the program's own
//!   [`Sense`].

pub mod problem;
pub mod simplex;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::problem::{Constraint, LinearProgram, LpSolution, Relation, Sense};
pub use self::simplex::DenseSimplex;
pub use self::traits::LinearProgramSolver;

pub mod prelude {
    pub use super::problem::{LinearProgram, LpSolution, Relation, Sense};
    pub use super::simplex::DenseSimplex;
    pub use super::traits::LinearProgramSolver;
}
