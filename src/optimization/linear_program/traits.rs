//! linear_program::traits — solver seam used by the DEA estimator.
use crate::optimization::{
    errors::OptResult,
    linear_program::problem::{LinearProgram, LpSolution},
};

/// Anything that can solve a [`LinearProgram`] to optimality.
///
/// DEA solves one small program per unit (and per frontier in Malmquist
/// cross evaluations, possibly from several worker threads), so
/// implementors must be `Send + Sync` and must not keep state between
/// calls.
///
/// # Errors
/// Implementations report infeasible, unbounded and non-converged programs
/// through [`OptError`](crate::optimization::errors::OptError).
pub trait LinearProgramSolver: Send + Sync {
    fn solve(&self, lp: &LinearProgram) -> OptResult<LpSolution>;
}

impl<S: LinearProgramSolver + ?Sized> LinearProgramSolver for &S {
    fn solve(&self, lp: &LinearProgram) -> OptResult<LpSolution> {
        (**self).solve(lp)
    }
}
