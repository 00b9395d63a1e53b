//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Builders hide argmin's generic wiring: they pick the line search, apply
//! the L-BFGS history size and the optional gradient / cost-change
//! tolerances from [`MLEOptions`]. The initial parameter vector and the
//! iteration cap are runtime concerns applied by
//! [`run_lbfgs`](crate::optimization::loglik_optimizer::run::run_lbfgs).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// L-BFGS with Hager–Zhang line search, configured from `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when argmin rejects a
///   tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search, configured from `opts`.
///
/// # Errors
/// - `OptError` (via `From<argmin::core::Error>`) when argmin rejects a
///   tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient-norm and cost-change tolerances.
///
/// A `None` tolerance leaves argmin's default in place. Generic over the
/// line-search type so new L-BFGS variants reuse it unchanged.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction of both solver flavours with default and explicit
    //   L-BFGS memory.
    // - `configure_lbfgs` with present and absent tolerances.
    //
    // They intentionally DO NOT cover:
    // - Executor behavior (see `run` and the SFA tests).
    // -------------------------------------------------------------------------

    fn opts(ls: LineSearcher, mem: Option<usize>, tol_cost: Option<f64>) -> MLEOptions {
        let tols = Tolerances::new(Some(1e-6), tol_cost, Some(50)).expect("valid tolerances");
        MLEOptions::new(tols, ls, false, mem).expect("valid options")
    }

    #[test]
    // Purpose
    // -------
    // Both builders succeed with the default and an explicit history size.
    //
    // Given
    // -----
    // - Valid tolerances, `lbfgs_mem` ∈ {None, Some(11)}.
    //
    // Expect
    // ------
    // - Every build returns `Ok`.
    fn builders_accept_default_and_explicit_memory() {
        for mem in [None, Some(11)] {
            assert!(build_optimizer_hager_zhang(&opts(LineSearcher::HagerZhang, mem, None)).is_ok());
            assert!(
                build_optimizer_more_thuente(&opts(LineSearcher::MoreThuente, mem, Some(1e-9)))
                    .is_ok()
            );
        }
    }

    #[test]
    // Purpose
    // -------
    // Tolerances are optional at the solver level.
    //
    // Given
    // -----
    // - Options with only `max_iter` set.
    //
    // Expect
    // ------
    // - `configure_lbfgs` returns `Ok`.
    fn configure_lbfgs_respects_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(10)).expect("valid tolerances");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("valid options");

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
