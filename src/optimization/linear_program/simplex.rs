//! linear_program::simplex — dense two-phase tableau simplex.
//!
//! Purpose
//! -------
//! Solve the small, dense programs produced by DEA (a few dozen to a few
//! hundred columns) exactly enough that efficiency scores are stable to
//! `1e-6`.
//!
//! Key behaviors
//! -------------
//! - Rows are normalized to non-negative right-hand sides; `≤` rows get a
//!   slack, `≥` rows a surplus plus an artificial, `=` rows an artificial.
//! - Phase 1 minimizes the artificial sum. A positive residual means the
//!   program is infeasible. Artificials still basic at level zero are
//!   pivoted out; rows where that is impossible are redundant and dropped.
//! - Phase 2 minimizes the (sign-adjusted) objective. Artificial columns
//!   never re-enter.
//! - Entering column: most negative reduced cost (Dantzig). After
//!   [`BLAND_AFTER_DEGENERATE`] consecutive degenerate pivots the rule
//!   switches to Bland's smallest index until progress resumes, which rules
//!   out cycling.
//! - Leaving row: minimum ratio, ties broken by the smallest basic index.
//!
//! Conventions
//! -----------
//! - The tableau keeps the objective row last and the right-hand side in
//!   the last column; that entry holds `-z` for the current phase.
use crate::optimization::{
    errors::{OptError, OptResult},
    linear_program::{
        problem::{LinearProgram, LpSolution, Relation, Sense},
        traits::LinearProgramSolver,
    },
};
use ndarray::{Array1, Array2, Axis};

/// Consecutive degenerate pivots tolerated before switching to Bland's rule.
pub const BLAND_AFTER_DEGENERATE: usize = 50;

/// Multiple of `tol` (scaled by the largest right-hand side) below which a
/// phase-1 residual counts as zero.
const FEASIBILITY_FACTOR: f64 = 1e3;

/// Dense two-phase simplex solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseSimplex {
    /// Pivot budget shared by both phases.
    pub max_iter: usize,
    /// Zero threshold for reduced costs, pivot entries and ratios.
    pub tol: f64,
}

impl DenseSimplex {
    /// # Errors
    /// [`OptError::InvalidLpTolerance`] for a non-finite or non-positive `tol`;
    /// [`OptError::InvalidMaxIter`] for a zero pivot budget.
    pub fn new(max_iter: usize, tol: f64) -> OptResult<Self> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(OptError::InvalidLpTolerance { tol });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Simplex pivot budget must be positive.",
            });
        }
        Ok(DenseSimplex { max_iter, tol })
    }

    fn optimize(&self, tableau: &mut Tableau, pivots: &mut usize) -> OptResult<()> {
        let mut degenerate_run = 0usize;
        loop {
            let entering = if degenerate_run >= BLAND_AFTER_DEGENERATE {
                tableau.bland_entering(self.tol)
            } else {
                tableau.dantzig_entering(self.tol)
            };
            let Some(col) = entering else {
                return Ok(());
            };
            let Some((row, step)) = tableau.ratio_test(col, self.tol) else {
                return Err(OptError::LpUnbounded { column: col });
            };
            if *pivots >= self.max_iter {
                return Err(OptError::LpIterationLimit { iterations: *pivots });
            }
            tableau.pivot(row, col);
            *pivots += 1;
            if step <= self.tol {
                degenerate_run += 1;
            } else {
                degenerate_run = 0;
            }
        }
    }
}

impl Default for DenseSimplex {
    fn default() -> Self {
        DenseSimplex { max_iter: 10_000, tol: 1e-9 }
    }
}

impl LinearProgramSolver for DenseSimplex {
    fn solve(&self, lp: &LinearProgram) -> OptResult<LpSolution> {
        lp.validate()?;
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(OptError::InvalidLpTolerance { tol: self.tol });
        }

        let n = lp.n_vars();
        let costs: Array1<f64> = match lp.sense {
            Sense::Minimize => lp.objective.clone(),
            Sense::Maximize => lp.objective.mapv(|c| -c),
        };
        let mut tableau = Tableau::build(lp);
        let mut pivots = 0usize;

        if tableau.has_artificials() {
            tableau.load_phase_one_objective();
            self.optimize(&mut tableau, &mut pivots)?;
            let residual = -tableau.objective_entry();
            let threshold = self.tol * FEASIBILITY_FACTOR * (1.0 + tableau.rhs_scale);
            if residual > threshold {
                return Err(OptError::LpInfeasible { residual });
            }
            tableau.drive_out_artificials(self.tol);
        }

        tableau.load_phase_two_objective(&costs);
        self.optimize(&mut tableau, &mut pivots)?;

        let x = tableau.primal(n);
        let objective = lp.objective.dot(&x);
        Ok(LpSolution { x, objective, iterations: pivots })
    }
}

// ---- Tableau ----

struct Tableau {
    /// `(m + 1) × (n_cols + 1)`: constraint rows, then the objective row.
    t: Array2<f64>,
    /// Basic column of each constraint row.
    basis: Vec<usize>,
    /// Columns at or beyond this index are artificial.
    first_artificial: usize,
    /// Largest normalized right-hand side, used to scale feasibility checks.
    rhs_scale: f64,
}

impl Tableau {
    fn build(lp: &LinearProgram) -> Self {
        let n = lp.n_vars();
        let m = lp.constraints.len();

        // Normalize to b ≥ 0 first so the column counts are known.
        let rows: Vec<(Array1<f64>, Relation, f64)> = lp
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    (c.coefficients.mapv(|a| -a), c.relation.flipped(), -c.rhs)
                } else {
                    (c.coefficients.clone(), c.relation, c.rhs)
                }
            })
            .collect();
        let n_slack = rows.iter().filter(|(_, rel, _)| *rel != Relation::Eq).count();
        let n_art = rows.iter().filter(|(_, rel, _)| *rel != Relation::Le).count();
        let first_artificial = n + n_slack;
        let n_cols = first_artificial + n_art;

        let mut t = Array2::<f64>::zeros((m + 1, n_cols + 1));
        let mut basis = Vec::with_capacity(m);
        let mut next_slack = n;
        let mut next_art = first_artificial;
        let mut rhs_scale = 0.0f64;
        for (i, (coefs, relation, rhs)) in rows.into_iter().enumerate() {
            t.row_mut(i).slice_mut(ndarray::s![..n]).assign(&coefs);
            t[[i, n_cols]] = rhs;
            rhs_scale = rhs_scale.max(rhs);
            match relation {
                Relation::Le => {
                    t[[i, next_slack]] = 1.0;
                    basis.push(next_slack);
                    next_slack += 1;
                }
                Relation::Ge => {
                    t[[i, next_slack]] = -1.0;
                    t[[i, next_art]] = 1.0;
                    basis.push(next_art);
                    next_slack += 1;
                    next_art += 1;
                }
                Relation::Eq => {
                    t[[i, next_art]] = 1.0;
                    basis.push(next_art);
                    next_art += 1;
                }
            }
        }
        Tableau { t, basis, first_artificial, rhs_scale }
    }

    fn n_rows(&self) -> usize {
        self.basis.len()
    }

    fn rhs_col(&self) -> usize {
        self.t.ncols() - 1
    }

    fn has_artificials(&self) -> bool {
        self.first_artificial < self.rhs_col()
    }

    fn objective_entry(&self) -> f64 {
        self.t[[self.n_rows(), self.rhs_col()]]
    }

    /// Reduced costs of `Σ artificials` given the artificial starting basis.
    fn load_phase_one_objective(&mut self) {
        let m = self.n_rows();
        let rhs = self.rhs_col();
        let mut obj = Array1::<f64>::zeros(rhs + 1);
        obj.slice_mut(ndarray::s![self.first_artificial..rhs]).fill(1.0);
        for i in 0..m {
            if self.basis[i] >= self.first_artificial {
                obj.scaled_add(-1.0, &self.t.row(i));
            }
        }
        self.t.row_mut(m).assign(&obj);
    }

    /// Reduced costs of the minimization objective `costs` for the current basis.
    fn load_phase_two_objective(&mut self, costs: &Array1<f64>) {
        let m = self.n_rows();
        let n = costs.len();
        let mut obj = Array1::<f64>::zeros(self.t.ncols());
        obj.slice_mut(ndarray::s![..n]).assign(costs);
        for i in 0..m {
            let j = self.basis[i];
            let cb = if j < n { costs[j] } else { 0.0 };
            if cb != 0.0 {
                obj.scaled_add(-cb, &self.t.row(i));
            }
        }
        self.t.row_mut(m).assign(&obj);
    }

    fn dantzig_entering(&self, tol: f64) -> Option<usize> {
        let obj = self.t.row(self.n_rows());
        let mut best: Option<(usize, f64)> = None;
        for j in 0..self.first_artificial {
            let d = obj[j];
            if d < -tol && best.is_none_or(|(_, b)| d < b) {
                best = Some((j, d));
            }
        }
        best.map(|(j, _)| j)
    }

    fn bland_entering(&self, tol: f64) -> Option<usize> {
        let obj = self.t.row(self.n_rows());
        (0..self.first_artificial).find(|&j| obj[j] < -tol)
    }

    /// Minimum-ratio row for `col` and the step length; `None` if the column
    /// has no positive entry.
    fn ratio_test(&self, col: usize, tol: f64) -> Option<(usize, f64)> {
        let rhs = self.rhs_col();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.n_rows() {
            let a = self.t[[i, col]];
            if a <= tol {
                continue;
            }
            let ratio = self.t[[i, rhs]].max(0.0) / a;
            best = match best {
                None => Some((i, ratio)),
                Some((_, b)) if ratio < b - tol => Some((i, ratio)),
                Some((r, b)) if (ratio - b).abs() <= tol && self.basis[i] < self.basis[r] => {
                    Some((i, ratio.min(b)))
                }
                keep => keep,
            };
        }
        best
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let p = self.t[[row, col]];
        self.t.row_mut(row).mapv_inplace(|v| v / p);
        self.t[[row, col]] = 1.0;
        let pivot_row = self.t.row(row).to_owned();
        for i in 0..self.t.nrows() {
            if i == row {
                continue;
            }
            let factor = self.t[[i, col]];
            if factor != 0.0 {
                self.t.row_mut(i).scaled_add(-factor, &pivot_row);
                self.t[[i, col]] = 0.0;
            }
        }
        self.basis[row] = col;
    }

    /// Pivot zero-level artificials out of the basis; drop rows that only
    /// artificials can represent.
    fn drive_out_artificials(&mut self, tol: f64) {
        let mut redundant = Vec::new();
        for i in 0..self.n_rows() {
            if self.basis[i] < self.first_artificial {
                continue;
            }
            let replacement = (0..self.first_artificial)
                .filter(|&j| self.t[[i, j]].abs() > tol)
                .max_by(|&a, &b| self.t[[i, a]].abs().total_cmp(&self.t[[i, b]].abs()));
            match replacement {
                Some(j) => self.pivot(i, j),
                None => redundant.push(i),
            }
        }
        if redundant.is_empty() {
            return;
        }
        log::debug!("simplex: dropping {} redundant constraint row(s)", redundant.len());
        let keep: Vec<usize> =
            (0..self.t.nrows()).filter(|i| !redundant.contains(i)).collect();
        self.t = self.t.select(Axis(0), &keep);
        self.basis = keep
            .iter()
            .filter(|&&i| i < self.basis.len())
            .map(|&i| self.basis[i])
            .collect();
    }

    fn primal(&self, n: usize) -> Array1<f64> {
        let rhs = self.rhs_col();
        let mut x = Array1::<f64>::zeros(n);
        for (i, &j) in self.basis.iter().enumerate() {
            if j < n {
                x[j] = self.t[[i, rhs]].max(0.0);
            }
        }
        x
    }
}
