//! linear_program::problem — linear program statement and solution types.
//!
//! A [`LinearProgram`] is stated over non-negative variables `x ≥ 0`:
//!
//! ```text
//! min / max   cᵀx
//! subject to  aᵢᵀx (≤ | ≥ | =) bᵢ      for every constraint i
//! ```
//!
//! Solvers receive the statement by reference and return an [`LpSolution`]
//! whose `objective` is expressed in the caller's sense (a maximization
//! reports the maximum, not its negation).
use crate::optimization::errors::{OptError, OptResult};
use ndarray::Array1;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Comparison operator of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Ge,
    Eq,
}

impl Relation {
    /// Relation obtained after multiplying both sides by `-1`.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }
}

/// One row `aᵀx (≤ | ≥ | =) b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub coefficients: Array1<f64>,
    pub relation: Relation,
    pub rhs: f64,
}

impl Constraint {
    pub fn new(coefficients: Array1<f64>, relation: Relation, rhs: f64) -> Self {
        Constraint { coefficients, relation, rhs }
    }
}

/// Objective, direction and constraint rows over `x ≥ 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProgram {
    pub objective: Array1<f64>,
    pub sense: Sense,
    pub constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// Program with no constraints yet; add rows with [`LinearProgram::with_constraint`].
    pub fn new(objective: Array1<f64>, sense: Sense) -> Self {
        LinearProgram { objective, sense, constraints: Vec::new() }
    }

    /// Builder-style row append.
    pub fn with_constraint(
        mut self, coefficients: Array1<f64>, relation: Relation, rhs: f64,
    ) -> Self {
        self.constraints.push(Constraint::new(coefficients, relation, rhs));
        self
    }

    pub fn push_constraint(&mut self, coefficients: Array1<f64>, relation: Relation, rhs: f64) {
        self.constraints.push(Constraint::new(coefficients, relation, rhs));
    }

    /// Number of decision variables.
    pub fn n_vars(&self) -> usize {
        self.objective.len()
    }

    /// Check shapes and finiteness before a solver touches the program.
    ///
    /// # Errors
    /// - [`OptError::LpNonFiniteInput`] with `row: None` for the objective,
    ///   or the offending row index for a coefficient or right-hand side.
    /// - [`OptError::LpDimensionMismatch`] when a row's length differs from
    ///   the objective's.
    pub fn validate(&self) -> OptResult<()> {
        if let Some(&value) = self.objective.iter().find(|v| !v.is_finite()) {
            return Err(OptError::LpNonFiniteInput { row: None, value });
        }
        let expected = self.n_vars();
        for (row, constraint) in self.constraints.iter().enumerate() {
            let found = constraint.coefficients.len();
            if found != expected {
                return Err(OptError::LpDimensionMismatch { row, expected, found });
            }
            if let Some(&value) = constraint.coefficients.iter().find(|v| !v.is_finite()) {
                return Err(OptError::LpNonFiniteInput { row: Some(row), value });
            }
            if !constraint.rhs.is_finite() {
                return Err(OptError::LpNonFiniteInput { row: Some(row), value: constraint.rhs });
            }
        }
        Ok(())
    }
}

/// Optimal point of a [`LinearProgram`].
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal decision variables, one per objective coefficient.
    pub x: Array1<f64>,
    /// `cᵀx` at the optimum, in the program's own sense.
    pub objective: f64,
    /// Simplex pivots performed across both phases.
    pub iterations: usize,
}
