//! Unified error surface for the optimization layer.
//!
//! `OptError` collects configuration mistakes (tolerances, line-search
//! names), numerical failures (non-finite costs, gradients, Hessians),
//! backend errors raised inside argmin, and linear-programming outcomes
//! (infeasible, unbounded, pivot budget exhausted). Estimators wrap it with
//! unit or period context before surfacing it to callers.
use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    /// The maximizer stopped without meeting a convergence tolerance.
    NotConverged {
        iterations: usize,
        status: String,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Finite Diffs ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Model parameters ----
    /// Theta length does not match the model's parameter count.
    ThetaLengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Unconstrained optimization input must have finite values.
    InvalidThetaInput {
        index: usize,
        value: f64,
    },

    /// Likelihood data are unusable (empty, non-finite, or mis-shaped).
    InvalidLogLikInput {
        reason: &'static str,
    },

    // ---- Linear programming ----
    /// Phase 1 ended with a positive artificial sum: no feasible point.
    LpInfeasible {
        residual: f64,
    },

    /// The objective decreases without bound along a feasible ray.
    LpUnbounded {
        column: usize,
    },

    /// The simplex did not reach optimality within the pivot budget.
    LpIterationLimit {
        iterations: usize,
    },

    /// A constraint row does not have one coefficient per variable.
    LpDimensionMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// LP coefficients, right-hand sides and objective must be finite.
    LpNonFiniteInput {
        row: Option<usize>,
        value: f64,
    },

    /// Solver tolerance must be finite and positive.
    InvalidLpTolerance {
        tol: f64,
    },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }
            OptError::NotConverged { iterations, status } => {
                write!(f, "Optimizer did not converge after {iterations} iterations ({status})")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Finite Diffs ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }

            // ---- Model parameters ----
            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Invalid theta input at index {index}: {value}, must be finite")
            }
            OptError::InvalidLogLikInput { reason } => {
                write!(f, "Invalid log-likelihood input: {reason}")
            }

            // ---- Linear programming ----
            OptError::LpInfeasible { residual } => {
                write!(f, "Linear program is infeasible (phase-1 residual {residual})")
            }
            OptError::LpUnbounded { column } => {
                write!(f, "Linear program is unbounded along column {column}")
            }
            OptError::LpIterationLimit { iterations } => {
                write!(f, "Simplex stopped after {iterations} pivots without reaching optimality")
            }
            OptError::LpDimensionMismatch { row, expected, found } => {
                write!(
                    f,
                    "Constraint row {row} has {found} coefficients, expected {expected}"
                )
            }
            OptError::LpNonFiniteInput { row, value } => match row {
                Some(r) => write!(f, "Non-finite value {value} in constraint row {r}"),
                None => write!(f, "Non-finite value {value} in LP objective"),
            },
            OptError::InvalidLpTolerance { tol } => {
                write!(f, "Invalid LP tolerance {tol}: must be finite and positive")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(opt_err) => match opt_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                other => OptError::BackendError { text: other.to_string() },
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Downcasting of argmin errors into `OptError` variants.
    // - Display of the non-convergence variant.
    // - Display of the linear-programming variants.
    //
    // They intentionally DO NOT cover:
    // - Where the errors are raised (see `loglik_optimizer` and
    //   `linear_program`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Argmin's typed errors keep their variant and text after conversion.
    //
    // Given
    // -----
    // - An `ArgminError::ConditionViolated` boxed as `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::ConditionViolated` with the same text.
    fn from_argmin_error_preserves_variant() {
        // Arrange
        let err: Error = ArgminError::ConditionViolated { text: "step".to_string() }.into();

        // Act
        let converted = OptError::from(err);

        // Assert
        assert_eq!(converted, OptError::ConditionViolated { text: "step".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // An `OptError` raised inside a cost closure survives the round trip
    // through argmin's boxed error unchanged.
    //
    // Given
    // -----
    // - `OptError::NonFiniteCost` boxed as `argmin::core::Error`.
    //
    // Expect
    // ------
    // - The same `OptError` after conversion.
    fn from_boxed_opt_error_round_trips() {
        // Arrange
        let err: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();

        // Act
        let converted = OptError::from(err);

        // Assert
        assert_eq!(converted, OptError::NonFiniteCost { value: f64::INFINITY });
    }

    #[test]
    // Purpose
    // -------
    // Errors of any other type fall back to `BackendError`.
    //
    // Given
    // -----
    // - A plain message error.
    //
    // Expect
    // ------
    // - `BackendError` carrying the message.
    fn from_foreign_error_falls_back_to_backend_error() {
        // Arrange
        let err = Error::msg("line search failed");

        // Act
        let converted = OptError::from(err);

        // Assert
        assert_eq!(converted, OptError::BackendError { text: "line search failed".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Argmin's parameter errors map to `InvalidParameter`, and the
    // non-convergence variant names the iteration count and status.
    //
    // Given
    // -----
    // - `ArgminError::InvalidParameter` boxed as `argmin::core::Error`.
    // - `NotConverged` after 1 iteration with a capped status.
    //
    // Expect
    // ------
    // - The typed variant with the same text; a message with both fields.
    fn invalid_parameter_and_not_converged_render() {
        // Arrange
        let err: Error = ArgminError::InvalidParameter { text: "tol".to_string() }.into();
        let capped = OptError::NotConverged {
            iterations: 1,
            status: "Terminated(MaxItersReached)".to_string(),
        };

        // Act
        let converted = OptError::from(err);
        let message = capped.to_string();

        // Assert
        assert_eq!(converted, OptError::InvalidParameter { text: "tol".to_string() });
        assert!(message.contains("1 iterations"));
        assert!(message.contains("MaxItersReached"));
    }
}
