//! determinants::analysis — which unit characteristics explain efficiency.
//!
//! Purpose
//! -------
//! Regress a dependent variable, either an existing column or an efficiency
//! score derived on the fly with DEA or SFA, on explanatory columns and
//! report the coefficient table and the most important significant
//! variables.
//!
//! Key behaviors
//! -------------
//! - Every declared field (dependent, explanatory, estimator inputs and
//!   outputs) is checked up front; absent names are reported together.
//! - Derived dependents use the estimator's score column (`"ET DEA"` /
//!   `"ET SFA"`). SFA keeps only the first output and says so in `notices`.
//! - Rows with a missing or non-finite value in any regression column are
//!   dropped (logged at `warn`).
//! - Key variables are the explanatory variables with `p < alpha`, ranked by
//!   `|coefficient|` descending (stable), truncated to `top_n`. The
//!   intercept is never a key variable.
//! - All reported statistics are finite; see `regression::ols`.
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::{
    data::{errors::DataError, table::UnitTable},
    determinants::errors::{DeterminantError, DeterminantResult},
    efficiency::{derive::derive_scores, options::EfficiencyMethod, sfa::INTERCEPT},
    regression::ols::fit_ols,
};

/// Dependent name that requests a derived efficiency score.
pub const DERIVE_EFFICIENCY: &str = "eficiencia";

/// Method label of a regression on an existing column.
pub const DIRECT_METHOD: &str = "direct";

/// What the regression explains.
#[derive(Debug, Clone, PartialEq)]
pub enum DependentSpec {
    /// An existing numeric column.
    Column(String),
    /// A DEA or SFA score computed from `inputs` and `outputs`.
    DeriveEfficiency { method: EfficiencyMethod, inputs: Vec<String>, outputs: Vec<String> },
}

impl DependentSpec {
    /// Interpret request-style parameters.
    ///
    /// `dependent == DERIVE_EFFICIENCY` selects a derived score and parses
    /// `method`; any other name is taken as a column and `method` is ignored.
    ///
    /// # Errors
    /// [`DeterminantError::Efficiency`] for an unknown method name.
    pub fn from_request(
        dependent: &str, method: &str, inputs: Vec<String>, outputs: Vec<String>,
    ) -> DeterminantResult<Self> {
        if dependent == DERIVE_EFFICIENCY {
            let method: EfficiencyMethod = method.parse()?;
            Ok(DependentSpec::DeriveEfficiency { method, inputs, outputs })
        } else {
            Ok(DependentSpec::Column(dependent.to_string()))
        }
    }
}

/// Regression settings.
///
/// Defaults: intercept added, five key variables, `alpha = 0.05`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminantOptions {
    pub add_intercept: bool,
    pub top_n: usize,
    pub alpha: f64,
}

impl DeterminantOptions {
    /// # Errors
    /// [`DeterminantError::InvalidOption`] for `top_n == 0` or `alpha`
    /// outside `(0, 1)`.
    pub fn new(add_intercept: bool, top_n: usize, alpha: f64) -> DeterminantResult<Self> {
        if top_n == 0 {
            return Err(DeterminantError::InvalidOption {
                name: "top_n",
                value: top_n.to_string(),
                reason: "at least one key variable must be reported",
            });
        }
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(DeterminantError::InvalidOption {
                name: "alpha",
                value: alpha.to_string(),
                reason: "must lie strictly between 0 and 1",
            });
        }
        Ok(Self { add_intercept, top_n, alpha })
    }
}

impl Default for DeterminantOptions {
    fn default() -> Self {
        Self { add_intercept: true, top_n: 5, alpha: 0.05 }
    }
}

/// One line of the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub variable: String,
    pub coefficient: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Result of [`run_determinants`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeterminantReport {
    pub coefficients: Vec<CoefficientRow>,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub n_obs: usize,
    /// Column actually used as the dependent variable.
    pub dependent: String,
    /// `"DEA"`, `"SFA"` or `"direct"`.
    pub method: String,
    pub key_variables: Vec<String>,
    pub notices: Vec<String>,
}

/// Fit the determinants regression.
///
/// # Errors
/// - [`DeterminantError::Data`] for missing fields (all names at once) or an
///   empty explanatory list.
/// - [`DeterminantError::Efficiency`] when the score derivation fails.
/// - [`DeterminantError::Regression`] when too few complete rows remain.
pub fn run_determinants<S: AsRef<str>>(
    table: &UnitTable, dependent: &DependentSpec, explanatory: &[S],
    options: &DeterminantOptions,
) -> DeterminantResult<DeterminantReport> {
    if explanatory.is_empty() {
        return Err(DataError::EmptyFieldList { role: "explanatory" }.into());
    }
    let explanatory: Vec<String> = explanatory.iter().map(|s| s.as_ref().to_string()).collect();

    let mut declared: Vec<String> = match dependent {
        DependentSpec::Column(name) => vec![name.clone()],
        DependentSpec::DeriveEfficiency { inputs, outputs, .. } => {
            inputs.iter().chain(outputs).cloned().collect()
        }
    };
    declared.extend(explanatory.iter().cloned());
    table.require_fields(declared.as_slice())?;

    let derived;
    let (working, dependent_name, method, notices) = match dependent {
        DependentSpec::Column(name) => (table, name.clone(), DIRECT_METHOD.to_string(), Vec::new()),
        DependentSpec::DeriveEfficiency { method, inputs, outputs } => {
            derived = derive_scores(table, *method, inputs.as_slice(), outputs.as_slice())?;
            (
                &derived.table,
                derived.score_column.clone(),
                method.label().to_string(),
                derived.notices.clone(),
            )
        }
    };

    let (x, y) = design(working, &dependent_name, &explanatory, options.add_intercept)?;
    let fit = fit_ols(&x, &y, options.add_intercept)?;

    let mut names: Vec<String> = Vec::with_capacity(fit.coefficients.len());
    if options.add_intercept {
        names.push(INTERCEPT.to_string());
    }
    names.extend(explanatory.iter().cloned());

    let coefficients: Vec<CoefficientRow> = names
        .iter()
        .enumerate()
        .map(|(j, name)| CoefficientRow {
            variable: name.clone(),
            coefficient: fit.coefficients[j],
            std_error: fit.std_errors[j],
            t_value: fit.t_stats[j],
            p_value: fit.p_values[j],
            significant: fit.p_values[j] < options.alpha,
        })
        .collect();
    let key_variables = key_variables(&coefficients, options.add_intercept, options.top_n);

    log::info!(
        "Determinants ({method}): dependent '{dependent_name}', n={}, R²={:.3}, key={:?}",
        fit.n_obs,
        fit.r_squared,
        key_variables
    );

    Ok(DeterminantReport {
        coefficients,
        r_squared: fit.r_squared,
        adj_r_squared: fit.adj_r_squared,
        n_obs: fit.n_obs,
        dependent: dependent_name,
        method,
        key_variables,
        notices,
    })
}

// ---- Helper methods ----

/// Complete-case design matrix and response.
fn design(
    table: &UnitTable, dependent: &str, explanatory: &[String], add_intercept: bool,
) -> DeterminantResult<(Array2<f64>, Array1<f64>)> {
    let mut columns: Vec<&str> = vec![dependent];
    columns.extend(explanatory.iter().map(String::as_str));
    let all: Vec<usize> = (0..table.n_rows()).collect();
    let full = table.numeric_matrix(columns.as_slice(), &all)?;

    let complete: Vec<usize> =
        all.into_iter().filter(|&i| full.row(i).iter().all(|v| v.is_finite())).collect();
    let dropped = table.n_rows() - complete.len();
    if dropped > 0 {
        log::warn!("Determinants: dropping {dropped} rows with missing values");
    }

    let offset = usize::from(add_intercept);
    let mut x = Array2::<f64>::ones((complete.len(), explanatory.len() + offset));
    let mut y = Array1::<f64>::zeros(complete.len());
    for (r, &i) in complete.iter().enumerate() {
        y[r] = full[[i, 0]];
        for j in 0..explanatory.len() {
            x[[r, j + offset]] = full[[i, j + 1]];
        }
    }
    Ok((x, y))
}

fn key_variables(rows: &[CoefficientRow], skip_intercept: bool, top_n: usize) -> Vec<String> {
    let mut significant: Vec<&CoefficientRow> = rows
        .iter()
        .skip(usize::from(skip_intercept))
        .filter(|row| row.significant)
        .collect();
    significant.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));
    significant.into_iter().take(top_n).map(|row| row.variable.clone()).collect()
}
