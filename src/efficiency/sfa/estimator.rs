//! SFA estimator: validity filter → logs → COLS start → MLE → TE scores.
use indexmap::IndexMap;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{
    data::{UnitTable, ValidityPartition},
    efficiency::{
        errors::{EfficiencyError, EfficiencyResult},
        metrics::{MetricsMap, percentile_ranks, score_summary, significant_key},
        options::{OutputSelection, PERCENTILE_COLUMN, SfaOptions, UNDETERMINED},
        sfa::{
            init::cols_start,
            likelihood::{ComposedErrorLikelihood, SfaData, SfaParams},
            te::technical_efficiency,
        },
    },
    inference::{calc_standard_errors, normal_two_sided, wald_statistic},
    optimization::{
        errors::OptError,
        loglik_optimizer::{LbfgsMaximizer, LikelihoodMaximizer, LogLikelihood, Theta},
    },
};

/// Name of the intercept in coefficient maps.
pub const INTERCEPT: &str = "intercept";

/// Fitted frontier and its inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfaFit {
    /// `"intercept"` followed by the input field names.
    pub names: Vec<String>,
    pub betas: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub p_values: Vec<f64>,
    pub sigma_v: f64,
    pub sigma_u: f64,
    pub lambda: f64,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub iterations: usize,
    pub status: String,
}

/// Table-level SFA result.
#[derive(Debug, Clone, PartialEq)]
pub struct SfaOutcome {
    pub table: UnitTable,
    pub scores: Vec<f64>,
    pub percentiles: Vec<u32>,
    pub partition: ValidityPartition,
    /// The output field actually used.
    pub output: String,
    /// `None` when no unit was usable.
    pub fit: Option<SfaFit>,
    pub metrics: MetricsMap,
    /// Non-fatal downgrades (output truncation, unusable standard errors).
    pub notices: Vec<String>,
}

/// SFA estimator with a pluggable likelihood maximizer.
#[derive(Debug, Clone, PartialEq)]
pub struct SfaEstimator<M: LikelihoodMaximizer = LbfgsMaximizer> {
    pub options: SfaOptions,
    pub maximizer: M,
}

impl SfaEstimator<LbfgsMaximizer> {
    pub fn new(options: SfaOptions) -> Self {
        let maximizer = LbfgsMaximizer::new(options.mle.clone());
        SfaEstimator { options, maximizer }
    }
}

impl<M: LikelihoodMaximizer> SfaEstimator<M> {
    pub fn with_maximizer(options: SfaOptions, maximizer: M) -> Self {
        SfaEstimator { options, maximizer }
    }

    /// Fit the frontier on the usable rows of `table` and score every row.
    ///
    /// Only the first output is used when several are supplied; the
    /// truncation is logged and reported in [`SfaOutcome::notices`].
    ///
    /// # Errors
    /// - [`EfficiencyError::Data`] for missing or empty field lists.
    /// - [`EfficiencyError::Estimation`] when the maximizer fails or stops
    ///   without converging.
    pub fn fit<S: AsRef<str>>(
        &self, table: &UnitTable, inputs: &[S], outputs: impl Into<OutputSelection>,
    ) -> EfficiencyResult<SfaOutcome> {
        let (output, truncation) = outputs.into().into_single()?;
        let mut notices = Vec::new();
        if let Some(notice) = truncation {
            log::warn!("{notice}");
            notices.push(notice);
        }
        let inputs: Vec<&str> = inputs.iter().map(AsRef::as_ref).collect();
        let outputs = [output.as_str()];
        let partition = ValidityPartition::split(table, inputs.as_slice(), &outputs[..])?;
        let n_rows = partition.n_rows();

        let (scores, fit) = if partition.n_valid() == 0 {
            log::debug!("SFA: no usable units among {n_rows} rows; returning zero scores");
            (vec![0.0; n_rows], None)
        } else {
            let (te, fit) = self.estimate(table, &inputs, &output, &partition, &mut notices)?;
            (partition.scatter(&te.to_vec()), Some(fit))
        };

        let percentiles = percentile_ranks(&scores, &partition);
        let (et_mean, pct_critical) = score_summary(&scores, self.options.threshold);
        let annotated = table
            .with_column(&self.options.score_column, scores.clone())?
            .with_column(PERCENTILE_COLUMN, percentiles.iter().map(|&p| p as f64).collect::<Vec<f64>>())?;

        let metrics = self.metrics(&fit, et_mean, pct_critical, n_rows, partition.n_valid());
        log::info!(
            "SFA ({:?}, {:?}): {} of {} units scored on '{}', mean efficiency {:.4}",
            self.options.frontier,
            self.options.te_method,
            partition.n_valid(),
            n_rows,
            output,
            et_mean
        );

        Ok(SfaOutcome {
            table: annotated,
            scores,
            percentiles,
            partition,
            output,
            fit,
            metrics,
            notices,
        })
    }

    fn estimate(
        &self, table: &UnitTable, inputs: &[&str], output: &str, partition: &ValidityPartition,
        notices: &mut Vec<String>,
    ) -> EfficiencyResult<(Array1<f64>, SfaFit)> {
        let log_x = table.numeric_matrix(inputs, &partition.valid)?.mapv(f64::ln);
        let log_y = table.numeric_matrix(&[output], &partition.valid)?.column(0).mapv(f64::ln);
        let data = SfaData::new(log_y, &log_x).map_err(|err| fail("SFA data", err))?;

        let model = ComposedErrorLikelihood::new(self.options.frontier);
        let theta0 = cols_start(&data, self.options.frontier);
        let outcome = self
            .maximizer
            .maximize(&model, theta0, &data)
            .map_err(|err| fail("SFA maximum likelihood", err))?;
        if !outcome.converged {
            return Err(fail(
                "SFA maximum likelihood",
                OptError::NotConverged { iterations: outcome.iterations, status: outcome.status },
            ));
        }

        let theta_hat = outcome.theta_hat;
        let params = SfaParams::from_theta(&theta_hat);
        let residuals = params.residuals(&data);
        let te = technical_efficiency(
            &residuals,
            &params,
            self.options.frontier.sign(),
            self.options.te_method,
        );

        let p = data.n_betas();
        let std_errors = match beta_std_errors(&model, &data, &theta_hat) {
            Ok(se) => se,
            Err(err) => {
                let notice = format!("SFA standard errors unavailable: {err}");
                log::warn!("{notice}");
                notices.push(notice);
                Array1::from_elem(p, f64::NAN)
            }
        };
        let p_values: Vec<f64> = params
            .beta
            .iter()
            .zip(std_errors.iter())
            .map(|(&b, &se)| normal_two_sided(wald_statistic(b, se)))
            .collect();

        let mut names = vec![INTERCEPT.to_string()];
        names.extend(inputs.iter().map(|s| s.to_string()));
        let fit = SfaFit {
            names,
            betas: params.beta.to_vec(),
            std_errors: std_errors.to_vec(),
            p_values,
            sigma_v: params.sigma_v,
            sigma_u: params.sigma_u,
            lambda: params.lambda(),
            sigma2: params.sigma2(),
            log_likelihood: outcome.value,
            iterations: outcome.iterations,
            status: outcome.status,
        };
        Ok((te, fit))
    }

    fn metrics(
        &self, fit: &Option<SfaFit>, et_mean: f64, pct_critical: f64, n_rows: usize,
        n_valid: usize,
    ) -> MetricsMap {
        let mut metrics = MetricsMap::new();
        metrics.insert("ET_promedio".into(), et_mean.into());
        metrics.insert("pct_criticos".into(), pct_critical.into());
        match fit {
            Some(fit) => {
                let key = significant_key(
                    fit.names
                        .iter()
                        .zip(fit.betas.iter().zip(fit.p_values.iter()))
                        .skip(1)
                        .map(|(name, (&b, &p))| (name.as_str(), b, p)),
                    self.options.alpha,
                );
                let betas: IndexMap<String, f64> =
                    fit.names.iter().cloned().zip(fit.betas.iter().copied()).collect();
                let p_values: IndexMap<String, f64> =
                    fit.names.iter().cloned().zip(fit.p_values.iter().copied()).collect();
                metrics.insert("variable_clave".into(), key.into());
                metrics.insert("lambda".into(), fit.lambda.into());
                metrics.insert("sigma2".into(), fit.sigma2.into());
                metrics.insert("betas".into(), betas.into());
                metrics.insert("p_values".into(), p_values.into());
                metrics.insert("log_likelihood".into(), fit.log_likelihood.into());
            }
            None => {
                metrics.insert("variable_clave".into(), UNDETERMINED.into());
                metrics.insert("lambda".into(), 0.0.into());
                metrics.insert("sigma2".into(), 0.0.into());
                metrics.insert("betas".into(), IndexMap::<String, f64>::new().into());
                metrics.insert("p_values".into(), IndexMap::<String, f64>::new().into());
                metrics.insert("log_likelihood".into(), 0.0.into());
            }
        }
        metrics.insert("n_units".into(), n_rows.into());
        metrics.insert("n_valid".into(), n_valid.into());
        metrics
    }
}

/// Convenience wrapper: [`SfaEstimator::fit`] with the default L-BFGS maximizer.
///
/// # Errors
/// See [`SfaEstimator::fit`].
pub fn run_sfa<S: AsRef<str>>(
    table: &UnitTable, inputs: &[S], outputs: impl Into<OutputSelection>, options: &SfaOptions,
) -> EfficiencyResult<SfaOutcome> {
    SfaEstimator::new(options.clone()).fit(table, inputs, outputs)
}

// ---- Helper methods ----

fn fail(context: &str, err: OptError) -> EfficiencyError {
    log::error!("{context} failed: {err}");
    EfficiencyError::estimation(context, err)
}

/// Standard errors of `β` from the observed information of `−ℓ`.
fn beta_std_errors(
    model: &ComposedErrorLikelihood, data: &SfaData, theta_hat: &Theta,
) -> Result<Array1<f64>, OptError> {
    let neg_grad = |theta: &Theta| match model.grad(theta, data) {
        Ok(g) => -g,
        Err(_) => Array1::from_elem(theta.len(), f64::NAN),
    };
    let se = calc_standard_errors(&neg_grad, theta_hat)?;
    Ok(se.slice(ndarray::s![..data.n_betas()]).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::efficiency::options::{FrontierKind, TeMethod};
    use crate::optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Zero-fill of invalid rows and bounded scores on a small panel.
    // - Multi-output truncation notice.
    // - Empty valid set placeholders.
    // - Recovery of a known slope on a simulated frontier.
    // - Non-convergence surfacing as an estimation error.
    //
    // They intentionally DO NOT cover:
    // - Likelihood algebra (see `likelihood`) or TE formulas (see `te`).
    // -------------------------------------------------------------------------

    fn five_rows() -> UnitTable {
        UnitTable::from_columns(vec![
            ("camas", vec![10.0, 0.0, 25.0, 40.0, 55.0]),
            ("egresos", vec![120.0, 80.0, 260.0, 330.0, 520.0]),
            ("consultas", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        ])
        .expect("equal lengths")
    }

    #[test]
    // Purpose
    // -------
    // A row with a zero input is scored 0 while the others land in (0, 1].
    //
    // Given
    // -----
    // - Five rows, row 1 has zero beds.
    //
    // Expect
    // ------
    // - Score 0 and percentile 0 for row 1; four scores in (0, 1].
    fn zero_input_row_scores_zero() {
        // Arrange
        let t = five_rows();

        // Act
        let out = run_sfa(&t, &["camas"], "egresos", &SfaOptions::default()).expect("fit");

        // Assert
        assert_eq!(out.scores[1], 0.0);
        assert_eq!(out.percentiles[1], 0);
        for (i, s) in out.scores.iter().enumerate() {
            if i != 1 {
                assert!(*s > 0.0 && *s <= 1.0, "row {i} scored {s}");
            }
        }
        assert_eq!(out.metrics["n_valid"], 4usize.into());
        assert!(out.fit.is_some());
    }

    #[test]
    // Purpose
    // -------
    // Several outputs are reduced to the first one with a notice.
    //
    // Given
    // -----
    // - Outputs `["egresos", "consultas"]`.
    //
    // Expect
    // ------
    // - `output == "egresos"`; one notice naming the dropped field.
    fn multiple_outputs_are_truncated_with_notice() {
        let t = five_rows();
        let outputs = vec!["egresos".to_string(), "consultas".to_string()];
        let out = run_sfa(&t, &["camas"], outputs, &SfaOptions::default()).expect("fit");
        assert_eq!(out.output, "egresos");
        assert_eq!(out.notices.len(), 1);
        assert!(out.notices[0].contains("consultas"));
    }

    #[test]
    fn empty_valid_set_returns_placeholders() {
        let t = UnitTable::from_columns(vec![("camas", vec![0.0, 1.0]), ("egresos", vec![5.0, -1.0])])
            .expect("equal lengths");
        let out = run_sfa(&t, &["camas"], "egresos", &SfaOptions::default()).expect("degenerate");
        assert_eq!(out.scores, vec![0.0, 0.0]);
        assert_eq!(out.metrics["lambda"].as_f64(), Some(0.0));
        assert_eq!(out.metrics["variable_clave"].as_str(), Some(UNDETERMINED));
        assert!(out.fit.is_none());
    }

    #[test]
    // Purpose
    // -------
    // On a frontier with deterministic noise and one-sided shortfalls the
    // slope is recovered, identified as the key variable and λ is positive.
    //
    // Given
    // -----
    // - 40 units, ln y = 1 + 0.7 ln x + v − u with small v and larger u.
    //
    // Expect
    // ------
    // - β₁ within 0.1 of 0.7; `variable_clave == "camas"`; finite λ > 0.
    fn simulated_frontier_recovers_slope() {
        // Arrange
        let n = 40;
        let x: Vec<f64> = (0..n).map(|i| 5.0 + 2.5 * i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| {
                let v = 0.03 * ((i * 7 % 11) as f64 - 5.0) / 5.0;
                let u = 0.4 * ((i * 5 % 9) as f64 / 8.0).powi(3);
                (1.0 + 0.7 * xi.ln() + v - u).exp()
            })
            .collect();
        let t = UnitTable::from_columns(vec![("camas", x), ("egresos", y)]).expect("equal lengths");
        let opts = SfaOptions { te_method: TeMethod::BatteseCoelli, ..SfaOptions::default() };

        // Act
        let out = run_sfa(&t, &["camas"], "egresos", &opts).expect("fit");

        // Assert
        let fit = out.fit.expect("usable units");
        assert!((fit.betas[1] - 0.7).abs() < 0.1, "slope {}", fit.betas[1]);
        assert_eq!(out.metrics["variable_clave"].as_str(), Some("camas"));
        assert!(fit.lambda.is_finite() && fit.lambda > 0.0);
    }

    #[test]
    fn cost_frontier_scores_are_bounded() {
        let t = five_rows();
        let opts = SfaOptions { frontier: FrontierKind::Cost, ..SfaOptions::default() };
        let out = run_sfa(&t, &["camas"], "egresos", &opts).expect("fit");
        assert!(out.scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    // Purpose
    // -------
    // A fit stopped by the iteration cap is an error, never a scored table.
    //
    // Given
    // -----
    // - 80 simulated units, `tol_grad = 1e-12` and `max_iter = 1`.
    //
    // Expect
    // ------
    // - `EfficiencyError::Estimation` with context "SFA maximum likelihood"
    //   and an `OptError::NotConverged` source after one iteration.
    fn iteration_cap_is_an_estimation_error() {
        // Arrange
        let n = 80;
        let x: Vec<f64> = (0..n).map(|i| 3.0 + 1.5 * i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| {
                let v = 0.05 * ((i * 13 % 17) as f64 - 8.0) / 8.0;
                let u = 0.3 * ((i * 7 % 10) as f64 / 9.0).powi(2);
                (0.5 + 0.8 * xi.ln() + v - u).exp()
            })
            .collect();
        let t = UnitTable::from_columns(vec![("camas", x), ("egresos", y)]).expect("equal lengths");
        let tols = Tolerances::new(Some(1e-12), None, Some(1)).expect("valid tolerances");
        let mle = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None).expect("valid");
        let opts = SfaOptions { mle, ..SfaOptions::default() };

        // Act
        let out = run_sfa(&t, &["camas"], "egresos", &opts);

        // Assert
        match out {
            Err(EfficiencyError::Estimation { context, source }) => {
                assert_eq!(context, "SFA maximum likelihood");
                assert!(matches!(source, OptError::NotConverged { iterations: 1, .. }));
            }
            other => panic!("expected a non-convergence error, got {other:?}"),
        }
    }
}
