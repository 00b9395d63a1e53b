//! efficiency::dea — data envelopment analysis by linear programming.
//!
//! Purpose
//! -------
//! Score every usable unit by its radial distance to the envelope spanned
//! by all usable units, then measure the input slack left after the radial
//! projection.
//!
//! Key behaviors
//! -------------
//! - Envelopment programs over `(λ₁..λₙ, θ)`:
//!   - input orientation: `min θ` s.t. `Σλⱼxᵢⱼ − θxᵢₒ ≤ 0`, `Σλⱼyᵣⱼ ≥ yᵣₒ`;
//!   - output orientation: `max φ` s.t. `Σλⱼxᵢⱼ ≤ xᵢₒ`, `Σλⱼyᵣⱼ − φyᵣₒ ≥ 0`;
//!   - VRS adds `Σλⱼ = 1`.
//! - Reported score: `θ*` (input) or `1/φ*` (output), clipped to `[0, 1]`.
//! - A second program maximizes `Σs⁻ + Σs⁺` at the fixed radial optimum;
//!   slacks are returned in the original field units.
//! - Columns are divided by their mean over the scored units before
//!   solving; radial scores are invariant to that rescaling.
//!
//! Invariants & assumptions
//! ------------------------
//! - Matrices passed to [`score_units`] hold strictly positive data (the
//!   validity filter guarantees this for [`DeaEstimator::fit`]).
//! - Invalid rows get score `0.0`, percentile `0` and zero slacks.
//! - One usable unit scores `1.0`; no usable unit means no LP at all.
use ndarray::{Array1, Array2, ArrayView1, Axis, concatenate};

use crate::{
    data::{UnitTable, ValidityPartition},
    efficiency::{
        errors::{EfficiencyError, EfficiencyResult},
        metrics::{MetricsMap, percentile_ranks, score_summary},
        options::{DeaOptions, Orientation, PERCENTILE_COLUMN, ReturnsToScale, UNDETERMINED},
    },
    optimization::{
        errors::OptResult,
        linear_program::{DenseSimplex, LinearProgram, LinearProgramSolver, Relation, Sense},
    },
};

/// Slacks below this (in rescaled units) are reported as zero.
const SLACK_TOL: f64 = 1e-8;

/// Per-unit results of [`score_units`], aligned with the matrix rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DeaScores {
    pub scores: Array1<f64>,
    /// `n × m` input slacks in original units.
    pub input_slacks: Array2<f64>,
    /// `n × k` output slacks in original units.
    pub output_slacks: Array2<f64>,
}

/// Table-level DEA result.
#[derive(Debug, Clone, PartialEq)]
pub struct DeaOutcome {
    /// Input table plus the score, `percentil` and `slack_<input>` columns.
    pub table: UnitTable,
    /// Score per row (zero for invalid rows).
    pub scores: Vec<f64>,
    pub percentiles: Vec<u32>,
    /// Input slacks per row (zero rows for invalid units).
    pub input_slacks: Array2<f64>,
    pub output_slacks: Array2<f64>,
    pub partition: ValidityPartition,
    pub metrics: MetricsMap,
}

/// DEA estimator with a pluggable LP solver.
#[derive(Debug, Clone, PartialEq)]
pub struct DeaEstimator<L: LinearProgramSolver = DenseSimplex> {
    pub options: DeaOptions,
    pub solver: L,
}

impl DeaEstimator<DenseSimplex> {
    pub fn new(options: DeaOptions) -> Self {
        DeaEstimator { options, solver: DenseSimplex::default() }
    }
}

impl<L: LinearProgramSolver> DeaEstimator<L> {
    pub fn with_solver(options: DeaOptions, solver: L) -> Self {
        DeaEstimator { options, solver }
    }

    /// Score every row of `table`.
    ///
    /// # Errors
    /// - [`EfficiencyError::Data`] for empty or missing field declarations.
    /// - [`EfficiencyError::Estimation`] when a unit's program fails; the
    ///   context names the row.
    pub fn fit<S: AsRef<str>>(
        &self, table: &UnitTable, inputs: &[S], outputs: &[S],
    ) -> EfficiencyResult<DeaOutcome> {
        let partition = ValidityPartition::split(table, inputs, outputs)?;
        let n_rows = partition.n_rows();
        let m = inputs.len();
        let k = outputs.len();

        let mut scores = vec![0.0; n_rows];
        let mut input_slacks = Array2::<f64>::zeros((n_rows, m));
        let mut output_slacks = Array2::<f64>::zeros((n_rows, k));

        if partition.n_valid() == 0 {
            log::debug!("DEA: no usable units among {n_rows} rows; returning zero scores");
        } else {
            let x = table.numeric_matrix(inputs, &partition.valid)?;
            let y = table.numeric_matrix(outputs, &partition.valid)?;
            let fitted = score_units(&x, &y, &self.options, &self.solver).map_err(|err| {
                relabel_row(err, &partition.valid)
            })?;
            scores = partition.scatter(&fitted.scores.to_vec());
            for (pos, &row) in partition.valid.iter().enumerate() {
                input_slacks.row_mut(row).assign(&fitted.input_slacks.row(pos));
                output_slacks.row_mut(row).assign(&fitted.output_slacks.row(pos));
            }
        }

        let percentiles = percentile_ranks(&scores, &partition);
        let (et_mean, pct_critical) = score_summary(&scores, self.options.threshold);
        let key_slack = slack_key_factor(inputs, &input_slacks, &partition);

        let mut annotated = table
            .with_column(&self.options.score_column, scores.clone())?
            .with_column(PERCENTILE_COLUMN, percentiles.iter().map(|&p| p as f64).collect::<Vec<f64>>())?;
        for (j, name) in inputs.iter().enumerate() {
            annotated = annotated
                .with_column(&format!("slack_{}", name.as_ref()), input_slacks.column(j).to_vec())?;
        }

        let mut metrics = MetricsMap::new();
        metrics.insert("ET_promedio".into(), et_mean.into());
        metrics.insert("pct_criticos".into(), pct_critical.into());
        metrics.insert("top_slack_promedio".into(), key_slack.into());
        metrics.insert("n_units".into(), n_rows.into());
        metrics.insert("n_valid".into(), partition.n_valid().into());

        log::info!(
            "DEA ({:?}, {:?}): {} of {} units scored, mean efficiency {:.4}",
            self.options.orientation,
            self.options.rts,
            partition.n_valid(),
            n_rows,
            et_mean
        );

        Ok(DeaOutcome {
            table: annotated,
            scores,
            percentiles,
            input_slacks,
            output_slacks,
            partition,
            metrics,
        })
    }
}

/// Convenience wrapper: [`DeaEstimator::fit`] with the default simplex.
///
/// # Errors
/// See [`DeaEstimator::fit`].
pub fn run_dea<S: AsRef<str>>(
    table: &UnitTable, inputs: &[S], outputs: &[S], options: &DeaOptions,
) -> EfficiencyResult<DeaOutcome> {
    DeaEstimator::new(options.clone()).fit(table, inputs, outputs)
}

/// Score the rows of `x` (`n × m` inputs) and `y` (`n × k` outputs) against
/// the envelope they span.
///
/// # Errors
/// [`EfficiencyError::Estimation`] with context `"DEA unit <i>"` (matrix row)
/// when either stage fails for a unit.
pub fn score_units<L: LinearProgramSolver + ?Sized>(
    x: &Array2<f64>, y: &Array2<f64>, options: &DeaOptions, solver: &L,
) -> EfficiencyResult<DeaScores> {
    let n = x.nrows();
    let (m, k) = (x.ncols(), y.ncols());
    let mut scores = Array1::<f64>::zeros(n);
    let mut input_slacks = Array2::<f64>::zeros((n, m));
    let mut output_slacks = Array2::<f64>::zeros((n, k));
    if n == 0 {
        return Ok(DeaScores { scores, input_slacks, output_slacks });
    }
    if n == 1 {
        scores[0] = 1.0;
        return Ok(DeaScores { scores, input_slacks, output_slacks });
    }

    let (xs, x_scale) = rescale_columns(x);
    let (ys, y_scale) = rescale_columns(y);
    for o in 0..n {
        let unit = solve_unit(&xs, &ys, o, options, solver, true).map_err(|source| {
            log::error!("DEA: unit {o} failed: {source}");
            EfficiencyError::estimation(format!("DEA unit {o}"), source)
        })?;
        scores[o] = unit.score;
        if let Some((s_in, s_out)) = unit.slacks {
            input_slacks.row_mut(o).assign(&(&s_in * &x_scale));
            output_slacks.row_mut(o).assign(&(&s_out * &y_scale));
        }
    }
    Ok(DeaScores { scores, input_slacks, output_slacks })
}

/// Radial scores only, skipping the slack stage.
///
/// # Errors
/// As [`score_units`].
pub fn radial_scores<L: LinearProgramSolver + ?Sized>(
    x: &Array2<f64>, y: &Array2<f64>, options: &DeaOptions, solver: &L,
) -> EfficiencyResult<Array1<f64>> {
    let n = x.nrows();
    if n <= 1 {
        return Ok(Array1::from_elem(n, 1.0));
    }
    let (xs, _) = rescale_columns(x);
    let (ys, _) = rescale_columns(y);
    let mut scores = Array1::<f64>::zeros(n);
    for o in 0..n {
        scores[o] = solve_unit(&xs, &ys, o, options, solver, false)
            .map_err(|source| {
                log::error!("DEA: unit {o} failed: {source}");
                EfficiencyError::estimation(format!("DEA unit {o}"), source)
            })?
            .score;
    }
    Ok(scores)
}

/// Score one unit against a reference set that it joins for the evaluation.
///
/// The unit's vectors are appended to `reference_x` / `reference_y` and its
/// own score is read from the resulting program. Used for cross-period
/// frontier comparisons.
///
/// # Errors
/// [`EfficiencyError::Estimation`] with context `"DEA cross evaluation"`.
pub fn evaluate_against<L: LinearProgramSolver + ?Sized>(
    reference_x: &Array2<f64>, reference_y: &Array2<f64>, unit_x: ArrayView1<'_, f64>,
    unit_y: ArrayView1<'_, f64>, options: &DeaOptions, solver: &L,
) -> EfficiencyResult<f64> {
    let x = append_row(reference_x, unit_x)?;
    let y = append_row(reference_y, unit_y)?;
    let o = x.nrows() - 1;
    let (xs, _) = rescale_columns(&x);
    let (ys, _) = rescale_columns(&y);
    solve_unit(&xs, &ys, o, options, solver, false)
        .map(|unit| unit.score)
        .map_err(|source| EfficiencyError::estimation("DEA cross evaluation", source))
}

// ---- Helper methods ----

struct UnitSolution {
    score: f64,
    /// Rescaled (input, output) slacks when requested.
    slacks: Option<(Array1<f64>, Array1<f64>)>,
}

fn solve_unit<L: LinearProgramSolver + ?Sized>(
    x: &Array2<f64>, y: &Array2<f64>, o: usize, options: &DeaOptions, solver: &L,
    with_slacks: bool,
) -> OptResult<UnitSolution> {
    let radial = solver.solve(&envelopment_program(x, y, o, options))?.objective;
    let score = match options.orientation {
        Orientation::Input => radial,
        Orientation::Output if radial > 0.0 => 1.0 / radial,
        Orientation::Output => 0.0,
    }
    .clamp(0.0, 1.0);
    if !with_slacks {
        return Ok(UnitSolution { score, slacks: None });
    }

    let n = x.nrows();
    let (m, k) = (x.ncols(), y.ncols());
    let stage2 = solver.solve(&slack_program(x, y, o, radial, options))?;
    let clean = |v: f64| if v < SLACK_TOL { 0.0 } else { v };
    let s_in = Array1::from_iter((0..m).map(|i| clean(stage2.x[n + i])));
    let s_out = Array1::from_iter((0..k).map(|r| clean(stage2.x[n + m + r])));
    Ok(UnitSolution { score, slacks: Some((s_in, s_out)) })
}

/// Radial program over `(λ₁..λₙ, θ|φ)`.
fn envelopment_program(
    x: &Array2<f64>, y: &Array2<f64>, o: usize, options: &DeaOptions,
) -> LinearProgram {
    let n = x.nrows();
    let mut objective = Array1::<f64>::zeros(n + 1);
    objective[n] = 1.0;
    let sense = match options.orientation {
        Orientation::Input => Sense::Minimize,
        Orientation::Output => Sense::Maximize,
    };
    let mut lp = LinearProgram::new(objective, sense);

    for i in 0..x.ncols() {
        let mut row = Array1::<f64>::zeros(n + 1);
        row.slice_mut(ndarray::s![..n]).assign(&x.column(i));
        match options.orientation {
            Orientation::Input => {
                row[n] = -x[[o, i]];
                lp.push_constraint(row, Relation::Le, 0.0);
            }
            Orientation::Output => lp.push_constraint(row, Relation::Le, x[[o, i]]),
        }
    }
    for r in 0..y.ncols() {
        let mut row = Array1::<f64>::zeros(n + 1);
        row.slice_mut(ndarray::s![..n]).assign(&y.column(r));
        match options.orientation {
            Orientation::Input => lp.push_constraint(row, Relation::Ge, y[[o, r]]),
            Orientation::Output => {
                row[n] = -y[[o, r]];
                lp.push_constraint(row, Relation::Ge, 0.0);
            }
        }
    }
    if options.rts == ReturnsToScale::Vrs {
        let mut row = Array1::<f64>::ones(n + 1);
        row[n] = 0.0;
        lp.push_constraint(row, Relation::Eq, 1.0);
    }
    lp
}

/// Max-slack program over `(λ₁..λₙ, s⁻₁..s⁻ₘ, s⁺₁..s⁺ₖ)` at a fixed radial value.
fn slack_program(
    x: &Array2<f64>, y: &Array2<f64>, o: usize, radial: f64, options: &DeaOptions,
) -> LinearProgram {
    let n = x.nrows();
    let (m, k) = (x.ncols(), y.ncols());
    let width = n + m + k;
    let mut objective = Array1::<f64>::zeros(width);
    objective.slice_mut(ndarray::s![n..]).fill(1.0);
    let mut lp = LinearProgram::new(objective, Sense::Maximize);

    let (input_target, output_target) = match options.orientation {
        Orientation::Input => (radial, 1.0),
        Orientation::Output => (1.0, radial),
    };
    for i in 0..m {
        let mut row = Array1::<f64>::zeros(width);
        row.slice_mut(ndarray::s![..n]).assign(&x.column(i));
        row[n + i] = 1.0;
        lp.push_constraint(row, Relation::Eq, input_target * x[[o, i]]);
    }
    for r in 0..k {
        let mut row = Array1::<f64>::zeros(width);
        row.slice_mut(ndarray::s![..n]).assign(&y.column(r));
        row[n + m + r] = -1.0;
        lp.push_constraint(row, Relation::Eq, output_target * y[[o, r]]);
    }
    if options.rts == ReturnsToScale::Vrs {
        let mut row = Array1::<f64>::zeros(width);
        row.slice_mut(ndarray::s![..n]).fill(1.0);
        lp.push_constraint(row, Relation::Eq, 1.0);
    }
    lp
}

/// Divide each column by its mean; returns the rescaled matrix and the means.
fn rescale_columns(a: &Array2<f64>) -> (Array2<f64>, Array1<f64>) {
    let scale = a
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::ones(a.ncols()))
        .mapv(|s| if s.is_finite() && s > 0.0 { s } else { 1.0 });
    (a / &scale, scale)
}

fn append_row(a: &Array2<f64>, row: ArrayView1<'_, f64>) -> EfficiencyResult<Array2<f64>> {
    let row = row.to_owned().insert_axis(Axis(0));
    concatenate(Axis(0), &[a.view(), row.view()]).map_err(|_| EfficiencyError::InvalidOption {
        name: "unit vector",
        value: format!("{} values", row.len()),
        reason: "must have one value per reference column",
    })
}

/// Map a matrix-row context (`"DEA unit <pos>"`) back to a table row.
fn relabel_row(err: EfficiencyError, valid: &[usize]) -> EfficiencyError {
    match err {
        EfficiencyError::Estimation { context, source } => {
            let row = context
                .strip_prefix("DEA unit ")
                .and_then(|pos| pos.parse::<usize>().ok())
                .and_then(|pos| valid.get(pos).copied());
            let context = match row {
                Some(row) => format!("DEA unit at table row {row}"),
                None => context,
            };
            EfficiencyError::Estimation { context, source }
        }
        other => other,
    }
}

/// Input whose mean non-zero slack over usable rows is largest.
fn slack_key_factor<S: AsRef<str>>(
    inputs: &[S], slacks: &Array2<f64>, partition: &ValidityPartition,
) -> String {
    let mut best: Option<(usize, f64)> = None;
    for j in 0..inputs.len() {
        let nonzero: Vec<f64> =
            partition.valid.iter().map(|&row| slacks[[row, j]]).filter(|&s| s > 0.0).collect();
        if nonzero.is_empty() {
            continue;
        }
        let avg = nonzero.iter().sum::<f64>() / nonzero.len() as f64;
        if best.is_none_or(|(_, b)| avg > b) {
            best = Some((j, avg));
        }
    }
    best.map(|(j, _)| inputs[j].as_ref().to_string()).unwrap_or_else(|| UNDETERMINED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Textbook single-input / single-output scores under CRS and VRS.
    // - Orientation conventions and slack recovery.
    // - Degenerate valid sets and zero-fill of invalid rows.
    // - Cross evaluation against another reference set.
    //
    // They intentionally DO NOT cover:
    // - Simplex internals (see `optimization::linear_program`).
    // -------------------------------------------------------------------------

    fn table(x: Vec<f64>, y: Vec<f64>) -> UnitTable {
        UnitTable::from_columns(vec![("camas", x), ("egresos", y)]).expect("equal lengths")
    }

    #[test]
    // Purpose
    // -------
    // Under CRS with one input and one output the score is the unit's
    // productivity relative to the best ratio.
    //
    // Given
    // -----
    // - x = (2, 4, 5), y = (2, 2, 5): ratios 1, 0.5, 1.
    //
    // Expect
    // ------
    // - Scores (1, 0.5, 1) in both orientations.
    fn crs_scores_match_productivity_ratios() {
        // Arrange
        let x = array![[2.0], [4.0], [5.0]];
        let y = array![[2.0], [2.0], [5.0]];
        let solver = DenseSimplex::default();

        for orientation in [Orientation::Input, Orientation::Output] {
            let opts = DeaOptions { orientation, ..DeaOptions::default() };

            // Act
            let fitted = score_units(&x, &y, &opts, &solver).expect("feasible programs");

            // Assert
            assert_abs_diff_eq!(fitted.scores[0], 1.0, epsilon = 1e-7);
            assert_abs_diff_eq!(fitted.scores[1], 0.5, epsilon = 1e-7);
            assert_abs_diff_eq!(fitted.scores[2], 1.0, epsilon = 1e-7);
        }
    }

    #[test]
    // Purpose
    // -------
    // VRS scores are never below CRS scores.
    //
    // Given
    // -----
    // - x = (1, 2, 4, 6), y = (1, 3, 4, 5).
    //
    // Expect
    // ------
    // - VRS ≥ CRS for every unit; the smallest unit is VRS-efficient.
    fn vrs_scores_dominate_crs_scores() {
        // Arrange
        let x = array![[1.0], [2.0], [4.0], [6.0]];
        let y = array![[1.0], [3.0], [4.0], [5.0]];
        let solver = DenseSimplex::default();
        let crs = DeaOptions::default();
        let vrs = DeaOptions { rts: ReturnsToScale::Vrs, ..DeaOptions::default() };

        // Act
        let s_crs = score_units(&x, &y, &crs, &solver).expect("feasible").scores;
        let s_vrs = score_units(&x, &y, &vrs, &solver).expect("feasible").scores;

        // Assert
        for (c, v) in s_crs.iter().zip(s_vrs.iter()) {
            assert!(v + 1e-9 >= *c);
        }
        assert_abs_diff_eq!(s_vrs[0], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(s_crs[1], 1.0, epsilon = 1e-7);
    }

    #[test]
    // Purpose
    // -------
    // Excess input beyond the radial projection shows up as slack, in the
    // field's own units.
    //
    // Given
    // -----
    // - Two inputs, unit output. Units use (2, 1), (2, 2) and (4, 1).
    //
    // Expect
    // ------
    // - Every radial score is 1 (no proportional contraction is possible).
    // - Unit 2 carries slack 2 on the first input, unit 1 slack 1 on the
    //   second.
    fn input_slack_is_reported_in_original_units() {
        // Arrange
        let x = array![[2.0, 1.0], [2.0, 2.0], [4.0, 1.0]];
        let y = array![[1.0], [1.0], [1.0]];
        let solver = DenseSimplex::default();

        // Act
        let fitted = score_units(&x, &y, &DeaOptions::default(), &solver).expect("feasible");

        // Assert
        assert_abs_diff_eq!(fitted.scores[0], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(fitted.scores[2], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(fitted.input_slacks[[2, 0]], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fitted.input_slacks[[2, 1]], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(fitted.scores[1], 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(fitted.input_slacks[[1, 1]], 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // Three units with identical input/output ratios are mutually efficient.
    //
    // Given
    // -----
    // - x = (1, 2, 3), y = (2, 4, 6).
    //
    // Expect
    // ------
    // - Every score 1.0; every percentile in 1..=100.
    fn identical_ratios_are_all_efficient() {
        // Arrange
        let t = table(vec![1.0, 2.0, 3.0], vec![2.0, 4.0, 6.0]);

        // Act
        let out = run_dea(&t, &["camas"], &["egresos"], &DeaOptions::default()).expect("fit");

        // Assert
        for s in &out.scores {
            assert_abs_diff_eq!(*s, 1.0, epsilon = 1e-7);
        }
        assert!(out.percentiles.iter().all(|p| (1..=100).contains(p)));
        assert_eq!(out.metrics["top_slack_promedio"].as_str(), Some(UNDETERMINED));
    }

    #[test]
    // Purpose
    // -------
    // Invalid rows are zero-filled and a single valid unit scores 1.
    //
    // Given
    // -----
    // - Three rows where two have a zero or missing field.
    //
    // Expect
    // ------
    // - Scores (0, 1, 0), percentiles (0, 100, 0), mean 1/3, 66.7% critical.
    fn single_valid_unit_scores_one_and_invalid_rows_zero() {
        // Arrange
        let t = table(vec![0.0, 3.0, 2.0], vec![1.0, 2.0, f64::NAN]);

        // Act
        let out = run_dea(&t, &["camas"], &["egresos"], &DeaOptions::default()).expect("fit");

        // Assert
        assert_eq!(out.scores, vec![0.0, 1.0, 0.0]);
        assert_eq!(out.percentiles, vec![0, 100, 0]);
        assert_abs_diff_eq!(out.metrics["ET_promedio"].as_f64().expect("number"), 1.0 / 3.0);
        assert_abs_diff_eq!(
            out.metrics["pct_criticos"].as_f64().expect("number"),
            200.0 / 3.0,
            epsilon = 1e-9
        );
        assert_eq!(out.table.get(0, "ET DEA"), Some(&Value::Number(0.0)));
        assert_eq!(out.table.get(1, "slack_camas"), Some(&Value::Number(0.0)));
    }

    #[test]
    // Purpose
    // -------
    // No usable unit is a degenerate outcome, not an error.
    //
    // Given
    // -----
    // - Every row has a non-positive field.
    //
    // Expect
    // ------
    // - All-zero scores, `"undetermined"` slack key, `n_valid == 0`.
    fn empty_valid_set_returns_zeros() {
        let t = table(vec![0.0, -1.0], vec![1.0, 2.0]);
        let out = run_dea(&t, &["camas"], &["egresos"], &DeaOptions::default()).expect("fit");
        assert_eq!(out.scores, vec![0.0, 0.0]);
        assert_eq!(out.metrics["n_valid"], 0usize.into());
        assert_eq!(out.metrics["top_slack_promedio"].as_str(), Some(UNDETERMINED));
    }

    #[test]
    fn missing_fields_are_configuration_errors() {
        let t = table(vec![1.0], vec![1.0]);
        let err = run_dea(&t, &["camas", "medicos"], &["egresos"], &DeaOptions::default())
            .expect_err("medicos is absent");
        assert!(err.to_string().contains("medicos"));
    }

    #[test]
    fn radial_scores_agree_with_full_scoring() {
        let x = array![[2.0, 1.0], [2.0, 2.0], [4.0, 1.0], [3.0, 3.0]];
        let y = array![[1.0], [1.0], [1.0], [1.5]];
        let solver = DenseSimplex::default();
        let opts = DeaOptions { rts: ReturnsToScale::Vrs, ..DeaOptions::default() };
        let full = score_units(&x, &y, &opts, &solver).expect("feasible").scores;
        let radial = radial_scores(&x, &y, &opts, &solver).expect("feasible");
        for (a, b) in full.iter().zip(radial.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    // Purpose
    // -------
    // A unit evaluated against another frontier can score below one, and a
    // unit dominating that frontier scores one.
    //
    // Given
    // -----
    // - Reference units with ratio 1; candidates with ratios 0.5 and 2.
    //
    // Expect
    // ------
    // - Cross scores 0.5 and 1.0 (the dominating unit joins the set).
    fn evaluate_against_reads_appended_unit_score() {
        // Arrange
        let ref_x = array![[1.0], [2.0]];
        let ref_y = array![[1.0], [2.0]];
        let solver = DenseSimplex::default();
        let opts = DeaOptions::default();

        // Act
        let weak = evaluate_against(&ref_x, &ref_y, array![2.0].view(), array![1.0].view(), &opts, &solver)
            .expect("feasible");
        let strong = evaluate_against(&ref_x, &ref_y, array![1.0].view(), array![2.0].view(), &opts, &solver)
            .expect("feasible");

        // Assert
        assert_abs_diff_eq!(weak, 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(strong, 1.0, epsilon = 1e-7);
    }
}
