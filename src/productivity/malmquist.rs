//! Malmquist productivity index between two periods.
//!
//! For every unit usable in both periods:
//!
//! ```text
//! EFFCH    = EFF_t1 / EFF_t
//! TECH     = sqrt( (cross(t→t+1) / EFF_t) · (EFF_t1 / cross(t+1→t)) )
//! Malmquist = EFFCH · TECH
//! %ΔProd   = (Malmquist − 1) · 100
//! ```
//!
//! `cross(t→t+1)` scores the unit's period-t+1 vectors against the period-t
//! frontier and `cross(t+1→t)` scores its period-t vectors against the
//! period-t+1 frontier. Cross evaluations are independent per unit and run
//! on a rayon pool; with cross evaluation disabled `TECH ≡ 1`.
use std::collections::HashMap;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    data::{UnitTable, ValidityPartition},
    efficiency::{
        dea::{evaluate_against, radial_scores},
        errors::EfficiencyError,
        metrics::MetricsMap,
        options::{DeaOptions, Orientation, ReturnsToScale},
    },
    optimization::linear_program::{DenseSimplex, LinearProgramSolver},
    productivity::{
        errors::{ProductivityError, ProductivityResult},
        subset::UnitSubset,
    },
    utils::{finite_mean, finite_median, finite_std},
};

/// Default unit id column.
pub const DEFAULT_ID_FIELD: &str = "hospital_id";

/// Malmquist values within this distance of 1 count as unchanged.
const UNCHANGED_TOL: f64 = 1e-9;

/// A unit table observed in one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTable {
    /// Period marker (e.g. the year).
    pub label: i64,
    pub table: UnitTable,
}

impl PeriodTable {
    pub fn new(label: i64, table: UnitTable) -> Self {
        PeriodTable { label, table }
    }
}

/// Malmquist configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MalmquistOptions {
    pub id_field: String,
    pub rts: ReturnsToScale,
    pub orientation: Orientation,
    /// Evaluate cross-period frontiers; `TECH ≡ 1` otherwise.
    pub use_cross: bool,
    pub subset: UnitSubset,
    /// Worker threads for cross evaluations; `0` lets rayon decide.
    pub n_jobs: usize,
}

impl Default for MalmquistOptions {
    fn default() -> Self {
        MalmquistOptions {
            id_field: DEFAULT_ID_FIELD.to_string(),
            rts: ReturnsToScale::Crs,
            orientation: Orientation::Input,
            use_cross: true,
            subset: UnitSubset::All,
            n_jobs: 4,
        }
    }
}

/// Per-unit indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MalmquistRow {
    pub unit_id: i64,
    pub eff_t: f64,
    pub eff_t1: f64,
    pub effch: f64,
    pub tech: f64,
    pub malmquist: f64,
    pub pct_change: f64,
}

impl MalmquistRow {
    fn new(unit_id: i64, eff_t: f64, eff_t1: f64, tech: f64) -> Self {
        let effch = eff_t1 / eff_t;
        let malmquist = effch * tech;
        MalmquistRow {
            unit_id,
            eff_t,
            eff_t1,
            effch,
            tech,
            malmquist,
            pct_change: (malmquist - 1.0) * 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MalmquistOutcome {
    pub period_t: i64,
    pub period_t1: i64,
    /// One row per selected unit, in selection order.
    pub rows: Vec<MalmquistRow>,
    /// `rows` as a table: id, `EFF_t`, `EFF_t1`, `EFFCH`, `TECH`,
    /// `Malmquist`, `%ΔProd`.
    pub table: UnitTable,
    pub summary: MetricsMap,
}

/// Malmquist index with the default simplex.
///
/// # Errors
/// See [`run_malmquist_with`].
pub fn run_malmquist<S: AsRef<str>>(
    period_t: &PeriodTable, period_t1: &PeriodTable, inputs: &[S], outputs: &[S],
    options: &MalmquistOptions,
) -> ProductivityResult<MalmquistOutcome> {
    run_malmquist_with(period_t, period_t1, inputs, outputs, options, &DenseSimplex::default())
}

/// Malmquist index with a caller-supplied LP solver.
///
/// # Errors
/// - [`ProductivityError::Data`] for missing fields (including the id field).
/// - [`ProductivityError::SubsetColumnNotInput`] for a top-N column that is
///   not an input.
/// - [`ProductivityError::NoCommonUnits`] / [`ProductivityError::EmptySubset`].
/// - [`ProductivityError::MissingUnitId`] for a usable row without an id.
/// - [`ProductivityError::Efficiency`] when any DEA program fails.
/// - [`ProductivityError::WorkerPool`] if the rayon pool cannot be built.
pub fn run_malmquist_with<S: AsRef<str>, L: LinearProgramSolver>(
    period_t: &PeriodTable, period_t1: &PeriodTable, inputs: &[S], outputs: &[S],
    options: &MalmquistOptions, solver: &L,
) -> ProductivityResult<MalmquistOutcome> {
    let (label_t, label_t1) = (period_t.label, period_t1.label);
    options.subset.validate(inputs)?;
    let rows_t = usable_rows_by_id(period_t, inputs, outputs, &options.id_field)?;
    let rows_t1 = usable_rows_by_id(period_t1, inputs, outputs, &options.id_field)?;

    let common: Vec<i64> =
        rows_t.order.iter().copied().filter(|id| rows_t1.by_id.contains_key(id)).collect();
    if common.is_empty() {
        return Err(ProductivityError::NoCommonUnits { period_t: label_t, period_t1: label_t1 });
    }

    let selected = match &options.subset {
        UnitSubset::TopN { column, .. } => {
            let values = period_t.table.numeric_column(column)?;
            options.subset.apply(&common, |id| values[rows_t.by_id[&id]])
        }
        rule => rule.apply(&common, |_| 0.0),
    };
    if selected.is_empty() {
        return Err(ProductivityError::EmptySubset { period_t: label_t, period_t1: label_t1 });
    }

    let pick = |rows: &UnitRows| selected.iter().map(|id| rows.by_id[id]).collect::<Vec<_>>();
    let (idx_t, idx_t1) = (pick(&rows_t), pick(&rows_t1));
    let x_t = period_t.table.numeric_matrix(inputs, &idx_t)?;
    let y_t = period_t.table.numeric_matrix(outputs, &idx_t)?;
    let x_t1 = period_t1.table.numeric_matrix(inputs, &idx_t1)?;
    let y_t1 = period_t1.table.numeric_matrix(outputs, &idx_t1)?;

    let dea = DeaOptions { orientation: options.orientation, rts: options.rts, ..DeaOptions::default() };
    let eff_t = radial_scores(&x_t, &y_t, &dea, solver)
        .map_err(|err| period_failure(err, &format!("period {label_t} frontier")))?;
    let eff_t1 = radial_scores(&x_t1, &y_t1, &dea, solver)
        .map_err(|err| period_failure(err, &format!("period {label_t1} frontier")))?;

    let tech: Vec<f64> = if options.use_cross {
        let frontiers = Frontiers { x_t: &x_t, y_t: &y_t, x_t1: &x_t1, y_t1: &y_t1 };
        let cross = cross_evaluations(&frontiers, &selected, (label_t, label_t1), &dea, solver, options.n_jobs)?;
        cross
            .iter()
            .enumerate()
            .map(|(i, &(c_t_t1, c_t1_t))| ((c_t_t1 / eff_t[i]) * (eff_t1[i] / c_t1_t)).sqrt())
            .collect()
    } else {
        vec![1.0; selected.len()]
    };

    let rows: Vec<MalmquistRow> = selected
        .iter()
        .enumerate()
        .map(|(i, &id)| MalmquistRow::new(id, eff_t[i], eff_t1[i], tech[i]))
        .collect();
    let table = rows_to_table(&rows, &options.id_field)?;
    let summary = summarize(&rows);

    log::info!(
        "Malmquist {label_t}→{label_t1}: {} units, mean index {:.4}",
        rows.len(),
        summary.get("Malmquist_mean").and_then(|v| v.as_f64()).unwrap_or(f64::NAN)
    );
    Ok(MalmquistOutcome { period_t: label_t, period_t1: label_t1, rows, table, summary })
}

// ---- Helper methods ----

/// Usable rows of one period keyed by unit id (first occurrence wins).
struct UnitRows {
    order: Vec<i64>,
    by_id: HashMap<i64, usize>,
}

fn usable_rows_by_id<S: AsRef<str>>(
    period: &PeriodTable, inputs: &[S], outputs: &[S], id_field: &str,
) -> ProductivityResult<UnitRows> {
    period.table.require_fields(&[id_field])?;
    let partition = ValidityPartition::split(&period.table, inputs, outputs)?;
    let mut order = Vec::with_capacity(partition.n_valid());
    let mut by_id = HashMap::with_capacity(partition.n_valid());
    for &row in &partition.valid {
        let id = period.table.unit_id(row, id_field).ok_or_else(|| {
            ProductivityError::MissingUnitId {
                period: period.label,
                row,
                id_field: id_field.to_string(),
            }
        })?;
        if let std::collections::hash_map::Entry::Vacant(slot) = by_id.entry(id) {
            slot.insert(row);
            order.push(id);
        }
    }
    Ok(UnitRows { order, by_id })
}

struct Frontiers<'a> {
    x_t: &'a Array2<f64>,
    y_t: &'a Array2<f64>,
    x_t1: &'a Array2<f64>,
    y_t1: &'a Array2<f64>,
}

/// `(cross(t→t+1), cross(t+1→t))` per selected unit, in order.
fn cross_evaluations<L: LinearProgramSolver>(
    f: &Frontiers<'_>, ids: &[i64], (label_t, label_t1): (i64, i64), dea: &DeaOptions,
    solver: &L, n_jobs: usize,
) -> ProductivityResult<Vec<(f64, f64)>> {
    let evaluate = || {
        (0..ids.len())
            .into_par_iter()
            .map(|i| {
                let forward = evaluate_against(f.x_t, f.y_t, f.x_t1.row(i), f.y_t1.row(i), dea, solver)
                    .map_err(|err| {
                        unit_failure(err, ids[i], &format!("period {label_t1} unit vs {label_t} frontier"))
                    })?;
                let backward = evaluate_against(f.x_t1, f.y_t1, f.x_t.row(i), f.y_t.row(i), dea, solver)
                    .map_err(|err| {
                        unit_failure(err, ids[i], &format!("period {label_t} unit vs {label_t1} frontier"))
                    })?;
                Ok((forward, backward))
            })
            .collect::<Result<Vec<_>, EfficiencyError>>()
    };
    let results = match worker_pool(n_jobs)? {
        Some(pool) => pool.install(evaluate),
        None => evaluate(),
    };
    Ok(results?)
}

/// Dedicated pool for `n_jobs > 0`; `None` runs on rayon's global pool.
fn worker_pool(n_jobs: usize) -> ProductivityResult<Option<rayon::ThreadPool>> {
    if n_jobs == 0 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_jobs)
        .build()
        .map(Some)
        .map_err(|err| ProductivityError::WorkerPool { reason: err.to_string() })
}

fn unit_failure(err: EfficiencyError, unit_id: i64, what: &str) -> EfficiencyError {
    period_failure(err, &format!("{what}, unit {unit_id}"))
}

fn period_failure(err: EfficiencyError, context: &str) -> EfficiencyError {
    match err {
        EfficiencyError::Estimation { context: inner, source } => {
            log::error!("Malmquist: {context} failed: {source}");
            EfficiencyError::estimation(format!("{context} ({inner})"), source)
        }
        other => other,
    }
}

fn rows_to_table(rows: &[MalmquistRow], id_field: &str) -> ProductivityResult<UnitTable> {
    let column = |f: fn(&MalmquistRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    Ok(UnitTable::from_columns(vec![
        (id_field, column(|r| r.unit_id as f64)),
        ("EFF_t", column(|r| r.eff_t)),
        ("EFF_t1", column(|r| r.eff_t1)),
        ("EFFCH", column(|r| r.effch)),
        ("TECH", column(|r| r.tech)),
        ("Malmquist", column(|r| r.malmquist)),
        ("%ΔProd", column(|r| r.pct_change)),
    ])?)
}

/// Summary statistics; means skip non-finite ratios and are `NaN` when none
/// is finite.
fn summarize(rows: &[MalmquistRow]) -> MetricsMap {
    let column = |f: fn(&MalmquistRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let malmquist = column(|r| r.malmquist);
    let n = rows.len();
    let improved = malmquist.iter().filter(|&&m| m > 1.0 + UNCHANGED_TOL).count();
    let declined = malmquist.iter().filter(|&&m| m < 1.0 - UNCHANGED_TOL).count();
    let unchanged = malmquist.iter().filter(|&&m| (m - 1.0).abs() <= UNCHANGED_TOL).count();

    let mut summary = MetricsMap::new();
    let mean_of = |values: &[f64]| finite_mean(values).unwrap_or(f64::NAN);
    summary.insert("EFFCH_mean".into(), mean_of(&column(|r| r.effch)).into());
    summary.insert("TECH_mean".into(), mean_of(&column(|r| r.tech)).into());
    summary.insert("Malmquist_mean".into(), mean_of(&malmquist).into());
    summary.insert("pctΔProd_mean".into(), mean_of(&column(|r| r.pct_change)).into());
    summary.insert("n_hospitals".into(), n.into());
    summary.insert("Malmquist_median".into(), finite_median(&malmquist).unwrap_or(f64::NAN).into());
    summary.insert("Malmquist_std".into(), finite_std(&malmquist, 0).unwrap_or(f64::NAN).into());
    summary.insert("productivity_improved".into(), improved.into());
    summary.insert("productivity_declined".into(), declined.into());
    summary.insert("productivity_unchanged".into(), unchanged.into());
    let pct_improved = if n == 0 { 0.0 } else { 100.0 * improved as f64 / n as f64 };
    summary.insert("pct_improved".into(), pct_improved.into());
    summary
}
