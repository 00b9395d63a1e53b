//! multivariate::pipeline — table-level projection and segmentation.
//!
//! Purpose
//! -------
//! Run the projection and clustering steps over named feature columns of a
//! [`UnitTable`], annotate the table with component and cluster columns,
//! and assemble the metadata a presentation layer reports.
//!
//! Key behaviors
//! -------------
//! - Rows with a non-finite (or missing) feature are dropped with a `warn!`
//!   before anything is fitted; outputs hold only the kept rows, in table
//!   order, and `rows` maps them back to the source table.
//! - With a fixed `k` the partition is fitted once and its silhouette is
//!   still computed. Without one, every `k` in `2..=min(k_max, n)` is fitted
//!   and the highest silhouette wins (the smallest `k` on ties).
//! - [`run_efficiency_clustering`] scores the table with DEA or SFA first,
//!   clusters on inputs ∪ outputs (the score is not a feature) and
//!   profiles each cluster.
//!
//! Invariants & assumptions
//! ------------------------
//! - Fewer than two usable rows is [`MultivariateError::InsufficientRows`].
//! - An explicit `k` must satisfy `2 ≤ k ≤ n`.
use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{
    data::{errors::DataError, table::UnitTable},
    efficiency::{
        derive::derive_scores,
        metrics::{MetricValue, MetricsMap},
        options::EfficiencyMethod,
    },
    multivariate::{
        errors::{MultivariateError, MultivariateResult},
        kmeans::{KMeansFit, KMeansOptions, kmeans},
        pca::{PcaModel, PcaOptions},
        silhouette::silhouette_score,
    },
    utils::{mean, round_to},
};

pub const DEFAULT_CLUSTER_COLUMN: &str = "cluster";

/// Profile values are rounded to this many decimals.
const PROFILE_DECIMALS: i32 = 3;

/// Settings for [`run_pca_clustering`].
///
/// Defaults: [`PcaOptions::default`], automatic `k` searched up to 6,
/// [`KMeansOptions::default`], labels in `"cluster"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub pca: PcaOptions,
    /// Fixed cluster count; `None` searches `2..=k_max`.
    pub k: Option<usize>,
    pub k_max: usize,
    pub kmeans: KMeansOptions,
    pub cluster_column: String,
}

impl ClusterOptions {
    /// # Errors
    /// - [`MultivariateError::InvalidClusterCount`] for a fixed `k < 2`.
    /// - [`MultivariateError::InvalidOption`] for `k_max < 2`.
    pub fn new(
        pca: PcaOptions, k: Option<usize>, k_max: usize, kmeans: KMeansOptions,
    ) -> MultivariateResult<Self> {
        if let Some(k) = k.filter(|&k| k < 2) {
            return Err(MultivariateError::InvalidClusterCount { k });
        }
        if k_max < 2 {
            return Err(MultivariateError::InvalidOption {
                name: "k_max",
                value: k_max.to_string(),
                reason: "the search needs at least two clusters",
            });
        }
        Ok(Self { pca, k, k_max, kmeans, cluster_column: DEFAULT_CLUSTER_COLUMN.to_string() })
    }
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            pca: PcaOptions::default(),
            k: None,
            k_max: 6,
            kmeans: KMeansOptions::default(),
            cluster_column: DEFAULT_CLUSTER_COLUMN.to_string(),
        }
    }
}

/// Result of [`run_pca`].
#[derive(Debug, Clone, PartialEq)]
pub struct PcaOutcome {
    /// Kept rows with `PC1..PCk` appended.
    pub table: UnitTable,
    pub model: PcaModel,
    /// Source-table index of each kept row.
    pub rows: Vec<usize>,
    pub metrics: MetricsMap,
}

/// Result of [`run_pca_clustering`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOutcome {
    /// Kept rows with `PC1..PCk` and the cluster column appended.
    pub table: UnitTable,
    pub model: PcaModel,
    pub rows: Vec<usize>,
    pub k: usize,
    pub silhouette: f64,
    pub labels: Vec<usize>,
    /// `k × n_components` centers in component space.
    pub centers: Array2<f64>,
    /// `(k, silhouette)` for every candidate tried by the search; empty for
    /// a fixed `k`.
    pub candidates: Vec<(usize, f64)>,
    pub metrics: MetricsMap,
}

impl ClusterOutcome {
    /// Centers keyed by cluster label, then component name.
    pub fn cluster_centers(&self) -> IndexMap<String, IndexMap<String, f64>> {
        let names = self.model.component_names();
        self.centers
            .outer_iter()
            .enumerate()
            .map(|(j, row)| (j.to_string(), names.iter().cloned().zip(row.iter().copied()).collect()))
            .collect()
    }
}

/// Per-cluster profile: size and rounded means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterProfile {
    pub cluster: usize,
    pub n_hospitals: usize,
    /// Mean of every feature and of the efficiency score, in that order.
    pub means: IndexMap<String, f64>,
}

/// Result of [`run_efficiency_clustering`].
#[derive(Debug, Clone, PartialEq)]
pub struct EfficiencyClusterOutcome {
    pub clusters: ClusterOutcome,
    pub method: EfficiencyMethod,
    pub score_column: String,
    pub features: Vec<String>,
    pub summary: Vec<ClusterProfile>,
    pub metrics: MetricsMap,
    pub notices: Vec<String>,
}

/// Project the usable rows of `table` onto principal components.
///
/// # Errors
/// - [`MultivariateError::Data`] for an empty or unknown feature list.
/// - [`MultivariateError::InsufficientRows`] when fewer than two rows are
///   usable.
pub fn run_pca<S: AsRef<str>>(
    table: &UnitTable, features: &[S], options: &PcaOptions,
) -> MultivariateResult<PcaOutcome> {
    let (rows, x) = usable_matrix(table, features)?;
    let names: Vec<String> = features.iter().map(|f| f.as_ref().to_string()).collect();
    let model = PcaModel::fit(&x, names, options)?;
    let z = model.transform(x.view())?;
    let annotated = append_components(&table.select_rows(&rows)?, &model, &z)?;

    let mut metrics = variance_metrics(&model);
    metrics.insert("n_units".into(), MetricValue::Count(rows.len()));
    log::info!(
        "PCA: {} components over {} rows, variance explained {:.3}",
        model.n_components(),
        rows.len(),
        model.total_variance_explained()
    );

    Ok(PcaOutcome { table: annotated, model, rows, metrics })
}

/// Project, then partition the usable rows in component space.
///
/// # Errors
/// - [`MultivariateError::Data`] for an empty or unknown feature list.
/// - [`MultivariateError::InsufficientRows`] when fewer than two rows are
///   usable.
/// - [`MultivariateError::InvalidClusterCount`] for a fixed `k < 2`.
/// - [`MultivariateError::ClusterCountExceedsRows`] for a fixed `k > n`.
pub fn run_pca_clustering<S: AsRef<str>>(
    table: &UnitTable, features: &[S], options: &ClusterOptions,
) -> MultivariateResult<ClusterOutcome> {
    let (rows, x) = usable_matrix(table, features)?;
    let n = rows.len();
    if let Some(k) = options.k {
        if k < 2 {
            return Err(MultivariateError::InvalidClusterCount { k });
        }
        if k > n {
            return Err(MultivariateError::ClusterCountExceedsRows { k, n_rows: n });
        }
    }

    let names: Vec<String> = features.iter().map(|f| f.as_ref().to_string()).collect();
    let model = PcaModel::fit(&x, names, &options.pca)?;
    let z = model.transform(x.view())?;

    let (fit, silhouette, candidates) = match options.k {
        Some(k) => {
            let fit = kmeans(&z, k, &options.kmeans)?;
            let s = silhouette_score(&z, &fit.labels);
            (fit, s, Vec::new())
        }
        None => search_k(&z, options.k_max.min(n).max(2), &options.kmeans)?,
    };
    let k = fit.centers.nrows();

    let annotated = append_components(&table.select_rows(&rows)?, &model, &z)?
        .with_column(
            &options.cluster_column,
            fit.labels.iter().map(|&l| l as i64).collect::<Vec<i64>>(),
        )?;

    let mut metrics = variance_metrics(&model);
    metrics.insert("k_clusters".into(), MetricValue::Count(k));
    metrics.insert("silhouette_score".into(), MetricValue::Number(silhouette));
    metrics.insert("scale_applied".into(), MetricValue::Flag(options.pca.standardize));
    metrics.insert("n_units".into(), MetricValue::Count(n));
    log::info!("PCA + k-means: {k} clusters over {n} rows, silhouette={silhouette:.3}");

    Ok(ClusterOutcome {
        table: annotated,
        model,
        rows,
        k,
        silhouette,
        labels: fit.labels,
        centers: fit.centers,
        candidates,
        metrics,
    })
}

/// Score with DEA or SFA, cluster on inputs ∪ outputs and profile clusters.
///
/// SFA uses the first output only and reports the truncation in `notices`.
///
/// # Errors
/// - [`MultivariateError::Data`] for missing or empty field lists.
/// - [`MultivariateError::Efficiency`] when the estimator fails.
/// - Any error of [`run_pca_clustering`].
pub fn run_efficiency_clustering<S: AsRef<str>>(
    table: &UnitTable, inputs: &[S], outputs: &[S], method: EfficiencyMethod,
    options: &ClusterOptions,
) -> MultivariateResult<EfficiencyClusterOutcome> {
    let derived = derive_scores(table, method, inputs, outputs)?;

    let mut features: Vec<String> = Vec::new();
    for field in inputs.iter().chain(outputs) {
        let field = field.as_ref();
        if !features.iter().any(|f| f == field) {
            features.push(field.to_string());
        }
    }

    let clusters = run_pca_clustering(&derived.table, features.as_slice(), options)?;
    let summary =
        profile_clusters(&clusters, &features, &derived.score_column, &options.cluster_column)?;

    let mut metrics = clusters.metrics.clone();
    metrics.insert("method".into(), MetricValue::Text(method.label().to_string()));
    metrics.insert("efficiency_col".into(), MetricValue::Text(derived.score_column.clone()));
    metrics.insert("n_components".into(), MetricValue::Count(clusters.model.n_components()));
    metrics.insert(
        "input_cols".into(),
        MetricValue::Texts(inputs.iter().map(|s| s.as_ref().to_string()).collect()),
    );
    metrics.insert(
        "output_cols".into(),
        MetricValue::Texts(outputs.iter().map(|s| s.as_ref().to_string()).collect()),
    );
    metrics.insert("feature_cols".into(), MetricValue::Texts(features.clone()));

    Ok(EfficiencyClusterOutcome {
        clusters,
        method,
        score_column: derived.score_column,
        features,
        summary,
        metrics,
        notices: derived.notices,
    })
}

// ---- Helper methods ----

/// Kept row indices and their dense feature matrix.
fn usable_matrix<S: AsRef<str>>(
    table: &UnitTable, features: &[S],
) -> MultivariateResult<(Vec<usize>, Array2<f64>)> {
    if features.is_empty() {
        return Err(DataError::EmptyFieldList { role: "feature" }.into());
    }
    table.require_fields(features)?;

    let all: Vec<usize> = (0..table.n_rows()).collect();
    let full = table.numeric_matrix(features, &all)?;
    let rows: Vec<usize> =
        all.into_iter().filter(|&i| full.row(i).iter().all(|v| v.is_finite())).collect();
    let dropped = table.n_rows() - rows.len();
    if dropped > 0 {
        log::warn!("PCA: dropping {dropped} rows with missing or non-finite features");
    }
    if rows.len() < 2 {
        return Err(MultivariateError::InsufficientRows { n_rows: rows.len(), required: 2 });
    }
    let x = table.numeric_matrix(features, &rows)?;
    Ok((rows, x))
}

fn append_components(
    table: &UnitTable, model: &PcaModel, z: &Array2<f64>,
) -> MultivariateResult<UnitTable> {
    let mut out = table.clone();
    for (j, name) in model.component_names().iter().enumerate() {
        out = out.with_column(name, z.column(j).to_vec())?;
    }
    Ok(out)
}

fn variance_metrics(model: &PcaModel) -> MetricsMap {
    let mut metrics = MetricsMap::new();
    metrics.insert(
        "explained_variance_ratio".into(),
        MetricValue::Numbers(model.explained_variance_ratio.to_vec()),
    );
    metrics.insert(
        "total_variance_explained".into(),
        MetricValue::Number(model.total_variance_explained()),
    );
    metrics
}

/// Best silhouette over `2..=upper`; the smallest `k` wins ties.
fn search_k(
    z: &Array2<f64>, upper: usize, options: &KMeansOptions,
) -> MultivariateResult<(KMeansFit, f64, Vec<(usize, f64)>)> {
    let mut best: Option<(KMeansFit, f64)> = None;
    let mut candidates = Vec::new();
    for k in 2..=upper {
        let fit = kmeans(z, k, options)?;
        let s = silhouette_score(z, &fit.labels);
        log::debug!("k-means search: k={k} silhouette={s:.4}");
        candidates.push((k, s));
        if best.as_ref().is_none_or(|(_, b)| s > *b) {
            best = Some((fit, s));
        }
    }
    let (fit, s) = best.ok_or(MultivariateError::InsufficientRows { n_rows: z.nrows(), required: 2 })?;
    Ok((fit, s, candidates))
}

fn profile_clusters(
    clusters: &ClusterOutcome, features: &[String], score_column: &str, cluster_column: &str,
) -> MultivariateResult<Vec<ClusterProfile>> {
    let table = &clusters.table;
    let mut columns: Vec<&str> = features.iter().map(String::as_str).collect();
    columns.push(score_column);
    let values = columns
        .iter()
        .map(|c| table.numeric_column(c))
        .collect::<Result<Vec<_>, _>>()?;
    let labels = table.numeric_column(cluster_column)?;

    let profiles = (0..clusters.k)
        .map(|j| {
            let members: Vec<usize> =
                (0..table.n_rows()).filter(|&i| labels[i] == j as f64).collect();
            let means = columns
                .iter()
                .zip(&values)
                .map(|(name, col)| {
                    let picked: Vec<f64> = members.iter().map(|&i| col[i]).collect();
                    ((*name).to_string(), round_to(mean(&picked), PROFILE_DECIMALS))
                })
                .collect();
            ClusterProfile { cluster: j, n_hospitals: members.len(), means }
        })
        .collect();
    Ok(profiles)
}
